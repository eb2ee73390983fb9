//! Engine policy configuration.
//!
//! The two policies the reference behavior leaves open are explicit
//! construction-time parameters here: who may settle or cancel an activity,
//! and whether cancellation is allowed after the deadline. Embedders build
//! an [`EngineConfig`] in code or load one from TOML:
//!
//! ```toml
//! operator = "engine"
//! settlement_authority = { kind = "creator_or_admin", account = "ops" }
//! cancel_policy = "before_deadline_only"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::AccountId;
use crate::error::ConfigError;

/// Who may settle or cancel an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "account", rename_all = "snake_case")]
pub enum AuthorityPolicy {
    /// Only the activity's creator.
    #[default]
    CreatorOnly,
    /// Only a single global administrator.
    Admin(AccountId),
    /// Either the creator or the administrator.
    CreatorOrAdmin(AccountId),
}

/// When an open activity may be cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Cancellation is rejected once the betting deadline has passed.
    BeforeDeadlineOnly,
    /// Any time while the activity is still open, settled or not yet.
    #[default]
    AnytimeWhileOpen,
}

/// Engine construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own ledger identity, used as the allowance spender when
    /// debiting bettors, creators, and buyers.
    #[serde(default = "default_operator")]
    pub operator: AccountId,
    #[serde(default)]
    pub settlement_authority: AuthorityPolicy,
    #[serde(default)]
    pub cancel_policy: CancelPolicy,
}

fn default_operator() -> AccountId {
    AccountId::new("engine")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operator: default_operator(),
            settlement_authority: AuthorityPolicy::default(),
            cancel_policy: CancelPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when the file cannot be read or parsed, or a value
    /// fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.operator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "operator",
                reason: "operator account must not be empty".to_string(),
            });
        }
        let admin = match &self.settlement_authority {
            AuthorityPolicy::CreatorOnly => None,
            AuthorityPolicy::Admin(admin) | AuthorityPolicy::CreatorOrAdmin(admin) => Some(admin),
        };
        if admin.is_some_and(AccountId::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "settlement_authority",
                reason: "admin account must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
