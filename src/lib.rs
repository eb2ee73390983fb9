//! Mutuel - pari-mutuel prediction-market ledger with a ticket marketplace.
//!
//! Bettors lock a fungible credit token against one of several mutually
//! exclusive outcomes of an *activity*; a ticket record proves the stake; an
//! authority later settles the activity and winners redeem a proportional
//! share of the collected pool. Tickets can also be resold peer-to-peer for
//! the same credit token before redemption.
//!
//! The crate is the ledger + settlement + marketplace engine only. It never
//! signs transactions or renders UI; the credit token itself is an external
//! collaborator reached through the [`ledger::CreditLedger`] trait, and the
//! presentation layer consumes snapshots and typed errors.
//!
//! # Modules
//!
//! - [`config`] - Engine policies (settlement authority, cancellation) loaded
//!   from TOML or built in code
//! - [`domain`] - Core records: activities, tickets, listings, ids, amounts
//! - [`engine`] - The [`engine::Engine`] facade: betting, settlement,
//!   ticket registry, marketplace
//! - [`error`] - Error taxonomy for the crate
//! - [`ledger`] - Credit-token boundary trait and an in-memory reference
//!   adapter
//! - [`clock`] - Time source abstraction so deadlines are testable
//!
//! # Features
//!
//! - `testkit` - Expose test doubles (manual clock) to downstream tests
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use mutuel::config::EngineConfig;
//! use mutuel::domain::AccountId;
//! use mutuel::engine::Engine;
//! use mutuel::ledger::InMemoryCreditLedger;
//!
//! # fn main() -> Result<(), mutuel::error::EngineError> {
//! let ledger = Arc::new(InMemoryCreditLedger::new());
//! let config = EngineConfig::default();
//! let operator = config.operator.clone();
//!
//! let alice = AccountId::new("alice");
//! let bob = AccountId::new("bob");
//! ledger.open_account(&alice, 1_000);
//! ledger.open_account(&bob, 1_000);
//! ledger.approve(&alice, &operator, 1_000);
//! ledger.approve(&bob, &operator, 1_000);
//!
//! let engine = Engine::new(ledger.clone(), config);
//!
//! let activity = engine.create_activity(
//!     &alice,
//!     vec!["Rain".into(), "Shine".into()],
//!     "Weather tomorrow at noon",
//!     100,
//!     Utc::now() + Duration::hours(1),
//! )?;
//!
//! let ticket = engine.place_bet(activity, 0, 60, &alice)?;
//! engine.place_bet(activity, 1, 40, &bob)?;
//!
//! engine.settle(activity, 0, &alice)?;
//! assert_eq!(engine.redeem(ticket, &alice)?, 100);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
