//! Activities: multi-choice wagers with a funding cap and deadline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

use super::{AccountId, ActivityId, Amount};

/// Minimum number of choices an activity may offer.
pub const MIN_CHOICES: usize = 2;
/// Maximum number of choices an activity may offer.
pub const MAX_CHOICES: usize = 10;

/// Lifecycle status of an activity.
///
/// A tagged variant rather than independent flags, so illegal combinations
/// (settled *and* cancelled) are unrepresentable. `Settled` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActivityStatus {
    /// Accepting stakes until the deadline or capacity is reached.
    Open,
    /// A winning choice has been declared; winning tickets redeem
    /// proportionally.
    Settled { winning_choice: usize },
    /// Voided; every ticket refunds its exact stake.
    Cancelled,
}

impl ActivityStatus {
    /// Returns true while the activity accepts stakes and transitions.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns true once a winning choice has been declared.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }

    /// Returns true once the activity has been voided.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The declared winning choice, if settled.
    #[must_use]
    pub const fn winning_choice(&self) -> Option<usize> {
        match self {
            Self::Settled { winning_choice } => Some(*winning_choice),
            _ => None,
        }
    }
}

/// One instance of a multi-choice wager.
///
/// Mutation goes through the activity store, which hands out clones of this
/// record as snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    /// Identity that created (and pre-funded) the activity.
    pub creator: AccountId,
    /// Ordered outcome labels, immutable after creation.
    pub choices: Vec<String>,
    pub description: String,
    /// Maximum aggregate stake, pre-funded into escrow at creation.
    pub capacity: Amount,
    /// `capacity - sum(all accepted stakes)`; non-increasing while open.
    pub remaining_capacity: Amount,
    /// New stakes are rejected from this instant on.
    pub deadline: DateTime<Utc>,
    /// Sum of stakes per choice, indexed like `choices`.
    pub per_choice_total: Vec<Amount>,
    pub status: ActivityStatus,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Validate creation parameters and build an open activity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the choice list is outside
    /// 2..=10 or contains an empty label, if `capacity` is zero, or if
    /// `deadline` is not strictly after `now`.
    pub fn try_new(
        id: ActivityId,
        creator: AccountId,
        choices: Vec<String>,
        description: String,
        capacity: Amount,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if choices.len() < MIN_CHOICES || choices.len() > MAX_CHOICES {
            return Err(EngineError::InvalidInput {
                reason: format!(
                    "activity must offer {MIN_CHOICES} to {MAX_CHOICES} choices, got {}",
                    choices.len()
                ),
            });
        }
        if choices.iter().any(|label| label.trim().is_empty()) {
            return Err(EngineError::InvalidInput {
                reason: "choice labels must not be empty".to_string(),
            });
        }
        if capacity == 0 {
            return Err(EngineError::InvalidInput {
                reason: "capacity must be positive".to_string(),
            });
        }
        if deadline <= now {
            return Err(EngineError::InvalidInput {
                reason: format!("deadline {deadline} is not in the future"),
            });
        }

        let per_choice_total = vec![0; choices.len()];
        Ok(Self {
            id,
            creator,
            choices,
            description,
            capacity,
            remaining_capacity: capacity,
            deadline,
            per_choice_total,
            status: ActivityStatus::Open,
            created_at: now,
        })
    }

    /// Total stakes actually accepted: `capacity - remaining_capacity`.
    #[must_use]
    pub fn total_pool(&self) -> Amount {
        self.capacity - self.remaining_capacity
    }

    /// Validate a choice index against this activity.
    pub fn ensure_choice(&self, choice_index: usize) -> Result<()> {
        if choice_index >= self.choices.len() {
            return Err(EngineError::InvalidChoice {
                activity_id: self.id,
                choice_index,
                choice_count: self.choices.len(),
            });
        }
        Ok(())
    }

    /// Atomically reserve `amount` of capacity on a choice.
    ///
    /// # Errors
    ///
    /// `ActivityClosed` when not open or past the deadline, `InvalidChoice`
    /// for an out-of-range index, `CapacityExceeded` when the stake would
    /// push total stakes over `capacity`.
    pub(crate) fn reserve(
        &mut self,
        choice_index: usize,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.status.is_open() || now >= self.deadline {
            return Err(EngineError::ActivityClosed {
                activity_id: self.id,
            });
        }
        self.ensure_choice(choice_index)?;
        if amount > self.remaining_capacity {
            return Err(EngineError::CapacityExceeded {
                activity_id: self.id,
                requested: amount,
                remaining: self.remaining_capacity,
            });
        }

        self.remaining_capacity -= amount;
        self.per_choice_total[choice_index] += amount;
        Ok(())
    }

    /// Undo a reservation whose follow-up token debit failed.
    pub(crate) fn release(&mut self, choice_index: usize, amount: Amount) {
        debug_assert!(choice_index < self.choices.len());
        debug_assert!(self.per_choice_total[choice_index] >= amount);
        self.per_choice_total[choice_index] -= amount;
        self.remaining_capacity += amount;
    }

    /// Apply a status transition.
    ///
    /// # Errors
    ///
    /// Only `Open -> Settled` and `Open -> Cancelled` are legal; everything
    /// else is [`EngineError::InvalidTransition`].
    pub(crate) fn transition(&mut self, new_status: ActivityStatus) -> Result<()> {
        match (self.status, new_status) {
            (ActivityStatus::Open, ActivityStatus::Settled { .. })
            | (ActivityStatus::Open, ActivityStatus::Cancelled) => {
                self.status = new_status;
                Ok(())
            }
            _ => Err(EngineError::InvalidTransition {
                activity_id: self.id,
            }),
        }
    }
}
