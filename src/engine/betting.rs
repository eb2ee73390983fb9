//! Bet placement: capacity reservation, escrow debit, ticket mint.

use tracing::{debug, info};

use crate::domain::{AccountId, ActivityId, Amount, TicketId};
use crate::error::{EngineError, Result};

use super::Engine;

impl Engine {
    /// Place a stake on one choice of an open activity.
    ///
    /// Reserves capacity, debits the stake from the bettor into the
    /// activity's escrow, and mints a ticket owned by the bettor. The three
    /// steps are all-or-nothing: a failed debit rolls the reservation back
    /// and no ticket is minted.
    ///
    /// # Errors
    ///
    /// `ActivityClosed`/`InvalidChoice`/`CapacityExceeded` from the
    /// reservation, `InsufficientFunds`/`InsufficientAllowance` from the
    /// credit ledger, `InvalidInput` for a zero stake.
    pub fn place_bet(
        &self,
        activity_id: ActivityId,
        choice_index: usize,
        stake: Amount,
        bettor: &AccountId,
    ) -> Result<TicketId> {
        if stake == 0 {
            return Err(EngineError::InvalidInput {
                reason: "stake must be positive".to_string(),
            });
        }

        let now = self.clock.now();
        self.activities
            .reserve(activity_id, choice_index, stake, now)?;

        let escrow = AccountId::activity_escrow(activity_id);
        if let Err(err) =
            self.ledger
                .transfer_with_allowance(bettor, &self.config.operator, &escrow, stake)
        {
            self.activities.release(activity_id, choice_index, stake);
            debug!(activity = %activity_id, %bettor, stake, %err, "bet debit failed, reservation rolled back");
            return Err(err.into());
        }

        let ticket_id = self
            .tickets
            .mint(activity_id, choice_index, stake, bettor.clone());

        info!(activity = %activity_id, ticket = %ticket_id, %bettor, choice_index, stake, "bet placed");
        Ok(ticket_id)
    }

    /// Total stakes recorded on one choice of an activity.
    ///
    /// # Errors
    ///
    /// `ActivityNotFound` for an unknown activity, `InvalidChoice` for an
    /// out-of-range index.
    pub fn choice_total(&self, activity_id: ActivityId, choice_index: usize) -> Result<Amount> {
        let activity = self.activities.snapshot(activity_id)?;
        activity.ensure_choice(choice_index)?;
        Ok(activity.per_choice_total[choice_index])
    }
}
