//! Settlement: win declaration, cancellation, and pull-model redemption.

use tracing::info;

use crate::config::CancelPolicy;
use crate::domain::{proportional_payout, AccountId, ActivityId, ActivityStatus, Amount, TicketId};
use crate::error::{EngineError, Result};

use super::Engine;

impl Engine {
    /// Declare the winning choice of an open activity.
    ///
    /// Moves no funds: payouts are computed lazily per ticket in
    /// [`Engine::redeem`], so settlement never iterates tickets.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` under the configured authority policy, `AlreadyFinal`
    /// when the activity is no longer open, `InvalidChoice` for an
    /// out-of-range winner.
    pub fn settle(
        &self,
        activity_id: ActivityId,
        winning_choice: usize,
        authority: &AccountId,
    ) -> Result<()> {
        self.activities.with_mut(activity_id, |activity| {
            if !self.is_settlement_authority(activity, authority) {
                return Err(EngineError::NotAuthorized {
                    activity_id,
                    authority: authority.clone(),
                });
            }
            if !activity.status.is_open() {
                return Err(EngineError::AlreadyFinal { activity_id });
            }
            activity.ensure_choice(winning_choice)?;
            activity.transition(ActivityStatus::Settled { winning_choice })
        })?;

        info!(activity = %activity_id, winning_choice, %authority, "activity settled");
        Ok(())
    }

    /// Void an open activity; every ticket then refunds its exact stake.
    ///
    /// # Errors
    ///
    /// `NotAuthorized`/`AlreadyFinal` as for [`Engine::settle`];
    /// `ActivityClosed` when the configured cancel policy only permits
    /// cancellation before the deadline and it has passed.
    pub fn cancel(&self, activity_id: ActivityId, authority: &AccountId) -> Result<()> {
        let now = self.clock.now();
        self.activities.with_mut(activity_id, |activity| {
            if !self.is_settlement_authority(activity, authority) {
                return Err(EngineError::NotAuthorized {
                    activity_id,
                    authority: authority.clone(),
                });
            }
            if !activity.status.is_open() {
                return Err(EngineError::AlreadyFinal { activity_id });
            }
            if self.config.cancel_policy == CancelPolicy::BeforeDeadlineOnly
                && now >= activity.deadline
            {
                return Err(EngineError::ActivityClosed { activity_id });
            }
            activity.transition(ActivityStatus::Cancelled)
        })?;

        info!(activity = %activity_id, %authority, "activity cancelled");
        Ok(())
    }

    /// Redeem a ticket once its activity is final.
    ///
    /// Settled: a ticket on the winning choice pays
    /// `stake * total_pool / winner_total` (floor division, dust stays in
    /// escrow); any other ticket pays zero but is still marked redeemed.
    /// Cancelled: every ticket refunds exactly its stake. Each ticket pays
    /// out at most once.
    ///
    /// # Errors
    ///
    /// `TicketNotFound`, `NotOwner` when the claimant does not own the
    /// ticket, `ActivityNotSettled` while the activity is still open,
    /// `AlreadyRedeemed` on a second claim, plus propagated ledger errors
    /// (which leave the ticket unredeemed).
    pub fn redeem(&self, ticket_id: TicketId, claimant: &AccountId) -> Result<Amount> {
        let ticket = self.tickets.snapshot(ticket_id)?;
        if ticket.owner != *claimant {
            return Err(EngineError::NotOwner {
                ticket_id,
                claimed_by: claimant.clone(),
            });
        }

        // Status is terminal once final, and per-choice totals are frozen by
        // then, so the payout computed from this snapshot is stable.
        let activity = self.activities.snapshot(ticket.activity_id)?;
        let payout = match activity.status {
            ActivityStatus::Open => {
                return Err(EngineError::ActivityNotSettled {
                    activity_id: activity.id,
                })
            }
            ActivityStatus::Settled { winning_choice } => {
                if ticket.choice_index == winning_choice {
                    proportional_payout(
                        ticket.stake,
                        activity.total_pool(),
                        activity.per_choice_total[winning_choice],
                    )
                } else {
                    0
                }
            }
            ActivityStatus::Cancelled => ticket.stake,
        };

        self.tickets.begin_redeem(ticket_id, claimant)?;
        if payout > 0 {
            let escrow = AccountId::activity_escrow(ticket.activity_id);
            if let Err(err) = self.ledger.transfer(&escrow, claimant, payout) {
                self.tickets.cancel_redeem(ticket_id);
                return Err(err.into());
            }
        }

        info!(ticket = %ticket_id, activity = %activity.id, %claimant, payout, "ticket redeemed");
        Ok(payout)
    }
}
