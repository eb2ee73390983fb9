//! Tickets: transferable proof of a stake on one choice of one activity.

use serde::{Deserialize, Serialize};

use super::{AccountId, ActivityId, Amount, TicketId};

/// Proof of a stake.
///
/// Minted only when a bet is accepted and never destroyed; after settlement
/// it remains as a historical record. `owner` is the only field that changes
/// post-mint (peer transfer or marketplace sale), plus the one-shot
/// `redeemed` flag set when the ticket pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub activity_id: ActivityId,
    /// Index into the activity's choices, valid at mint time and immutable.
    pub choice_index: usize,
    /// Amount locked at mint time, immutable.
    pub stake: Amount,
    pub owner: AccountId,
    /// Set once this ticket has paid out (or refunded) under `redeem`.
    pub redeemed: bool,
}

impl Ticket {
    pub(crate) fn new(
        id: TicketId,
        activity_id: ActivityId,
        choice_index: usize,
        stake: Amount,
        owner: AccountId,
    ) -> Self {
        Self {
            id,
            activity_id,
            choice_index,
            stake,
            owner,
            redeemed: false,
        }
    }
}
