//! Marketplace listings: standing offers to sell a ticket at a fixed price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Amount, TicketId};

/// A seller's standing offer for one ticket.
///
/// At most one active listing exists per ticket. A listing is only honored
/// while `seller` still owns the ticket; any ownership change outside the
/// marketplace buy path makes it stale and purchase attempts are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub ticket_id: TicketId,
    /// Ticket owner at listing time.
    pub seller: AccountId,
    /// Credit-token ask, independent of the ticket's stake.
    pub ask_price: Amount,
    pub listed_at: DateTime<Utc>,
}

/// Ordering for marketplace discovery queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Descending `stake / ask_price`: more original stake per unit asking
    /// price first. Ties break toward the lower ticket id.
    CostEffectiveness,
    /// Ascending ask price, ties toward the lower ticket id.
    PriceAscending,
}
