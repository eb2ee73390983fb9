//! Core domain records and identifiers.

mod activity;
mod ids;
mod listing;
mod money;
mod ticket;

pub use activity::{Activity, ActivityStatus, MAX_CHOICES, MIN_CHOICES};
pub use ids::{AccountId, ActivityId, TicketId};
pub use listing::{Listing, SortKey};
pub use money::Amount;
pub use ticket::Ticket;

pub(crate) use money::proportional_payout;
