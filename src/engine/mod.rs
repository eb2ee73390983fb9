//! The engine facade.
//!
//! [`Engine`] owns the entity stores (activities, tickets, listings), the
//! clock, the policy configuration, and a handle to the external credit
//! ledger. Every public operation executes as one indivisible transaction
//! against the shared state: each store serializes its own mutations, and
//! credit-ledger calls are the only points where a failure unwinds prior
//! in-memory effects.
//!
//! Lock discipline for operations spanning stores: the marketplace takes the
//! listings lock first, the registry lock under it, and may call the credit
//! ledger under both; nothing takes locks in the opposite order.

mod activities;
mod betting;
mod marketplace;
mod registry;
mod settlement;

pub use marketplace::ListingQuery;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{AuthorityPolicy, EngineConfig};
use crate::domain::{AccountId, Activity};
use crate::ledger::CreditLedger;

use activities::ActivityStore;
use marketplace::ListingBook;
use registry::TicketRegistry;

/// Ledger + settlement + marketplace engine.
///
/// Cheap to share: wrap in an `Arc` and call from as many threads as needed;
/// losing concurrent callers observe clean failures (`CapacityExceeded`,
/// `StaleListing`, `NoListing`), never partial state.
pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    ledger: Arc<dyn CreditLedger>,
    activities: ActivityStore,
    tickets: TicketRegistry,
    listings: ListingBook,
}

impl Engine {
    /// Build an engine over the given credit ledger, using wall-clock time.
    #[must_use]
    pub fn new(ledger: Arc<dyn CreditLedger>, config: EngineConfig) -> Self {
        Self::with_clock(ledger, config, Arc::new(SystemClock))
    }

    /// Build an engine with an explicit time source.
    #[must_use]
    pub fn with_clock(
        ledger: Arc<dyn CreditLedger>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            clock,
            ledger,
            activities: ActivityStore::new(),
            tickets: TicketRegistry::new(),
            listings: ListingBook::new(),
        }
    }

    /// The active policy configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn is_settlement_authority(&self, activity: &Activity, authority: &AccountId) -> bool {
        match &self.config.settlement_authority {
            AuthorityPolicy::CreatorOnly => *authority == activity.creator,
            AuthorityPolicy::Admin(admin) => authority == admin,
            AuthorityPolicy::CreatorOrAdmin(admin) => {
                *authority == activity.creator || authority == admin
            }
        }
    }
}
