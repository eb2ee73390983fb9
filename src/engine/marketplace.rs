//! Marketplace: listing, discovery, and atomic buy-with-credit-token resale.

use std::cmp::Ordering;
use std::collections::HashMap;

use parking_lot::{Mutex, MutexGuard};
use tracing::info;

use crate::domain::{AccountId, ActivityId, Amount, Listing, SortKey, Ticket, TicketId};
use crate::error::{EngineError, Result};

use super::Engine;

/// Listings keyed by ticket id; at most one active listing per ticket.
///
/// The whole buy path runs under this lock (lock order: listings, then the
/// ticket registry, then the credit ledger), so two buyers racing for the
/// same listing serialize and the loser sees `NoListing` or `StaleListing`.
pub(super) struct ListingBook {
    inner: Mutex<HashMap<TicketId, Listing>>,
}

impl ListingBook {
    pub(super) fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, HashMap<TicketId, Listing>> {
        self.inner.lock()
    }
}

/// Filter for [`Engine::query_listings`].
///
/// `choice_index` only applies together with `activity`; `None` is the
/// wildcard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingQuery {
    pub activity: Option<ActivityId>,
    pub choice_index: Option<usize>,
}

impl ListingQuery {
    fn matches(&self, ticket: &Ticket) -> bool {
        match self.activity {
            None => true,
            Some(activity_id) => {
                ticket.activity_id == activity_id
                    && self
                        .choice_index
                        .map_or(true, |choice| ticket.choice_index == choice)
            }
        }
    }
}

/// Descending stake-per-ask ratio via u128 cross-multiplication; no floats.
fn cost_effectiveness(a: &(Listing, Ticket), b: &(Listing, Ticket)) -> Ordering {
    let lhs = u128::from(a.1.stake) * u128::from(b.0.ask_price);
    let rhs = u128::from(b.1.stake) * u128::from(a.0.ask_price);
    rhs.cmp(&lhs).then(a.0.ticket_id.cmp(&b.0.ticket_id))
}

fn price_ascending(a: &(Listing, Ticket), b: &(Listing, Ticket)) -> Ordering {
    a.0.ask_price
        .cmp(&b.0.ask_price)
        .then(a.0.ticket_id.cmp(&b.0.ticket_id))
}

impl Engine {
    /// Offer a ticket for sale at a fixed ask price, replacing any prior
    /// listing for it.
    ///
    /// # Errors
    ///
    /// `TicketNotFound`, `NotOwner` when the seller does not own the ticket,
    /// `InvalidPrice` for a zero ask.
    pub fn list_ticket(
        &self,
        ticket_id: TicketId,
        seller: &AccountId,
        ask_price: Amount,
    ) -> Result<()> {
        if ask_price == 0 {
            return Err(EngineError::InvalidPrice { ask_price });
        }

        let mut listings = self.listings.lock();
        let owner = self.tickets.owner_of(ticket_id)?;
        if owner != *seller {
            return Err(EngineError::NotOwner {
                ticket_id,
                claimed_by: seller.clone(),
            });
        }

        listings.insert(
            ticket_id,
            Listing {
                ticket_id,
                seller: seller.clone(),
                ask_price,
                listed_at: self.clock.now(),
            },
        );
        info!(ticket = %ticket_id, %seller, ask_price, "ticket listed");
        Ok(())
    }

    /// Withdraw a listing.
    ///
    /// # Errors
    ///
    /// `NoListing` when none exists, `NotOwner` when `seller` is not the
    /// listing's seller of record.
    pub fn delist_ticket(&self, ticket_id: TicketId, seller: &AccountId) -> Result<()> {
        let mut listings = self.listings.lock();
        let listing = listings
            .get(&ticket_id)
            .ok_or(EngineError::NoListing { ticket_id })?;
        if listing.seller != *seller {
            return Err(EngineError::NotOwner {
                ticket_id,
                claimed_by: seller.clone(),
            });
        }

        listings.remove(&ticket_id);
        info!(ticket = %ticket_id, %seller, "ticket delisted");
        Ok(())
    }

    /// Buy a listed ticket: pay the ask to the seller, take ownership,
    /// remove the listing — all or nothing.
    ///
    /// The ownership check, the price debit, and the ownership update run
    /// under one registry lock acquisition, so a peer transfer of the ticket
    /// serializes either before this call (rejected as `StaleListing`, no
    /// money moved) or after it (the ticket already belongs to the buyer).
    ///
    /// # Errors
    ///
    /// `NoListing` when none exists; `StaleListing` when the seller no
    /// longer owns the ticket (ownership moved outside the marketplace);
    /// `InsufficientFunds`/`InsufficientAllowance` from the price debit, in
    /// which case the listing, ownership, balances, and allowances are all
    /// untouched.
    pub fn buy_ticket(&self, ticket_id: TicketId, buyer: &AccountId) -> Result<()> {
        let mut listings = self.listings.lock();
        let listing = listings
            .get(&ticket_id)
            .ok_or(EngineError::NoListing { ticket_id })?
            .clone();

        self.tickets
            .transfer_if_paid(ticket_id, &listing.seller, buyer, || {
                self.ledger
                    .transfer_with_allowance(
                        buyer,
                        &self.config.operator,
                        &listing.seller,
                        listing.ask_price,
                    )
                    .map_err(EngineError::from)
            })
            .map_err(|err| match err {
                EngineError::NotOwner { .. } => EngineError::StaleListing { ticket_id },
                other => other,
            })?;

        listings.remove(&ticket_id);
        info!(ticket = %ticket_id, seller = %listing.seller, %buyer, price = listing.ask_price, "ticket sold");
        Ok(())
    }

    /// The active listing for a ticket, if any.
    #[must_use]
    pub fn listing(&self, ticket_id: TicketId) -> Option<Listing> {
        self.listings.lock().get(&ticket_id).cloned()
    }

    /// Discover listed tickets, filtered and ordered.
    #[must_use]
    pub fn query_listings(&self, query: ListingQuery, sort: SortKey) -> Vec<TicketId> {
        let listings = self.listings.lock();
        let mut entries: Vec<(Listing, Ticket)> = listings
            .values()
            .filter_map(|listing| {
                let ticket = self.tickets.snapshot(listing.ticket_id).ok()?;
                query.matches(&ticket).then(|| (listing.clone(), ticket))
            })
            .collect();
        drop(listings);

        match sort {
            SortKey::CostEffectiveness => entries.sort_by(cost_effectiveness),
            SortKey::PriceAscending => entries.sort_by(price_ascending),
        }
        entries
            .into_iter()
            .map(|(listing, _)| listing.ticket_id)
            .collect()
    }
}
