//! Ticket registry: identity, ownership, and enumeration.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use crate::domain::{AccountId, ActivityId, Amount, Ticket, TicketId};
use crate::error::{EngineError, Result};

use super::Engine;

#[derive(Default)]
struct RegistryState {
    tickets: HashMap<TicketId, Ticket>,
    /// Owner index, maintained transactionally inside mint/transfer so
    /// enumeration never scans the id space.
    by_owner: HashMap<AccountId, BTreeSet<TicketId>>,
}

/// Owns ticket identity and ownership; per-ticket mutations serialize on the
/// registry lock.
pub(super) struct TicketRegistry {
    next_id: AtomicU64,
    inner: RwLock<RegistryState>,
}

impl TicketRegistry {
    pub(super) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: RwLock::new(RegistryState::default()),
        }
    }

    pub(super) fn mint(
        &self,
        activity_id: ActivityId,
        choice_index: usize,
        stake: Amount,
        owner: AccountId,
    ) -> TicketId {
        let id = TicketId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ticket = Ticket::new(id, activity_id, choice_index, stake, owner.clone());

        let mut state = self.inner.write();
        state.tickets.insert(id, ticket);
        state.by_owner.entry(owner).or_default().insert(id);
        id
    }

    pub(super) fn snapshot(&self, id: TicketId) -> Result<Ticket> {
        self.inner
            .read()
            .tickets
            .get(&id)
            .cloned()
            .ok_or(EngineError::TicketNotFound { ticket_id: id })
    }

    pub(super) fn owner_of(&self, id: TicketId) -> Result<AccountId> {
        Ok(self.snapshot(id)?.owner)
    }

    /// Move ownership from `from` to `to`, updating the owner index under
    /// one lock acquisition.
    pub(super) fn transfer(&self, id: TicketId, from: &AccountId, to: &AccountId) -> Result<()> {
        self.transfer_if_paid(id, from, to, || Ok(()))
    }

    /// Verify `from` owns the ticket, run `debit`, and move ownership to
    /// `to`, all under one lock acquisition. A failed debit leaves ownership
    /// and the index untouched, and no other ownership change can interleave
    /// with the debit.
    pub(super) fn transfer_if_paid(
        &self,
        id: TicketId,
        from: &AccountId,
        to: &AccountId,
        debit: impl FnOnce() -> Result<()>,
    ) -> Result<()> {
        let mut state = self.inner.write();
        let ticket = state
            .tickets
            .get_mut(&id)
            .ok_or(EngineError::TicketNotFound { ticket_id: id })?;
        if ticket.owner != *from {
            return Err(EngineError::NotOwner {
                ticket_id: id,
                claimed_by: from.clone(),
            });
        }

        debit()?;
        ticket.owner = to.clone();
        if let Some(owned) = state.by_owner.get_mut(from) {
            owned.remove(&id);
        }
        state.by_owner.entry(to.clone()).or_default().insert(id);
        Ok(())
    }

    pub(super) fn tickets_of(&self, owner: &AccountId) -> Vec<TicketId> {
        self.inner
            .read()
            .by_owner
            .get(owner)
            .map(|owned| owned.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Atomically verify ownership and the unredeemed state, then mark the
    /// ticket redeemed. The caller unwinds with [`Self::cancel_redeem`] if
    /// the follow-up payout transfer fails.
    pub(super) fn begin_redeem(&self, id: TicketId, claimant: &AccountId) -> Result<()> {
        let mut state = self.inner.write();
        let ticket = state
            .tickets
            .get_mut(&id)
            .ok_or(EngineError::TicketNotFound { ticket_id: id })?;
        if ticket.owner != *claimant {
            return Err(EngineError::NotOwner {
                ticket_id: id,
                claimed_by: claimant.clone(),
            });
        }
        if ticket.redeemed {
            return Err(EngineError::AlreadyRedeemed { ticket_id: id });
        }
        ticket.redeemed = true;
        Ok(())
    }

    pub(super) fn cancel_redeem(&self, id: TicketId) {
        if let Some(ticket) = self.inner.write().tickets.get_mut(&id) {
            ticket.redeemed = false;
        }
    }
}

impl Engine {
    /// Snapshot of one ticket.
    ///
    /// # Errors
    ///
    /// [`EngineError::TicketNotFound`] for an unknown id.
    pub fn ticket(&self, id: TicketId) -> Result<Ticket> {
        self.tickets.snapshot(id)
    }

    /// Current owner of a ticket.
    ///
    /// # Errors
    ///
    /// [`EngineError::TicketNotFound`] for an unknown id.
    pub fn owner_of(&self, id: TicketId) -> Result<AccountId> {
        self.tickets.owner_of(id)
    }

    /// Ids of every ticket currently owned by `owner`, ascending.
    #[must_use]
    pub fn tickets_of(&self, owner: &AccountId) -> Vec<TicketId> {
        self.tickets.tickets_of(owner)
    }

    /// Plain peer transfer of a ticket, outside the marketplace.
    ///
    /// Any listing for the ticket is left in place and becomes stale; buy
    /// attempts against it fail with `StaleListing`.
    ///
    /// # Errors
    ///
    /// `TicketNotFound`, or `NotOwner` when `from` does not own the ticket.
    pub fn transfer_ticket(&self, id: TicketId, from: &AccountId, to: &AccountId) -> Result<()> {
        self.tickets.transfer(id, from, to)?;
        info!(ticket = %id, %from, %to, "ticket transferred");
        Ok(())
    }
}
