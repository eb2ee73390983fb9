//! Activity store: the arena owning all activity records.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use crate::domain::{AccountId, Activity, ActivityId, Amount};
use crate::error::{EngineError, Result};

use super::Engine;

/// All activity state lives here; mutation goes through these methods so the
/// per-activity capacity discipline holds under concurrent callers.
pub(super) struct ActivityStore {
    next_id: AtomicU64,
    inner: RwLock<HashMap<ActivityId, Activity>>,
}

impl ActivityStore {
    pub(super) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Reserve the next monotonic id. Ids burned by a failed creation leave
    /// gaps, which is fine; they are never reused.
    pub(super) fn allocate_id(&self) -> ActivityId {
        ActivityId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(super) fn insert(&self, activity: Activity) {
        self.inner.write().insert(activity.id, activity);
    }

    pub(super) fn snapshot(&self, id: ActivityId) -> Result<Activity> {
        self.inner
            .read()
            .get(&id)
            .cloned()
            .ok_or(EngineError::ActivityNotFound { activity_id: id })
    }

    /// Run `f` on the live record under the write lock.
    pub(super) fn with_mut<T>(
        &self,
        id: ActivityId,
        f: impl FnOnce(&mut Activity) -> Result<T>,
    ) -> Result<T> {
        let mut inner = self.inner.write();
        let activity = inner
            .get_mut(&id)
            .ok_or(EngineError::ActivityNotFound { activity_id: id })?;
        f(activity)
    }

    pub(super) fn reserve(
        &self,
        id: ActivityId,
        choice_index: usize,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.with_mut(id, |activity| activity.reserve(choice_index, amount, now))
    }

    /// Roll back a reservation after a failed token debit. The activity is
    /// never removed from the arena, so this cannot miss.
    pub(super) fn release(&self, id: ActivityId, choice_index: usize, amount: Amount) {
        let mut inner = self.inner.write();
        if let Some(activity) = inner.get_mut(&id) {
            activity.release(choice_index, amount);
        }
    }

    pub(super) fn count(&self) -> u64 {
        self.inner.read().len() as u64
    }

    pub(super) fn list(&self) -> Vec<Activity> {
        let mut all: Vec<Activity> = self.inner.read().values().cloned().collect();
        all.sort_by_key(|a| a.id);
        all
    }
}

impl Engine {
    /// Create an activity and pre-fund its escrow with `capacity` debited
    /// from the creator.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidInput`] for a malformed shape (see
    /// [`Activity::try_new`]); ledger errors when the creator cannot cover
    /// the capacity pre-fund. Nothing is recorded on failure.
    pub fn create_activity(
        &self,
        creator: &AccountId,
        choices: Vec<String>,
        description: impl Into<String>,
        capacity: Amount,
        deadline: DateTime<Utc>,
    ) -> Result<ActivityId> {
        let now = self.clock.now();
        let id = self.activities.allocate_id();
        let activity = Activity::try_new(
            id,
            creator.clone(),
            choices,
            description.into(),
            capacity,
            deadline,
            now,
        )?;

        let escrow = AccountId::activity_escrow(id);
        self.ledger
            .transfer_with_allowance(creator, &self.config.operator, &escrow, capacity)?;
        self.activities.insert(activity);

        info!(activity = %id, %creator, capacity, %deadline, "activity created");
        Ok(id)
    }

    /// Snapshot of one activity.
    ///
    /// # Errors
    ///
    /// [`EngineError::ActivityNotFound`] for an unknown id.
    pub fn activity(&self, id: ActivityId) -> Result<Activity> {
        self.activities.snapshot(id)
    }

    /// Snapshots of every activity, ordered by id.
    #[must_use]
    pub fn list_activities(&self) -> Vec<Activity> {
        self.activities.list()
    }

    /// Number of activities on record.
    #[must_use]
    pub fn activity_count(&self) -> u64 {
        self.activities.count()
    }
}
