//! Deposit reconciliation against a store without an atomic increment.
//!
//! A deposit is a read-modify-write of `saved_amount`. Two guards keep
//! concurrent deposits from losing each other:
//!
//! - writes to the same goal issued through this process are serialized by a
//!   per-goal async lock ([`GoalWriteLocks`]);
//! - the write carries the version that was read, so a store that saw an
//!   intervening write (e.g. from another process) rejects it with
//!   `Error::Conflict`, and the deposit is retried from a fresh read.

use std::sync::Arc;

use dashmap::DashMap;
use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::constants::MAX_DEPOSIT_ATTEMPTS;
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::{Goal, GoalPatch};
use crate::goals::goals_traits::GoalStoreTrait;

/// Per-goal write locks. An entry lives only while some caller holds or
/// waits for it.
#[derive(Default)]
pub struct GoalWriteLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl GoalWriteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other write for `goal_id` is in flight.
    pub async fn acquire(self: &Arc<Self>, goal_id: &str) -> GoalWriteGuard {
        let lock = self
            .locks
            .entry(goal_id.to_string())
            .or_default()
            .value()
            .clone();
        GoalWriteGuard {
            guard: Some(lock.lock_owned().await),
            goal_id: goal_id.to_string(),
            locks: Arc::clone(self),
        }
    }

    /// Number of goals with a write in flight or queued.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held for the duration of one write. Dropping it releases the goal's lock
/// and forgets the entry when nobody else is waiting on it.
pub struct GoalWriteGuard {
    guard: Option<OwnedMutexGuard<()>>,
    goal_id: String,
    locks: Arc<GoalWriteLocks>,
}

impl Drop for GoalWriteGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Waiters hold a clone of the mutex, so a count of 1 means the map
        // holds the only reference.
        self.locks
            .locks
            .remove_if(&self.goal_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

pub fn validate_deposit_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Deposit amount must be positive, got {}",
            amount
        ))
        .into());
    }
    Ok(())
}

pub struct DepositReconciler {
    store: Arc<dyn GoalStoreTrait>,
    locks: Arc<GoalWriteLocks>,
    max_attempts: u32,
}

impl DepositReconciler {
    pub fn new(store: Arc<dyn GoalStoreTrait>, locks: Arc<GoalWriteLocks>) -> Self {
        DepositReconciler {
            store,
            locks,
            max_attempts: MAX_DEPOSIT_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Adds `amount` to the goal's saved amount and returns the stored record.
    pub async fn deposit(&self, goal_id: &str, amount: Decimal) -> Result<Goal> {
        validate_deposit_amount(amount)?;
        let _guard = self.locks.acquire(goal_id).await;
        self.reconcile_locked(goal_id, amount).await
    }

    /// Runs the read-modify-write loop. The caller must hold the goal's lock.
    pub(crate) async fn reconcile_locked(&self, goal_id: &str, amount: Decimal) -> Result<Goal> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let current = self.store.get_goal(goal_id).await?;
            let new_saved = current.saved_amount.checked_add(amount).ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "Deposit of {} overflows the saved amount of goal {}",
                    amount, goal_id
                ))
            })?;
            let patch = GoalPatch::saved_amount(new_saved);

            match self
                .store
                .update_goal(goal_id, patch, Some(current.version))
                .await
            {
                Ok(updated) => {
                    debug!(
                        "Deposited {} into goal {} (version {} -> {})",
                        amount, goal_id, current.version, updated.version
                    );
                    return Ok(updated);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        "Deposit into goal {} hit a concurrent write on attempt {}/{}: {}",
                        goal_id, attempt, self.max_attempts, e
                    );
                }
                Err(Error::Conflict(reason)) => {
                    return Err(Error::Conflict(format!(
                        "deposit into goal {} gave up after {} attempts: {}",
                        goal_id, attempt, reason
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
