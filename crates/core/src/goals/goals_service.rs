use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::goals::goals_deposit::{validate_deposit_amount, DepositReconciler, GoalWriteLocks};
use crate::goals::goals_model::{Goal, GoalDraft, GoalPatch};
use crate::goals::goals_status::GoalProgress;
use crate::goals::goals_summary::{summarize_goals, GoalsSummary};
use crate::goals::goals_traits::{GoalServiceTrait, GoalStoreTrait};

/// In-memory goal collection kept consistent with the external store.
///
/// The cache only changes after the store has confirmed a write. Writes to
/// the same goal are serialized and their results are applied to the cache
/// while the goal's lock is still held.
pub struct GoalService {
    store: Arc<dyn GoalStoreTrait>,
    reconciler: DepositReconciler,
    locks: Arc<GoalWriteLocks>,
    goals: RwLock<Vec<Goal>>,
}

impl GoalService {
    pub fn new(store: Arc<dyn GoalStoreTrait>) -> Self {
        let locks = Arc::new(GoalWriteLocks::new());
        GoalService {
            reconciler: DepositReconciler::new(store.clone(), locks.clone()),
            store,
            locks,
            goals: RwLock::new(Vec::new()),
        }
    }

    pub fn with_reconciler(mut self, reconciler: DepositReconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    pub fn write_locks(&self) -> Arc<GoalWriteLocks> {
        self.locks.clone()
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, Vec<Goal>> {
        self.goals.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, Vec<Goal>> {
        self.goals.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn upsert_cached(&self, goal: Goal) {
        let mut goals = self.write_cache();
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal,
            None => goals.push(goal),
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn list(&self) -> Vec<Goal> {
        self.read_cache().clone()
    }

    fn get(&self, goal_id: &str) -> Result<Goal> {
        self.read_cache()
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(goal_id.to_string()))
    }

    fn summary(&self) -> Result<GoalsSummary> {
        summarize_goals(self.read_cache().iter())
    }

    fn progress(&self, goal_id: &str, now: DateTime<Utc>) -> Result<GoalProgress> {
        self.read_cache()
            .iter()
            .find(|g| g.id == goal_id)
            .map(|g| GoalProgress::evaluate(g, now))
            .ok_or_else(|| Error::NotFound(goal_id.to_string()))
    }

    fn progress_all(&self, now: DateTime<Utc>) -> Vec<GoalProgress> {
        self.read_cache()
            .iter()
            .map(|g| GoalProgress::evaluate(g, now))
            .collect()
    }

    async fn refresh(&self) -> Result<usize> {
        let goals = self.store.list_goals().await?;
        let count = goals.len();
        *self.write_cache() = goals;
        info!("Loaded {} goals from store", count);
        Ok(count)
    }

    async fn add(&self, draft: GoalDraft, today: NaiveDate) -> Result<Goal> {
        let new_goal = draft.validate(today)?;
        let goal = self.store.create_goal(new_goal).await?;
        debug!("Created goal {} ({})", goal.id, goal.name);
        self.upsert_cached(goal.clone());
        Ok(goal)
    }

    async fn update(&self, goal_id: &str, patch: GoalPatch) -> Result<Goal> {
        let cached = self.read_cache().iter().any(|g| g.id == goal_id);
        if !cached {
            return Err(Error::NotFound(goal_id.to_string()));
        }
        patch.validate()?;

        let _guard = self.locks.acquire(goal_id).await;
        let goal = self.store.update_goal(goal_id, patch, None).await?;
        debug!("Updated goal {} to version {}", goal.id, goal.version);
        self.upsert_cached(goal.clone());
        Ok(goal)
    }

    async fn remove(&self, goal_id: &str) -> Result<()> {
        let _guard = self.locks.acquire(goal_id).await;
        match self.store.delete_goal(goal_id).await {
            Ok(()) => debug!("Deleted goal {}", goal_id),
            Err(Error::NotFound(_)) => debug!("Goal {} was already gone from the store", goal_id),
            Err(e) => return Err(e),
        }
        self.write_cache().retain(|g| g.id != goal_id);
        Ok(())
    }

    async fn deposit(&self, goal_id: &str, amount: Decimal) -> Result<Goal> {
        validate_deposit_amount(amount)?;

        let _guard = self.locks.acquire(goal_id).await;
        let goal = self.reconciler.reconcile_locked(goal_id, amount).await?;
        self.upsert_cached(goal.clone());
        Ok(goal)
    }
}
