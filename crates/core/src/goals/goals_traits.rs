use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalDraft, GoalPatch, NewGoal};
use crate::goals::goals_status::GoalProgress;
use crate::goals::goals_summary::GoalsSummary;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Trait for the external goal record store.
///
/// Implementations only offer whole-record reads and partial updates; there
/// is no atomic increment. `update_goal` with `expected_version` must fail
/// with `Error::Conflict` when the stored version differs.
#[async_trait]
pub trait GoalStoreTrait: Send + Sync {
    async fn list_goals(&self) -> Result<Vec<Goal>>;
    async fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(
        &self,
        goal_id: &str,
        patch: GoalPatch,
        expected_version: Option<i64>,
    ) -> Result<Goal>;
    async fn delete_goal(&self, goal_id: &str) -> Result<()>;
}

/// Trait for the session's goal collection.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn list(&self) -> Vec<Goal>;
    fn get(&self, goal_id: &str) -> Result<Goal>;
    fn summary(&self) -> Result<GoalsSummary>;
    fn progress(&self, goal_id: &str, now: DateTime<Utc>) -> Result<GoalProgress>;
    fn progress_all(&self, now: DateTime<Utc>) -> Vec<GoalProgress>;
    /// Replaces the cache with the store's collection. Takes no per-goal
    /// lock, so it must not run while writes are in flight; call it when a
    /// session starts.
    async fn refresh(&self) -> Result<usize>;
    async fn add(&self, draft: GoalDraft, today: NaiveDate) -> Result<Goal>;
    async fn update(&self, goal_id: &str, patch: GoalPatch) -> Result<Goal>;
    async fn remove(&self, goal_id: &str) -> Result<()>;
    async fn deposit(&self, goal_id: &str, amount: Decimal) -> Result<Goal>;
}
