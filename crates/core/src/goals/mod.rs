//! Goals module - domain models, status engine, services, and traits.

mod goals_deposit;
mod goals_model;
mod goals_service;
mod goals_status;
mod goals_summary;
mod goals_traits;


pub use goals_deposit::{
    validate_deposit_amount, DepositReconciler, GoalWriteGuard, GoalWriteLocks,
};
pub use goals_model::{Goal, GoalDraft, GoalPatch, NewGoal};
pub use goals_service::GoalService;
pub use goals_status::{
    days_left, evaluate_status, is_complete, progress_percent, remaining_amount, GoalProgress,
    GoalStatus,
};
pub use goals_summary::{summarize_goals, GoalsSummary};
pub use goals_traits::{GoalServiceTrait, GoalStoreTrait};
