use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::goals::goals_model::Goal;
use crate::goals::goals_status::is_complete;

/// Overview totals for a goal collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsSummary {
    pub total_goals: usize,
    pub total_saved: Decimal,
    pub completed_count: usize,
}

/// Totals a goal collection. Fails only when the saved amounts sum past
/// `Decimal::MAX`.
pub fn summarize_goals<'a, I>(goals: I) -> Result<GoalsSummary>
where
    I: IntoIterator<Item = &'a Goal>,
{
    goals
        .into_iter()
        .try_fold(
            GoalsSummary::default(),
            |mut summary, goal| -> Result<GoalsSummary> {
            summary.total_goals += 1;
            summary.total_saved = summary
                .total_saved
                .checked_add(goal.saved_amount)
                .ok_or_else(|| {
                    ValidationError::InvalidInput(format!(
                        "Total saved amount overflows at goal {}",
                        goal.id
                    ))
                })?;
            if is_complete(goal) {
                summary.completed_count += 1;
            }
            Ok(summary)
            },
        )
}
