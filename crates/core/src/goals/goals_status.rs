//! Goal status evaluation.
//!
//! Everything here is a pure function of a goal and an injected `now`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{DEADLINE_WARNING_DAYS, DISPLAY_DECIMAL_PRECISION};
use crate::goals::goals_model::Goal;
use crate::utils::time_utils::days_until;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    Complete,
    Overdue,
    Warning,
    OnTrack,
}

impl GoalStatus {
    /// Classifies from the two inputs that matter, in precedence order.
    /// A deadline of today (`days_left == 0`) counts as on track.
    pub fn classify(complete: bool, days_left: i64) -> Self {
        if complete {
            GoalStatus::Complete
        } else if days_left < 0 {
            GoalStatus::Overdue
        } else if days_left > 0 && days_left <= DEADLINE_WARNING_DAYS {
            GoalStatus::Warning
        } else {
            GoalStatus::OnTrack
        }
    }
}

/// The single completion predicate shared by status evaluation and aggregation.
pub fn is_complete(goal: &Goal) -> bool {
    goal.saved_amount >= goal.target_amount
}

pub fn days_left(goal: &Goal, now: DateTime<Utc>) -> i64 {
    days_until(goal.deadline, now)
}

pub fn evaluate_status(goal: &Goal, now: DateTime<Utc>) -> GoalStatus {
    GoalStatus::classify(is_complete(goal), days_left(goal, now))
}

pub fn remaining_amount(goal: &Goal) -> Decimal {
    (goal.target_amount - goal.saved_amount).max(Decimal::ZERO)
}

/// Saved share of the target in percent, clamped to 0..=100.
pub fn progress_percent(goal: &Goal) -> Decimal {
    if is_complete(goal) {
        return dec!(100);
    }
    goal.saved_amount
        .checked_div(goal.target_amount)
        .and_then(|share| share.checked_mul(dec!(100)))
        .map(|percent| percent.clamp(Decimal::ZERO, dec!(100)))
        .unwrap_or(dec!(100))
        .round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Derived, display-ready view of one goal at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub status: GoalStatus,
    pub days_left: i64,
    pub days_overdue: i64,
    pub remaining: Decimal,
    pub progress_percent: Decimal,
}

impl GoalProgress {
    pub fn evaluate(goal: &Goal, now: DateTime<Utc>) -> Self {
        let days_left = days_left(goal, now);
        GoalProgress {
            goal_id: goal.id.clone(),
            status: GoalStatus::classify(is_complete(goal), days_left),
            days_left,
            days_overdue: (-days_left).max(0),
            remaining: remaining_amount(goal),
            progress_percent: progress_percent(goal),
        }
    }
}
