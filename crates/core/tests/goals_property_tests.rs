//! Property-based integration tests for goal status and aggregation.
//!
//! These tests verify that the status rules and the collection summary hold
//! across randomly generated goals, using the `proptest` crate.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use goal_planner_core::goals::{
    days_left, evaluate_status, is_complete, remaining_amount, summarize_goals, Goal,
    GoalProgress, GoalStatus,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Generates an amount with two decimal places between 0 and 1,000,000.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates a reference instant somewhere in 2020-2030.
fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().timestamp();
    let end = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap().timestamp();
    (start..end).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap())
}

/// Generates a goal whose deadline lies within two years of `now`.
fn arb_goal(now: DateTime<Utc>) -> impl Strategy<Value = Goal> {
    ("[a-f0-9]{8}", arb_amount(), arb_amount(), -730i64..730).prop_map(
        move |(id, target, saved, offset)| Goal {
            id,
            name: "Generated".to_string(),
            category: "Test".to_string(),
            target_amount: target,
            saved_amount: saved,
            deadline: now.date_naive() + Duration::days(offset),
            created_at: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            version: 1,
        },
    )
}

fn arb_goal_with_now() -> impl Strategy<Value = (Goal, DateTime<Utc>)> {
    arb_now().prop_flat_map(|now| (arb_goal(now), Just(now)))
}

fn arb_goals_with_now(max_count: usize) -> impl Strategy<Value = (Vec<Goal>, DateTime<Utc>)> {
    arb_now().prop_flat_map(move |now| {
        (
            proptest::collection::vec(arb_goal(now), 0..=max_count),
            Just(now),
        )
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A goal whose saved amount reaches the target is complete, whatever the deadline.
    #[test]
    fn prop_reached_target_is_always_complete((goal, now) in arb_goal_with_now()) {
        prop_assume!(goal.saved_amount >= goal.target_amount);
        prop_assert_eq!(evaluate_status(&goal, now), GoalStatus::Complete);
        prop_assert_eq!(remaining_amount(&goal), Decimal::ZERO);
    }

    /// Incomplete goals are classified purely by days left.
    #[test]
    fn prop_incomplete_status_follows_days_left((goal, now) in arb_goal_with_now()) {
        prop_assume!(goal.saved_amount < goal.target_amount);
        let days = days_left(&goal, now);
        let expected = if days < 0 {
            GoalStatus::Overdue
        } else if days > 0 && days <= 30 {
            GoalStatus::Warning
        } else {
            GoalStatus::OnTrack
        };
        prop_assert_eq!(evaluate_status(&goal, now), expected);
        prop_assert_eq!(remaining_amount(&goal), goal.target_amount - goal.saved_amount);
    }

    /// Days left matches the offset between deadline and the calendar date of `now`.
    #[test]
    fn prop_days_left_matches_calendar_offset((goal, now) in arb_goal_with_now()) {
        let offset = (goal.deadline - now.date_naive()).num_days();
        prop_assert_eq!(days_left(&goal, now), offset);
    }

    /// Progress view agrees with the individual evaluator functions.
    #[test]
    fn prop_progress_view_is_consistent((goal, now) in arb_goal_with_now()) {
        let progress = GoalProgress::evaluate(&goal, now);
        prop_assert_eq!(progress.status, evaluate_status(&goal, now));
        prop_assert_eq!(progress.days_overdue, (-progress.days_left).max(0));
        prop_assert!(progress.progress_percent >= Decimal::ZERO);
        prop_assert!(progress.progress_percent <= Decimal::ONE_HUNDRED);
    }

    /// Summary totals equal the sums over the collection, for any collection.
    #[test]
    fn prop_summary_matches_collection((goals, now) in arb_goals_with_now(20)) {
        let summary = summarize_goals(&goals).unwrap();
        let total_saved: Decimal = goals.iter().map(|g| g.saved_amount).sum();
        let completed = goals
            .iter()
            .filter(|g| evaluate_status(g, now) == GoalStatus::Complete)
            .count();

        prop_assert_eq!(summary.total_goals, goals.len());
        prop_assert_eq!(summary.total_saved, total_saved);
        prop_assert_eq!(summary.completed_count, completed);
        prop_assert_eq!(summary.completed_count, goals.iter().filter(|g| is_complete(g)).count());
    }

    /// The summary does not depend on collection order.
    #[test]
    fn prop_summary_is_order_independent((goals, _now) in arb_goals_with_now(20)) {
        let mut reversed = goals.clone();
        reversed.reverse();
        prop_assert_eq!(summarize_goals(&goals).unwrap(), summarize_goals(&reversed).unwrap());
    }
}
