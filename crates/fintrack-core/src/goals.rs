//! Goal tracker
//!
//! Folds a goal's contribution history into progress state and a completion
//! projection. Side-effect-free: when the target is met the tracker only
//! recommends the active→completed transition; persisting it is the
//! caller's job.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::models::{Goal, GoalContribution, GoalProgress, GoalStatus, Projection};

/// Compute progress and a completion projection for one goal.
///
/// `current_amount` is the signed contribution sum and is never clamped.
/// The projection assumes the observed average deposit rate (positive
/// contributions over days since creation, floored at one day) continues;
/// with no positive rate it is indeterminate.
pub fn track(goal: &Goal, contributions: &[GoalContribution], today: NaiveDate) -> GoalProgress {
    let current_amount: f64 = contributions.iter().map(|c| c.amount).sum();

    let completion_recommended =
        goal.status == GoalStatus::Active && current_amount >= goal.target_amount;

    let projection = project_completion(goal, contributions, current_amount, today);

    debug!(
        goal = %goal.id,
        current_amount,
        target = goal.target_amount,
        completion_recommended,
        "Tracked goal"
    );

    GoalProgress {
        goal: goal.clone(),
        current_amount,
        completion_recommended,
        projection,
    }
}

fn project_completion(
    goal: &Goal,
    contributions: &[GoalContribution],
    current_amount: f64,
    today: NaiveDate,
) -> Projection {
    let remaining = goal.target_amount - current_amount;
    if remaining <= 0.0 {
        return Projection::Date(today);
    }

    let deposits: f64 = contributions
        .iter()
        .map(|c| c.amount)
        .filter(|a| *a > 0.0)
        .sum();

    let elapsed_days = (today - goal.created_at.date_naive()).num_days().max(1);
    let rate = deposits / elapsed_days as f64;
    if rate <= 0.0 {
        return Projection::Indeterminate;
    }

    let days_needed = (remaining / rate).ceil() as i64;
    Projection::Date(today + Duration::days(days_needed))
}
