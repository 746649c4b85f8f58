//! Budget evaluator
//!
//! Derives budget status from a budget definition and the aggregate of its
//! current period window. Stateless: spent amounts are never cached, so each
//! evaluation reflects the latest transaction snapshot.

use tracing::debug;

use crate::aggregate::WindowAggregate;
use crate::models::{Budget, BudgetStatus};

/// Evaluate a budget against the aggregate of its current window.
///
/// The aggregate must already be scoped the way the budget is: category
/// aggregation for a category budget, whole-account otherwise. `amount > 0`
/// is a creation-time invariant (`Budget::validate`), so the percentage
/// division needs no runtime guard here.
pub fn evaluate(budget: &Budget, aggregate: &WindowAggregate) -> BudgetStatus {
    let spent = aggregate.total_spent;
    let percentage = spent / budget.amount;
    let is_over_budget = percentage > 1.0;
    let is_near_limit = percentage >= budget.alert_threshold && percentage <= 1.0;

    debug!(
        budget = %budget.id,
        window = %aggregate.window,
        spent,
        percentage,
        "Evaluated budget"
    );

    BudgetStatus {
        budget: budget.clone(),
        spent,
        remaining: budget.amount - spent,
        percentage,
        is_over_budget,
        is_near_limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{PeriodKind, Window};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn budget(amount: f64, threshold: f64) -> Budget {
        Budget {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            category_id: None,
            amount,
            period: PeriodKind::Monthly,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            alert_threshold: threshold,
        }
    }

    fn spent(total: f64) -> WindowAggregate {
        let window = Window::new(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        )
        .unwrap();
        WindowAggregate {
            total_spent: total,
            ..WindowAggregate::empty(window)
        }
    }

    #[test]
    fn test_near_limit_below_budget() {
        let status = evaluate(&budget(500.0, 0.8), &spent(450.0));
        assert!((status.percentage - 0.9).abs() < 1e-9);
        assert!(status.is_near_limit);
        assert!(!status.is_over_budget);
        assert_eq!(status.remaining, 50.0);
    }

    #[test]
    fn test_over_budget() {
        let status = evaluate(&budget(500.0, 0.8), &spent(520.0));
        assert!(status.is_over_budget);
        // Over budget is past the near-limit band, not inside it
        assert!(!status.is_near_limit);
        assert_eq!(status.remaining, -20.0);
    }

    #[test]
    fn test_under_threshold() {
        let status = evaluate(&budget(500.0, 0.8), &spent(100.0));
        assert!(!status.is_near_limit);
        assert!(!status.is_over_budget);
        assert!((status.percentage - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_exactly_at_budget_is_near_limit_not_over() {
        let status = evaluate(&budget(500.0, 0.8), &spent(500.0));
        assert!((status.percentage - 1.0).abs() < 1e-9);
        assert!(status.is_near_limit);
        assert!(!status.is_over_budget);
    }

    #[test]
    fn test_zero_spend() {
        let status = evaluate(&budget(500.0, 0.8), &spent(0.0));
        assert_eq!(status.percentage, 0.0);
        assert_eq!(status.remaining, 500.0);
        assert!(!status.is_near_limit);
    }
}
