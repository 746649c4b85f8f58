//! Summary composer
//!
//! Combines the current and previous window aggregates into a spending
//! summary with period-over-period trend classification.

use crate::aggregate::WindowAggregate;
use crate::models::{SpendingComparison, SpendingSummary, Trend};

/// Change fraction below which a period-over-period move counts as stable
const TREND_EPSILON: f64 = 0.01;

/// Number of categories surfaced in the summary
const TOP_CATEGORIES: usize = 5;

/// Compose a summary from two aggregates of equal period length.
///
/// When the previous window had no spending but the current one does, the
/// change fraction is unreportable (`None`) and the trend is forced up.
/// Two zero windows are stable with a change of zero.
pub fn compose(current: &WindowAggregate, previous: &WindowAggregate) -> SpendingSummary {
    let cur = current.total_spent;
    let prev = previous.total_spent;

    let (change_percentage, trend) = if prev > 0.0 {
        let change = (cur - prev) / prev;
        let trend = if change > TREND_EPSILON {
            Trend::Up
        } else if change < -TREND_EPSILON {
            Trend::Down
        } else {
            Trend::Stable
        };
        (Some(change), trend)
    } else if cur > 0.0 {
        (None, Trend::Up)
    } else {
        (Some(0.0), Trend::Stable)
    };

    let mut top_categories = current.categories.clone();
    top_categories.truncate(TOP_CATEGORIES);

    SpendingSummary {
        total_spent: cur,
        total_income: current.total_income,
        net_balance: current.total_income - cur,
        top_categories,
        comparison: SpendingComparison {
            previous_period_amount: prev,
            change_percentage,
            trend,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategorySpending;
    use crate::period::Window;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn window(month: u32) -> Window {
        Window::new(
            NaiveDate::from_ymd_opt(2026, month, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, month + 1, 1).unwrap(),
        )
        .unwrap()
    }

    fn agg(month: u32, total_spent: f64) -> WindowAggregate {
        WindowAggregate {
            total_spent,
            ..WindowAggregate::empty(window(month))
        }
    }

    #[test]
    fn test_growth_from_zero_reports_null_change_trending_up() {
        let summary = compose(&agg(3, 100.0), &agg(2, 0.0));
        assert_eq!(summary.comparison.change_percentage, None);
        assert_eq!(summary.comparison.trend, Trend::Up);
        assert_eq!(summary.comparison.previous_period_amount, 0.0);
    }

    #[test]
    fn test_flat_periods_are_stable() {
        let summary = compose(&agg(3, 200.0), &agg(2, 200.0));
        assert_eq!(summary.comparison.change_percentage, Some(0.0));
        assert_eq!(summary.comparison.trend, Trend::Stable);
    }

    #[test]
    fn test_both_zero_is_stable_zero_change() {
        let summary = compose(&agg(3, 0.0), &agg(2, 0.0));
        assert_eq!(summary.comparison.change_percentage, Some(0.0));
        assert_eq!(summary.comparison.trend, Trend::Stable);
    }

    #[test]
    fn test_epsilon_band() {
        // 0.5% move: inside the band
        let summary = compose(&agg(3, 201.0), &agg(2, 200.0));
        assert_eq!(summary.comparison.trend, Trend::Stable);

        // 10% moves: outside
        let up = compose(&agg(3, 220.0), &agg(2, 200.0));
        assert_eq!(up.comparison.trend, Trend::Up);
        assert!((up.comparison.change_percentage.unwrap() - 0.1).abs() < 1e-9);

        let down = compose(&agg(3, 180.0), &agg(2, 200.0));
        assert_eq!(down.comparison.trend, Trend::Down);
    }

    #[test]
    fn test_top_categories_capped_at_five() {
        let mut current = agg(3, 700.0);
        current.categories = (0..7)
            .map(|i| CategorySpending {
                category_id: Uuid::new_v4(),
                category_name: format!("cat{}", i),
                category_color: "#000".into(),
                amount: 100.0 * (7 - i) as f64,
                percentage: (7 - i) as f64 / 28.0,
                transaction_count: 1,
            })
            .collect();

        let summary = compose(&current, &agg(2, 100.0));
        assert_eq!(summary.top_categories.len(), 5);
        assert_eq!(summary.top_categories[0].amount, 700.0);
    }

    #[test]
    fn test_net_balance() {
        let mut current = agg(3, 400.0);
        current.total_income = 1000.0;
        let summary = compose(&current, &agg(2, 400.0));
        assert_eq!(summary.net_balance, 600.0);
        assert_eq!(summary.total_income, 1000.0);
    }
}
