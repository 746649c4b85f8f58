//! Budget alert insights
//!
//! Flags budgets that are over their amount or inside the alert-threshold
//! band. Any over-budget entry produces at least one warning.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::context::GroundingContext;
use crate::models::{AIInsight, InsightKind, InsightPriority};

use super::engine::InsightRule;

pub struct BudgetAlerts;

impl InsightRule for BudgetAlerts {
    fn name(&self) -> &'static str {
        "budget_alerts"
    }

    fn evaluate(&self, ctx: &GroundingContext, now: DateTime<Utc>) -> Vec<AIInsight> {
        let mut insights = vec![];

        for status in &ctx.budgets {
            let scope = budget_scope_name(ctx, status.budget.category_id);

            if status.is_over_budget {
                insights.push(AIInsight {
                    id: Uuid::new_v4(),
                    kind: InsightKind::Warning,
                    title: format!("{} budget exceeded", scope),
                    description: format!(
                        "You've spent ${:.2} of your ${:.2} {} budget ({:.0}%). \
                         Consider pausing non-essential spending for the rest of the period.",
                        status.spent,
                        status.budget.amount,
                        status.budget.period,
                        status.percentage * 100.0
                    ),
                    priority: InsightPriority::High,
                    created_at: now,
                });
            } else if status.is_near_limit {
                insights.push(AIInsight {
                    id: Uuid::new_v4(),
                    kind: InsightKind::Warning,
                    title: format!("{} budget near its limit", scope),
                    description: format!(
                        "${:.2} of ${:.2} used ({:.0}%); ${:.2} remains for this {} period.",
                        status.spent,
                        status.budget.amount,
                        status.percentage * 100.0,
                        status.remaining,
                        status.budget.period
                    ),
                    priority: InsightPriority::Medium,
                    created_at: now,
                });
            }
        }

        insights
    }
}

/// Resolve a budget's scope to a display name via the summary breakdown
fn budget_scope_name(ctx: &GroundingContext, category_id: Option<Uuid>) -> String {
    match category_id {
        None => "Overall".to_string(),
        Some(id) => ctx
            .summary
            .top_categories
            .iter()
            .find(|c| c.category_id == id)
            .map(|c| c.category_name.clone())
            .unwrap_or_else(|| "Category".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Budget, BudgetStatus, SpendingComparison, SpendingPrediction, SpendingSummary, Trend,
    };
    use crate::period::PeriodKind;
    use chrono::NaiveDate;

    fn context_with_budget(spent: f64, amount: f64, threshold: f64) -> GroundingContext {
        let budget = Budget {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            category_id: None,
            amount,
            period: PeriodKind::Monthly,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            alert_threshold: threshold,
        };
        let percentage = spent / amount;
        GroundingContext {
            summary: SpendingSummary {
                total_spent: spent,
                total_income: 0.0,
                net_balance: -spent,
                top_categories: vec![],
                comparison: SpendingComparison {
                    previous_period_amount: 0.0,
                    change_percentage: None,
                    trend: Trend::Up,
                },
            },
            budgets: vec![BudgetStatus {
                budget,
                spent,
                remaining: amount - spent,
                percentage,
                is_over_budget: percentage > 1.0,
                is_near_limit: percentage >= threshold && percentage <= 1.0,
            }],
            goals: vec![],
            prediction: SpendingPrediction {
                period: "next".into(),
                predicted_amount: 0.0,
                confidence: 0.0,
                breakdown: vec![],
            },
        }
    }

    #[test]
    fn test_over_budget_is_high_warning() {
        let insights = BudgetAlerts.evaluate(&context_with_budget(520.0, 500.0, 0.8), Utc::now());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].priority, InsightPriority::High);
    }

    #[test]
    fn test_near_limit_is_medium_warning() {
        let insights = BudgetAlerts.evaluate(&context_with_budget(450.0, 500.0, 0.8), Utc::now());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].priority, InsightPriority::Medium);
    }

    #[test]
    fn test_healthy_budget_is_silent() {
        let insights = BudgetAlerts.evaluate(&context_with_budget(100.0, 500.0, 0.8), Utc::now());
        assert!(insights.is_empty());
    }
}
