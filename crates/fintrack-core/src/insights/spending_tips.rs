//! Spending tip insights
//!
//! Actionable habit tips derived from the snapshot: category concentration,
//! climbing spend, and missing budgets.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::context::GroundingContext;
use crate::models::{AIInsight, InsightKind, InsightPriority, Trend};

use super::engine::InsightRule;

/// Share of total spending in one category that reads as concentration
const CONCENTRATION: f64 = 0.4;

/// Period-over-period growth fraction that reads as climbing spend
const CLIMBING: f64 = 0.2;

pub struct SpendingTips;

impl InsightRule for SpendingTips {
    fn name(&self) -> &'static str {
        "spending_tips"
    }

    fn evaluate(&self, ctx: &GroundingContext, now: DateTime<Utc>) -> Vec<AIInsight> {
        let mut insights = vec![];

        if let Some(top) = ctx.summary.top_categories.first() {
            if top.percentage > CONCENTRATION {
                insights.push(AIInsight {
                    id: Uuid::new_v4(),
                    kind: InsightKind::Tip,
                    title: format!("{} dominates your spending", top.category_name),
                    description: format!(
                        "{} took {:.0}% of this period's spending (${:.2}). \
                         Review those transactions for easy cuts.",
                        top.category_name,
                        top.percentage * 100.0,
                        top.amount
                    ),
                    priority: InsightPriority::Medium,
                    created_at: now,
                });
            }
        }

        if ctx.summary.comparison.trend == Trend::Up {
            let climbing = ctx
                .summary
                .comparison
                .change_percentage
                .map_or(true, |c| c > CLIMBING);
            if climbing {
                insights.push(AIInsight {
                    id: Uuid::new_v4(),
                    kind: InsightKind::Tip,
                    title: "Spending is climbing".into(),
                    description:
                        "This period is running well above the last one. A quick mid-period \
                         check-in on your biggest categories can keep it from compounding."
                            .into(),
                    priority: InsightPriority::Medium,
                    created_at: now,
                });
            }
        }

        if ctx.budgets.is_empty() {
            insights.push(AIInsight {
                id: Uuid::new_v4(),
                kind: InsightKind::Tip,
                title: "Set category budgets".into(),
                description:
                    "Create budgets for your top spending categories to stay on track."
                        .into(),
                priority: InsightPriority::Medium,
                created_at: now,
            });
        }

        if ctx.summary.top_categories.is_empty() {
            insights.push(AIInsight {
                id: Uuid::new_v4(),
                kind: InsightKind::Tip,
                title: "Track daily expenses".into(),
                description:
                    "Recording expenses daily helps identify spending patterns and areas to save."
                        .into(),
                priority: InsightPriority::Low,
                created_at: now,
            });
        }

        insights
    }
}
