//! Goal milestone insights
//!
//! Celebrates goals that reached their target and nudges the ones closing
//! in on it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::context::GroundingContext;
use crate::models::{AIInsight, InsightKind, InsightPriority};

use super::engine::InsightRule;

/// Fraction of the target at which a goal counts as nearing completion
const NEAR_COMPLETE: f64 = 0.9;

pub struct GoalMilestones;

impl InsightRule for GoalMilestones {
    fn name(&self) -> &'static str {
        "goal_milestones"
    }

    fn evaluate(&self, ctx: &GroundingContext, now: DateTime<Utc>) -> Vec<AIInsight> {
        let mut insights = vec![];

        for progress in &ctx.goals {
            let ratio = progress.current_amount / progress.goal.target_amount;

            if progress.completion_recommended {
                insights.push(AIInsight {
                    id: Uuid::new_v4(),
                    kind: InsightKind::Achievement,
                    title: format!("\"{}\" goal reached", progress.goal.name),
                    description: format!(
                        "You've saved ${:.2}, meeting your ${:.2} target. \
                         Time to mark it complete or set the next one.",
                        progress.current_amount, progress.goal.target_amount
                    ),
                    priority: InsightPriority::High,
                    created_at: now,
                });
            } else if ratio >= NEAR_COMPLETE {
                insights.push(AIInsight {
                    id: Uuid::new_v4(),
                    kind: InsightKind::Achievement,
                    title: format!("\"{}\" is almost there", progress.goal.name),
                    description: format!(
                        "${:.2} of ${:.2} saved ({:.0}%). One more push finishes it.",
                        progress.current_amount,
                        progress.goal.target_amount,
                        ratio * 100.0
                    ),
                    priority: InsightPriority::Medium,
                    created_at: now,
                });
            }
        }

        insights
    }
}
