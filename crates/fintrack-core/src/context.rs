//! Grounding context assembler
//!
//! Gathers the derived financial signals a language-generation request (or
//! rule-based insight synthesis) needs so its output is tied to the user's
//! actual records: the latest spending summary, budget statuses, goal
//! progress, and the current forecast.

use crate::models::{BudgetStatus, GoalProgress, Projection, SpendingPrediction, SpendingSummary};

/// Snapshot of derived financial state for one owner
#[derive(Debug, Clone)]
pub struct GroundingContext {
    pub summary: SpendingSummary,
    pub budgets: Vec<BudgetStatus>,
    /// Progress for active goals only
    pub goals: Vec<GoalProgress>,
    pub prediction: SpendingPrediction,
}

impl GroundingContext {
    /// Render the snapshot into the system prompt for a chat turn
    pub fn render_system_prompt(&self) -> String {
        let mut prompt = String::from(
            "You are a helpful financial advisor assistant. You help users \
             understand their spending patterns and provide personalized advice.\n\n\
             User's financial snapshot:\n",
        );

        prompt.push_str(&format!(
            "- Spending this period: ${:.2} (income ${:.2}, net ${:.2})\n",
            self.summary.total_spent, self.summary.total_income, self.summary.net_balance
        ));

        if !self.summary.top_categories.is_empty() {
            let cats = self
                .summary
                .top_categories
                .iter()
                .map(|c| format!("{}: ${:.2}", c.category_name, c.amount))
                .collect::<Vec<_>>()
                .join(", ");
            prompt.push_str(&format!("- Top expense categories: {}\n", cats));
        }

        match self.summary.comparison.change_percentage {
            Some(change) => prompt.push_str(&format!(
                "- Spending trend: {} ({:+.1}% vs previous period)\n",
                self.summary.comparison.trend,
                change * 100.0
            )),
            None => prompt.push_str(&format!(
                "- Spending trend: {} (no spending in the previous period)\n",
                self.summary.comparison.trend
            )),
        }

        for status in &self.budgets {
            let scope = match status.budget.category_id {
                Some(_) => "category budget",
                None => "overall budget",
            };
            prompt.push_str(&format!(
                "- Budget ({}, {}): ${:.2} of ${:.2} spent ({:.0}%){}\n",
                scope,
                status.budget.period,
                status.spent,
                status.budget.amount,
                status.percentage * 100.0,
                if status.is_over_budget {
                    ", OVER BUDGET"
                } else if status.is_near_limit {
                    ", near limit"
                } else {
                    ""
                }
            ));
        }

        for progress in &self.goals {
            let projection = match progress.projection {
                Projection::Date(date) => format!("on pace to finish by {}", date),
                Projection::Indeterminate => "no contribution pace yet".to_string(),
            };
            prompt.push_str(&format!(
                "- Goal \"{}\": ${:.2} of ${:.2} saved, deadline {}, {}\n",
                progress.goal.name,
                progress.current_amount,
                progress.goal.target_amount,
                progress.goal.deadline,
                projection
            ));
        }

        prompt.push_str(&format!(
            "- Forecast for {}: ${:.2} expected (confidence {:.0}%)\n",
            self.prediction.period,
            self.prediction.predicted_amount,
            self.prediction.confidence * 100.0
        ));

        prompt.push_str(
            "\nBe concise, friendly, and provide actionable advice. Focus on \
             practical tips that can help the user improve their financial health.",
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpendingComparison, Trend};

    fn minimal_context() -> GroundingContext {
        GroundingContext {
            summary: SpendingSummary {
                total_spent: 850.0,
                total_income: 2000.0,
                net_balance: 1150.0,
                top_categories: vec![],
                comparison: SpendingComparison {
                    previous_period_amount: 800.0,
                    change_percentage: Some(0.0625),
                    trend: Trend::Up,
                },
            },
            budgets: vec![],
            goals: vec![],
            prediction: SpendingPrediction {
                period: "September 2026".into(),
                predicted_amount: 870.0,
                confidence: 0.9,
                breakdown: vec![],
            },
        }
    }

    #[test]
    fn test_render_includes_snapshot_figures() {
        let prompt = minimal_context().render_system_prompt();
        assert!(prompt.contains("$850.00"));
        assert!(prompt.contains("up (+6.2% vs previous period)"));
        assert!(prompt.contains("September 2026"));
        assert!(prompt.contains("financial advisor"));
    }

    #[test]
    fn test_render_handles_unreportable_change() {
        let mut ctx = minimal_context();
        ctx.summary.comparison.change_percentage = None;
        let prompt = ctx.render_system_prompt();
        assert!(prompt.contains("no spending in the previous period"));
    }
}
