//! Forecast outlook insight
//!
//! Surfaces the next-period projection as a prediction insight whenever
//! there is history to project from.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::context::GroundingContext;
use crate::models::{AIInsight, InsightKind, InsightPriority};

use super::engine::InsightRule;

/// Projected growth over current spending that bumps the priority
const GROWTH_ATTENTION: f64 = 0.1;

pub struct ForecastOutlook;

impl InsightRule for ForecastOutlook {
    fn name(&self) -> &'static str {
        "forecast_outlook"
    }

    fn evaluate(&self, ctx: &GroundingContext, now: DateTime<Utc>) -> Vec<AIInsight> {
        let prediction = &ctx.prediction;

        // Nothing to say without any projected signal
        if prediction.predicted_amount <= 0.0 && prediction.confidence <= 0.0 {
            return vec![];
        }

        let current = ctx.summary.total_spent;
        let growing =
            current > 0.0 && prediction.predicted_amount > current * (1.0 + GROWTH_ATTENTION);

        let description = if let Some(top) = prediction.breakdown.first() {
            format!(
                "Expected spending for {}: ${:.2} (confidence {:.0}%), led by {} at ${:.2}.",
                prediction.period,
                prediction.predicted_amount,
                prediction.confidence * 100.0,
                top.category_name,
                top.predicted_amount
            )
        } else {
            format!(
                "Expected spending for {}: ${:.2} (confidence {:.0}%).",
                prediction.period,
                prediction.predicted_amount,
                prediction.confidence * 100.0
            )
        };

        vec![AIInsight {
            id: Uuid::new_v4(),
            kind: InsightKind::Prediction,
            title: format!("Spending outlook for {}", prediction.period),
            description,
            priority: if growing {
                InsightPriority::Medium
            } else {
                InsightPriority::Low
            },
            created_at: now,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        PredictionBreakdown, SpendingComparison, SpendingPrediction, SpendingSummary, Trend,
    };

    fn context(current_spent: f64, predicted: f64, confidence: f64) -> GroundingContext {
        GroundingContext {
            summary: SpendingSummary {
                total_spent: current_spent,
                total_income: 0.0,
                net_balance: -current_spent,
                top_categories: vec![],
                comparison: SpendingComparison {
                    previous_period_amount: current_spent,
                    change_percentage: Some(0.0),
                    trend: Trend::Stable,
                },
            },
            budgets: vec![],
            goals: vec![],
            prediction: SpendingPrediction {
                period: "September 2026".into(),
                predicted_amount: predicted,
                confidence,
                breakdown: vec![PredictionBreakdown {
                    category_id: Uuid::new_v4(),
                    category_name: "Groceries".into(),
                    predicted_amount: predicted / 2.0,
                }],
            },
        }
    }

    #[test]
    fn test_flat_forecast_is_low_priority_prediction() {
        let insights = ForecastOutlook.evaluate(&context(500.0, 500.0, 1.0), Utc::now());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Prediction);
        assert_eq!(insights[0].priority, InsightPriority::Low);
        assert!(insights[0].description.contains("Groceries"));
    }

    #[test]
    fn test_growing_forecast_gets_attention() {
        let insights = ForecastOutlook.evaluate(&context(500.0, 700.0, 0.8), Utc::now());
        assert_eq!(insights[0].priority, InsightPriority::Medium);
    }

    #[test]
    fn test_no_signal_no_insight() {
        let insights = ForecastOutlook.evaluate(&context(0.0, 0.0, 0.0), Utc::now());
        assert!(insights.is_empty());
    }
}
