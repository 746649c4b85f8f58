//! Insight engine - orchestrates rule evaluation and ranking

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::context::GroundingContext;
use crate::models::AIInsight;

use super::{BudgetAlerts, ForecastOutlook, GoalMilestones, SpendingTips};

/// Trait for insight rules
pub trait InsightRule: Send + Sync {
    /// Human-readable rule name
    fn name(&self) -> &'static str;

    /// Evaluate the grounding snapshot and produce zero or more insights
    fn evaluate(&self, ctx: &GroundingContext, now: DateTime<Utc>) -> Vec<AIInsight>;
}

/// The main insight engine that runs all registered rules
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules registered
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(BudgetAlerts));
        engine.register(Box::new(GoalMilestones));
        engine.register(Box::new(ForecastOutlook));
        engine.register(Box::new(SpendingTips));

        engine
    }

    /// Register an insight rule
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule and rank the results: high > medium > low priority,
    /// most recent first within a tier (stable)
    pub fn generate(&self, ctx: &GroundingContext, now: DateTime<Utc>) -> Vec<AIInsight> {
        let mut insights = vec![];

        for rule in &self.rules {
            let produced = rule.evaluate(ctx, now);
            debug!(rule = rule.name(), count = produced.len(), "Insight rule evaluated");
            insights.extend(produced);
        }

        insights.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        insights
    }
}
