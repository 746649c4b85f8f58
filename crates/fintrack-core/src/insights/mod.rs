//! Insight engine - ranked financial insights
//!
//! Instead of waiting for users to ask the right questions, the insight
//! engine turns the grounding snapshot into a ranked list of structured
//! insights: budget warnings, goal achievements, forecast outlooks, and
//! spending tips. Synthesis is rule-based and deterministic; it never
//! touches the chat history or the language-generation service.

pub mod budget_alerts;
pub mod engine;
pub mod forecast_outlook;
pub mod goal_milestones;
pub mod spending_tips;

pub use budget_alerts::BudgetAlerts;
pub use engine::{InsightEngine, InsightRule};
pub use forecast_outlook::ForecastOutlook;
pub use goal_milestones::GoalMilestones;
pub use spending_tips::SpendingTips;
