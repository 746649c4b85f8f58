//! Fintrack Core Library
//!
//! The financial analytics and insight generation engine for Fintrack:
//! - Period-window arithmetic for budgets and reports
//! - Transaction aggregation and spending summaries
//! - Budget evaluation and savings-goal tracking
//! - Short-horizon spending forecasts
//! - Pluggable language-generation backends (Gemini, mock)
//! - A grounded, streaming chat assistant with ranked insight synthesis
//!
//! Records live in an external store the engine only reads; see
//! `RecordStore`. All analytics components are pure functions of their
//! inputs; the assistant is the only stateful component.

pub mod aggregate;
pub mod ai;
pub mod assistant;
pub mod budget;
pub mod clock;
pub mod context;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod goals;
pub mod insights;
pub mod models;
pub mod period;
pub mod store;
pub mod summary;

pub use aggregate::{aggregate, WindowAggregate};
pub use ai::{AIClient, ChatBackend, ChatStream, GeminiBackend, MockBackend, MockFailure};
pub use assistant::{ChatEvent, ChatSession, InsightAssistant, SessionState};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::GroundingContext;
pub use engine::AnalyticsEngine;
pub use error::{Error, Result};
pub use insights::{InsightEngine, InsightRule};
pub use models::{
    AIInsight, Budget, BudgetStatus, Category, CategorySpending, ChatMessage, ChatRole, Goal,
    GoalContribution, GoalProgress, GoalStatus, InsightKind, InsightPriority, PredictionBreakdown,
    Projection, SpendingComparison, SpendingPrediction, SpendingSummary, Transaction,
    TransactionKind, Trend,
};
pub use period::{PeriodKind, PeriodWindows, Window};
pub use store::{MemoryStore, RecordStore};
