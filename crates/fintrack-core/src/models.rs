//! Domain models for Fintrack

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::period::PeriodKind;

/// Whether a record represents money going out or coming in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction
///
/// Immutable from the engine's perspective: edits happen upstream and each
/// read reflects current truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner: Uuid,
    pub category_id: Uuid,
    /// Magnitude only; direction comes from `kind`
    pub amount: f64,
    pub kind: TransactionKind,
    pub occurred_at: NaiveDate,
    pub payment_method: String,
    pub receipt_url: Option<String>,
}

/// A spending or income category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub color: String,
    pub kind: TransactionKind,
    pub is_default: bool,
}

/// A spending budget, either category-scoped or whole-account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub owner: Uuid,
    /// None = whole-account budget
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub period: PeriodKind,
    /// Anchors the period-window boundaries
    pub start_date: NaiveDate,
    /// Fraction of `amount` at which near-limit alerting begins, in (0, 1]
    pub alert_threshold: f64,
}

impl Budget {
    /// Check the creation-time invariants the evaluator relies on
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0.0 {
            return Err(Error::Validation(format!(
                "budget {} amount must be positive, got {}",
                self.id, self.amount
            )));
        }
        if self.alert_threshold <= 0.0 || self.alert_threshold > 1.0 {
            return Err(Error::Validation(format!(
                "budget {} alert threshold must be in (0, 1], got {}",
                self.id, self.alert_threshold
            )));
        }
        Ok(())
    }
}

/// Derived budget state; computed fresh per call, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub spent: f64,
    /// amount − spent; negative when over budget
    pub remaining: f64,
    /// spent / amount as a fraction
    pub percentage: f64,
    pub is_over_budget: bool,
    pub is_near_limit: bool,
}

/// Savings goal lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal
///
/// The current amount is not stored here; the goal tracker recomputes it
/// from the contribution history on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub target_amount: f64,
    pub deadline: NaiveDate,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// A deposit (positive) or withdrawal (negative) against a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalContribution {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub amount: f64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Projected goal completion date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "date")]
pub enum Projection {
    /// Expected completion date at the current contribution rate
    Date(NaiveDate),
    /// No positive contribution rate to project from
    Indeterminate,
}

/// Derived goal state produced by the goal tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: Goal,
    /// Signed sum of all contributions; may exceed the target, never clamped
    pub current_amount: f64,
    /// True exactly when the goal is active and the target is met; applying
    /// the status transition is the caller's responsibility
    pub completion_recommended: bool,
    pub projection: Projection,
}

/// Per-category slice of a window's spending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category_id: Uuid,
    pub category_name: String,
    pub category_color: String,
    pub amount: f64,
    /// Fraction of the window's total spending, 0 when the total is 0
    pub percentage: f64,
    pub transaction_count: i64,
}

/// Period-over-period direction of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison of the current window against the previous one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingComparison {
    pub previous_period_amount: f64,
    /// (current − previous) / previous; None when the previous window had
    /// no spending to compare against
    pub change_percentage: Option<f64>,
    pub trend: Trend,
}

/// Composed spending summary for one window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_spent: f64,
    pub total_income: f64,
    pub net_balance: f64,
    pub top_categories: Vec<CategorySpending>,
    pub comparison: SpendingComparison,
}

/// Per-category slice of a spending prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionBreakdown {
    pub category_id: Uuid,
    pub category_name: String,
    pub predicted_amount: f64,
}

/// Projected spending for the next period window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingPrediction {
    /// Human-readable label for the predicted window
    pub period: String,
    pub predicted_amount: f64,
    /// Stability score in [0, 1] derived from historical variance
    pub confidence: f64,
    pub breakdown: Vec<PredictionBreakdown>,
}

/// Classification of a generated insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Tip,
    Warning,
    Achievement,
    Prediction,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tip => "tip",
            Self::Warning => "warning",
            Self::Achievement => "achievement",
            Self::Prediction => "prediction",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How urgent an insight is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    Low,
    Medium,
    High,
}

impl InsightPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl std::fmt::Display for InsightPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generated, ranked insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIInsight {
    pub id: Uuid,
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub priority: InsightPriority,
    pub created_at: DateTime<Utc>,
}

/// Chat participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in a conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}
