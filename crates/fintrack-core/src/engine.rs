//! Analytics engine facade
//!
//! Wires the pure components to the record store and clock collaborators.
//! Every operation reads a fresh point-in-time snapshot; nothing derived is
//! cached between calls.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::aggregate::{aggregate, WindowAggregate};
use crate::budget::evaluate;
use crate::clock::Clock;
use crate::context::GroundingContext;
use crate::error::Result;
use crate::forecast::{project, DEFAULT_HISTORY_WINDOWS};
use crate::goals::track;
use crate::models::{BudgetStatus, GoalProgress, GoalStatus, SpendingPrediction, SpendingSummary};
use crate::period::{PeriodKind, PeriodWindows, Window};
use crate::store::RecordStore;
use crate::summary::compose;

/// Facade over the aggregation, evaluation, and forecasting components
pub struct AnalyticsEngine {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    history_windows: usize,
}

impl AnalyticsEngine {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            history_windows: DEFAULT_HISTORY_WINDOWS,
        }
    }

    /// Override how many historical windows feed the forecast
    pub fn with_history_windows(mut self, count: usize) -> Self {
        self.history_windows = count;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Aggregate one window of an owner's transactions
    fn aggregate_window(&self, owner: Uuid, window: &Window) -> Result<WindowAggregate> {
        let categories = self.store.list_categories(owner)?;
        let transactions = self.store.list_transactions(owner, window, None)?;
        aggregate(&transactions, &categories, window)
    }

    /// Spending summary for an arbitrary report window, compared against the
    /// window of equal length immediately before it
    pub fn compute_summary(&self, owner: Uuid, window: &Window) -> Result<SpendingSummary> {
        let current = self.aggregate_window(owner, window)?;
        let previous = self.aggregate_window(owner, &window.preceding())?;
        Ok(compose(&current, &previous))
    }

    /// Spending summary for the calendar period containing "now"
    pub fn compute_period_summary(
        &self,
        owner: Uuid,
        kind: PeriodKind,
    ) -> Result<SpendingSummary> {
        let today = self.clock.today();
        let windows = PeriodWindows::containing(kind, kind.calendar_anchor(today), today);
        let current = self.aggregate_window(owner, &windows.current)?;
        let previous = self.aggregate_window(owner, &windows.previous)?;
        Ok(compose(&current, &previous))
    }

    /// Evaluate every budget of an owner against its current period window.
    ///
    /// Spent amounts come straight from the latest transaction snapshot;
    /// nothing is cached across calls.
    pub fn evaluate_budgets(&self, owner: Uuid) -> Result<Vec<BudgetStatus>> {
        let today = self.clock.today();
        let categories = self.store.list_categories(owner)?;
        let budgets = self.store.list_budgets(owner)?;

        let mut statuses = Vec::with_capacity(budgets.len());
        for budget in budgets {
            budget.validate()?;
            let window =
                PeriodWindows::containing(budget.period, budget.start_date, today).current;
            let transactions = self
                .store
                .list_transactions(owner, &window, budget.category_id)?;
            let agg = aggregate(&transactions, &categories, &window)?;
            statuses.push(evaluate(&budget, &agg));
        }

        debug!(owner = %owner, budgets = statuses.len(), "Evaluated budgets");
        Ok(statuses)
    }

    /// Fold contribution history into progress for every goal of an owner
    pub fn track_goals(&self, owner: Uuid) -> Result<Vec<GoalProgress>> {
        let today = self.clock.today();
        let goals = self.store.list_goals(owner)?;

        let mut progress = Vec::with_capacity(goals.len());
        for goal in goals {
            let contributions = self.store.list_contributions(goal.id)?;
            progress.push(track(&goal, &contributions, today));
        }
        Ok(progress)
    }

    /// Project the next period window from recent completed windows
    pub fn forecast(&self, owner: Uuid, kind: PeriodKind) -> Result<SpendingPrediction> {
        let today = self.clock.today();
        let anchor = kind.calendar_anchor(today);

        let mut history = Vec::with_capacity(self.history_windows);
        for window in PeriodWindows::history(kind, anchor, today, self.history_windows) {
            let agg = self.aggregate_window(owner, &window)?;
            // Leading untouched windows carry no signal; drop them so a new
            // account isn't averaged against empty months
            if !history.is_empty() || agg.total_spent > 0.0 || agg.total_income > 0.0 {
                history.push(agg);
            }
        }

        let target = PeriodWindows::next(kind, anchor, today);
        Ok(project(&history, kind.label(&target)))
    }

    /// Assemble the grounding snapshot for chat turns and insight synthesis
    pub fn grounding_context(&self, owner: Uuid) -> Result<GroundingContext> {
        let summary = self.compute_period_summary(owner, PeriodKind::Monthly)?;
        let budgets = self.evaluate_budgets(owner)?;
        let goals = self
            .track_goals(owner)?
            .into_iter()
            .filter(|p| p.goal.status == GoalStatus::Active)
            .collect();
        let prediction = self.forecast(owner, PeriodKind::Monthly)?;

        Ok(GroundingContext {
            summary,
            budgets,
            goals,
            prediction,
        })
    }
}
