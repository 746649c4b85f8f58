//! Record store collaborator
//!
//! The engine reads transactions, budgets, and goals from an external store
//! it does not own. Every read is a point-in-time snapshot; callers needing
//! strict consistency across reads must supply a single consistent snapshot
//! themselves. `MemoryStore` is the in-crate implementation used by tests
//! and embedders.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Budget, Category, Goal, GoalContribution, Transaction};
use crate::period::Window;

/// Read-only contract over the external record store
pub trait RecordStore: Send + Sync {
    /// Transactions for an owner with `occurred_at` inside the window,
    /// optionally scoped to one category
    fn list_transactions(
        &self,
        owner: Uuid,
        window: &Window,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Transaction>>;

    fn list_categories(&self, owner: Uuid) -> Result<Vec<Category>>;

    fn list_budgets(&self, owner: Uuid) -> Result<Vec<Budget>>;

    fn list_goals(&self, owner: Uuid) -> Result<Vec<Goal>>;

    fn list_contributions(&self, goal_id: Uuid) -> Result<Vec<GoalContribution>>;
}

/// In-memory record store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    contributions: HashMap<Uuid, Vec<GoalContribution>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_transaction(&self, tx: Transaction) {
        self.write().transactions.push(tx);
    }

    pub fn insert_category(&self, category: Category) {
        self.write().categories.push(category);
    }

    pub fn insert_budget(&self, budget: Budget) {
        self.write().budgets.push(budget);
    }

    pub fn insert_goal(&self, goal: Goal) {
        self.write().goals.push(goal);
    }

    pub fn insert_contribution(&self, contribution: GoalContribution) {
        self.write()
            .contributions
            .entry(contribution.goal_id)
            .or_default()
            .push(contribution);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryStoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryStoreInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn list_transactions(
        &self,
        owner: Uuid,
        window: &Window,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .read()
            .transactions
            .iter()
            .filter(|tx| tx.owner == owner && window.contains(tx.occurred_at))
            .filter(|tx| category_id.map_or(true, |c| tx.category_id == c))
            .cloned()
            .collect())
    }

    fn list_categories(&self, owner: Uuid) -> Result<Vec<Category>> {
        Ok(self
            .read()
            .categories
            .iter()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect())
    }

    fn list_budgets(&self, owner: Uuid) -> Result<Vec<Budget>> {
        Ok(self
            .read()
            .budgets
            .iter()
            .filter(|b| b.owner == owner)
            .cloned()
            .collect())
    }

    fn list_goals(&self, owner: Uuid) -> Result<Vec<Goal>> {
        Ok(self
            .read()
            .goals
            .iter()
            .filter(|g| g.owner == owner)
            .cloned()
            .collect())
    }

    fn list_contributions(&self, goal_id: Uuid) -> Result<Vec<GoalContribution>> {
        Ok(self
            .read()
            .contributions
            .get(&goal_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Store that fails every read; exercises the data-unavailable paths in tests
pub struct UnavailableStore;

impl RecordStore for UnavailableStore {
    fn list_transactions(
        &self,
        _owner: Uuid,
        _window: &Window,
        _category_id: Option<Uuid>,
    ) -> Result<Vec<Transaction>> {
        Err(Error::DataUnavailable("record store unreachable".into()))
    }

    fn list_categories(&self, _owner: Uuid) -> Result<Vec<Category>> {
        Err(Error::DataUnavailable("record store unreachable".into()))
    }

    fn list_budgets(&self, _owner: Uuid) -> Result<Vec<Budget>> {
        Err(Error::DataUnavailable("record store unreachable".into()))
    }

    fn list_goals(&self, _owner: Uuid) -> Result<Vec<Goal>> {
        Err(Error::DataUnavailable("record store unreachable".into()))
    }

    fn list_contributions(&self, _goal_id: Uuid) -> Result<Vec<GoalContribution>> {
        Err(Error::DataUnavailable("record store unreachable".into()))
    }
}
