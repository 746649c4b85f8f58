//! Spending aggregator
//!
//! Groups a window's transactions by category and kind into totals and a
//! per-category spending breakdown. Pure and order-independent: the same
//! transaction set produces the same aggregate regardless of input order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Category, CategorySpending, Transaction, TransactionKind};
use crate::period::Window;

/// Aggregated totals and breakdown for one window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowAggregate {
    pub window: Window,
    pub total_spent: f64,
    pub total_income: f64,
    /// Expense categories only, amount descending (ties by category id)
    pub categories: Vec<CategorySpending>,
}

impl WindowAggregate {
    /// The all-zero aggregate for a window with no transactions
    pub fn empty(window: Window) -> Self {
        Self {
            window,
            total_spent: 0.0,
            total_income: 0.0,
            categories: Vec::new(),
        }
    }

    /// Spending amount for one category, 0 when absent
    pub fn category_amount(&self, category_id: Uuid) -> f64 {
        self.categories
            .iter()
            .find(|c| c.category_id == category_id)
            .map(|c| c.amount)
            .unwrap_or(0.0)
    }
}

struct CategoryAccumulator {
    amount: f64,
    count: i64,
}

/// Aggregate the transactions falling inside `window`.
///
/// Expense amounts sum into `total_spent` and the category breakdown;
/// income amounts sum into `total_income` only. A transaction referencing a
/// category id missing from `categories` is a validation error, detected
/// before any output is produced. Zero transactions yield the all-zero
/// aggregate.
pub fn aggregate(
    transactions: &[Transaction],
    categories: &[Category],
    window: &Window,
) -> Result<WindowAggregate> {
    let by_id: BTreeMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let in_window: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| window.contains(tx.occurred_at))
        .collect();

    // Validate every reference up front so a bad record can't leave a
    // partially built aggregate behind
    for tx in &in_window {
        if !by_id.contains_key(&tx.category_id) {
            return Err(Error::Validation(format!(
                "transaction {} references unknown category {}",
                tx.id, tx.category_id
            )));
        }
    }

    let mut total_spent = 0.0;
    let mut total_income = 0.0;
    // BTreeMap keeps grouping deterministic under input permutation
    let mut spending: BTreeMap<Uuid, CategoryAccumulator> = BTreeMap::new();

    for tx in &in_window {
        match tx.kind {
            TransactionKind::Expense => {
                total_spent += tx.amount;
                let entry = spending
                    .entry(tx.category_id)
                    .or_insert(CategoryAccumulator {
                        amount: 0.0,
                        count: 0,
                    });
                entry.amount += tx.amount;
                entry.count += 1;
            }
            TransactionKind::Income => {
                total_income += tx.amount;
            }
        }
    }

    let mut breakdown: Vec<CategorySpending> = spending
        .into_iter()
        .map(|(category_id, acc)| {
            let category = by_id[&category_id];
            CategorySpending {
                category_id,
                category_name: category.name.clone(),
                category_color: category.color.clone(),
                amount: acc.amount,
                percentage: if total_spent > 0.0 {
                    acc.amount / total_spent
                } else {
                    0.0
                },
                transaction_count: acc.count,
            }
        })
        .collect();

    // Amount descending; the id tie-break keeps equal amounts stable
    breakdown.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });

    debug!(
        window = %window,
        transactions = in_window.len(),
        categories = breakdown.len(),
        total_spent,
        total_income,
        "Aggregated window"
    );

    Ok(WindowAggregate {
        window: *window,
        total_spent,
        total_income,
        categories: breakdown,
    })
}
