//! Forecast engine
//!
//! Projects the next window's spending from the aggregates of recent
//! windows of the same period kind. A deterministic statistical projection:
//! recency-weighted averages plus a variance-derived confidence score, no
//! learned model.

use std::collections::BTreeMap;

use tracing::debug;
use uuid::Uuid;

use crate::aggregate::WindowAggregate;
use crate::models::{PredictionBreakdown, SpendingPrediction};

/// Default number of historical windows fed into a projection
pub const DEFAULT_HISTORY_WINDOWS: usize = 3;

/// Project the next window's total and per-category spending.
///
/// `history` is ordered oldest first. Totals are combined with linearly
/// increasing recency weights (the most recent window weighs most); with
/// fewer than two windows the projection falls back to the most recent
/// total and reports zero confidence. Confidence is one minus the
/// coefficient of variation of the totals, clamped to [0, 1] — identical
/// totals give full confidence. Categories appear in the breakdown only if
/// at least one history window saw them, with zero filled in for the
/// windows that did not.
pub fn project(history: &[WindowAggregate], period: impl Into<String>) -> SpendingPrediction {
    let period = period.into();
    let k = history.len();

    if k == 0 {
        return SpendingPrediction {
            period,
            predicted_amount: 0.0,
            confidence: 0.0,
            breakdown: Vec::new(),
        };
    }

    let totals: Vec<f64> = history.iter().map(|w| w.total_spent).collect();

    let (predicted_amount, confidence) = if k < 2 {
        (totals[k - 1], 0.0)
    } else {
        (weighted_average(&totals), 1.0 - coefficient_of_variation(&totals).clamp(0.0, 1.0))
    };

    let breakdown = category_breakdown(history, k);

    debug!(
        period = %period,
        windows = k,
        predicted_amount,
        confidence,
        "Projected spending"
    );

    SpendingPrediction {
        period,
        predicted_amount,
        confidence,
        breakdown,
    }
}

/// Average with weights 1..=n, most recent value weighted highest
fn weighted_average(values: &[f64]) -> f64 {
    let weight_sum: f64 = (1..=values.len()).map(|w| w as f64).sum();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum::<f64>()
        / weight_sum
}

/// Population standard deviation over mean; 0 for zero-variance input
fn coefficient_of_variation(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        // All-equal totals, including all-zero: perfectly stable
        0.0
    } else {
        // std_dev > 0 with non-negative totals implies mean > 0
        std_dev / mean
    }
}

fn category_breakdown(history: &[WindowAggregate], k: usize) -> Vec<PredictionBreakdown> {
    // Every category observed anywhere in the history, with its most
    // recently seen name
    let mut names: BTreeMap<Uuid, String> = BTreeMap::new();
    for window in history {
        for cat in &window.categories {
            names.insert(cat.category_id, cat.category_name.clone());
        }
    }

    let mut breakdown: Vec<PredictionBreakdown> = names
        .into_iter()
        .map(|(category_id, category_name)| {
            let series: Vec<f64> = history
                .iter()
                .map(|w| w.category_amount(category_id))
                .collect();
            let predicted_amount = if k < 2 {
                series[k - 1]
            } else {
                weighted_average(&series)
            };
            PredictionBreakdown {
                category_id,
                category_name,
                predicted_amount,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.predicted_amount
            .partial_cmp(&a.predicted_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });

    breakdown
}
