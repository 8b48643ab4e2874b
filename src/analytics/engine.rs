use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::store::HistoryStore;
use crate::types::price::Price;
use crate::types::reading::{ReadingStatus, Snapshot};
use crate::types::timestamp::Timestamp;

/// Per-retailer derived figures for the current cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetailerReport {
    pub retailer: String,
    pub price: Price,
    pub status: ReadingStatus,
    /// Premium over the cheapest current offer, always >= 0.
    pub savings_abs: Price,
    /// Premium as a percentage of this retailer's own price.
    pub savings_pct: f64,
    pub is_current_best: bool,
}

/// Metrics derived from one snapshot plus the history. Produced and consumed
/// within one cycle, never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceReport {
    pub timestamp: Timestamp,
    pub current_best: Price,
    pub current_average: Price,
    pub retailers: Vec<RetailerReport>,
    pub all_time_best: Price,
    pub all_time_worst: Price,
    pub windowed_best: Price,
    pub windowed_worst: Price,
    pub window_length: Duration,
}

pub struct AnalyticsEngine {
    window_length: Duration,
}

impl AnalyticsEngine {
    pub fn new(window_length: Duration) -> Self {
        AnalyticsEngine { window_length }
    }

    /// Pure function of its inputs: no side effects, no history mutation,
    /// identical inputs yield identical reports.
    pub fn analyze(&self, snapshot: &Snapshot, history: &HistoryStore) -> PriceReport {
        let prices: Vec<Price> = snapshot.readings().iter().map(|r| r.price).collect();

        // Snapshot is non-empty by construction.
        let current_best = prices.iter().copied().min().unwrap_or(Price::zero());
        let current_average = Price::mean(&prices).unwrap_or(current_best);

        let retailers = snapshot
            .readings()
            .iter()
            .map(|r| {
                let savings_abs = r.price - current_best;
                let savings_pct = if r.price.is_positive() && savings_abs.is_positive() {
                    savings_abs.to_f64() / r.price.to_f64() * 100.0
                } else {
                    0.0
                };
                RetailerReport {
                    retailer: r.retailer.clone(),
                    price: r.price,
                    status: r.status,
                    savings_abs,
                    savings_pct,
                    is_current_best: r.price == current_best,
                }
            })
            .collect();

        let (all_time_best, all_time_worst) = match price_bounds(history.readings()) {
            Some(bounds) => bounds,
            None => (current_best, current_best),
        };

        let since = snapshot.timestamp() - self.window_length;
        let windowed = history.window(since);
        let (windowed_best, windowed_worst) = match price_bounds(windowed.iter()) {
            Some(bounds) => bounds,
            // No data in the window: fall back to the current cycle.
            None => (current_best, current_best),
        };

        PriceReport {
            timestamp: snapshot.timestamp(),
            current_best,
            current_average,
            retailers,
            all_time_best,
            all_time_worst,
            windowed_best,
            windowed_worst,
            window_length: self.window_length,
        }
    }
}

fn price_bounds<'a>(
    readings: impl Iterator<Item = &'a crate::types::reading::Reading>,
) -> Option<(Price, Price)> {
    let mut bounds: Option<(Price, Price)> = None;
    for reading in readings {
        bounds = Some(match bounds {
            None => (reading.price, reading.price),
            Some((best, worst)) => (best.min(reading.price), worst.max(reading.price)),
        });
    }
    bounds
}
