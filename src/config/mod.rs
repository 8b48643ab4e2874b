use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod loader;

/// One configured price source. Immutable for the process lifetime.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RetailerConfig {
    /// Stable display name, also the retailer key in readings.
    pub name: String,
    /// Opaque locator handed to the price fetcher (URL for the HTTP fetcher).
    pub locator: String,
    /// Static price used when live retrieval fails.
    pub fallback_price: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Product label, used for logging only.
    pub product: String,
    /// Start-to-start spacing between poll cycles.
    pub poll_interval: Duration,
    /// Per-retailer fetch budget within one cycle.
    pub fetch_budget: Duration,
    /// Maximum readings retained in the history store.
    pub retention_max_readings: usize,
    /// Readings older than this are evicted, clamped up to `trend_window`.
    pub max_reading_age: Duration,
    /// Trailing span for windowed best/worst metrics.
    pub trend_window: Duration,
    /// Number of recent readings handed to the presentation boundary.
    pub display_tail: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            product: "iPhone 16 Pro 256GB".to_string(),
            poll_interval: Duration::from_secs(30),
            fetch_budget: Duration::from_secs(5),
            retention_max_readings: 200,
            max_reading_age: Duration::from_secs(7 * 24 * 3600),
            trend_window: Duration::from_secs(7 * 24 * 3600),
            display_tail: 40,
        }
    }
}
