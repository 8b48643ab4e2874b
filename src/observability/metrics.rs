use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, HistogramOpts, IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Cycle metrics
    pub static ref CYCLES_COMPLETED: Counter = Counter::new(
        "cycles_completed_total",
        "Total number of completed poll cycles"
    ).unwrap();

    pub static ref CYCLES_REJECTED: Counter = Counter::new(
        "cycles_rejected_total",
        "Total number of cycles whose snapshot was rejected by the history store"
    ).unwrap();

    // Reading metrics
    pub static ref OBSERVED_READINGS: Counter = Counter::new(
        "observed_readings_total",
        "Total number of readings obtained from live retrieval"
    ).unwrap();

    pub static ref FALLBACK_READINGS: Counter = Counter::new(
        "fallback_readings_total",
        "Total number of readings degraded to the configured fallback price"
    ).unwrap();

    // History metrics
    pub static ref HISTORY_SIZE: IntGauge = IntGauge::new(
        "history_readings",
        "Readings currently retained in the history store"
    ).unwrap();

    // Latency metrics
    pub static ref FETCH_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "fetch_latency_seconds",
            "Per-retailer price lookup latency"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])
    ).unwrap();
}

pub fn register_metrics() {
    REGISTRY.register(Box::new(CYCLES_COMPLETED.clone())).unwrap();
    REGISTRY.register(Box::new(CYCLES_REJECTED.clone())).unwrap();
    REGISTRY.register(Box::new(OBSERVED_READINGS.clone())).unwrap();
    REGISTRY.register(Box::new(FALLBACK_READINGS.clone())).unwrap();
    REGISTRY.register(Box::new(HISTORY_SIZE.clone())).unwrap();
    REGISTRY.register(Box::new(FETCH_LATENCY.clone())).unwrap();
}
