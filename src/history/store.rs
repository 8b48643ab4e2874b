use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{Error, InvariantViolation, Result};
use crate::observability::metrics::HISTORY_SIZE;
use crate::types::reading::{Reading, Snapshot};
use crate::types::timestamp::Timestamp;

/// Append-only log of readings across all past snapshots, ordered by
/// timestamp ascending (ties broken by retailer name, which snapshots
/// already guarantee).
///
/// Mutated only by appending whole snapshots; eviction happens from the
/// front, by count and by age. The age horizon is clamped up to the trend
/// window at construction so a `window(since)` query over the supported
/// window length never loses data to age eviction.
pub struct HistoryStore {
    readings: VecDeque<Reading>,
    max_readings: usize,
    max_age: Duration,
}

impl HistoryStore {
    pub fn new(max_readings: usize, max_age: Duration, window_length: Duration) -> Self {
        HistoryStore {
            readings: VecDeque::new(),
            max_readings,
            max_age: max_age.max(window_length),
        }
    }

    /// Appends all readings of a snapshot, then trims. All-or-nothing: a
    /// snapshot that would break store ordering is rejected whole and the
    /// store is left untouched.
    pub fn append(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Some(last) = self.readings.back() {
            if snapshot.timestamp() < last.timestamp {
                return Err(Error::HistoryCorruption(InvariantViolation {
                    invariant: "history_timestamp_monotonic",
                    details: format!(
                        "snapshot at {} predates stored tail at {}",
                        snapshot.timestamp(),
                        last.timestamp
                    ),
                }));
            }
        }

        self.readings.extend(snapshot.readings().iter().cloned());
        self.trim(snapshot.timestamp());
        HISTORY_SIZE.set(self.readings.len() as i64);
        Ok(())
    }

    fn trim(&mut self, now: Timestamp) {
        while self.readings.len() > self.max_readings {
            self.readings.pop_front();
        }

        let horizon = now - self.max_age;
        while self
            .readings
            .front()
            .map_or(false, |r| r.timestamp < horizon)
        {
            self.readings.pop_front();
        }
    }

    /// The most recent `n` readings, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Reading> {
        let skip = self.readings.len().saturating_sub(n);
        self.readings.iter().skip(skip).cloned().collect()
    }

    /// All readings with `timestamp >= since`, oldest first. Empty when none
    /// qualify, never an error.
    pub fn window(&self, since: Timestamp) -> Vec<Reading> {
        let start = self.readings.partition_point(|r| r.timestamp < since);
        self.readings.iter().skip(start).cloned().collect()
    }

    pub fn readings(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::Price;
    use crate::types::reading::ReadingStatus;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

    fn snapshot(ts_millis: u64, prices: &[(&str, f64)]) -> Snapshot {
        let ts = Timestamp::from_millis(ts_millis);
        let readings = prices
            .iter()
            .map(|(name, price)| Reading {
                retailer: name.to_string(),
                price: Price::from_f64(*price),
                status: ReadingStatus::Observed,
                timestamp: ts,
            })
            .collect();
        Snapshot::new(ts, readings).unwrap()
    }

    #[test]
    fn append_keeps_timestamp_then_retailer_order() {
        let mut store = HistoryStore::new(200, WEEK, WEEK);
        store
            .append(&snapshot(1_000, &[("Zalando", 1249.0), ("Amazon.de", 1299.0)]))
            .unwrap();
        store.append(&snapshot(2_000, &[("Amazon.de", 1290.0)])).unwrap();

        let keys: Vec<_> = store
            .readings()
            .map(|r| (r.timestamp.as_millis(), r.retailer.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1_000, "Amazon.de".to_string()),
                (1_000, "Zalando".to_string()),
                (2_000, "Amazon.de".to_string()),
            ]
        );
    }

    #[test]
    fn count_retention_evicts_oldest_first() {
        // N_max = 6 readings, 2 retailers per snapshot: 3 snapshots fit.
        let mut store = HistoryStore::new(6, WEEK, WEEK);
        for i in 0..5u64 {
            store
                .append(&snapshot(
                    1_000 + i * 1_000,
                    &[("Amazon.de", 1299.0), ("Zalando", 1249.0)],
                ))
                .unwrap();
        }

        assert_eq!(store.len(), 6);
        let oldest = store.readings().next().unwrap();
        assert_eq!(oldest.timestamp, Timestamp::from_millis(3_000));
    }

    #[test]
    fn total_below_capacity_is_fully_retained() {
        let mut store = HistoryStore::new(200, WEEK, WEEK);
        for i in 0..3u64 {
            store
                .append(&snapshot(1_000 + i * 1_000, &[("Otto.de", 1279.0)]))
                .unwrap();
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn age_retention_never_starves_the_trend_window() {
        // max_age shorter than the window gets clamped up to the window.
        let window = Duration::from_secs(60);
        let mut store = HistoryStore::new(200, Duration::from_secs(10), window);

        store.append(&snapshot(0, &[("Amazon.de", 1299.0)])).unwrap();
        store
            .append(&snapshot(30_000, &[("Amazon.de", 1295.0)]))
            .unwrap();

        // 30 s old is past max_age but within the window: must survive.
        assert_eq!(store.len(), 2);

        store
            .append(&snapshot(90_000, &[("Amazon.de", 1290.0)]))
            .unwrap();
        // The reading at t=0 is now past the 60 s window and may go.
        assert_eq!(
            store.readings().next().unwrap().timestamp,
            Timestamp::from_millis(30_000)
        );
    }

    #[test]
    fn window_returns_readings_at_or_after_since() {
        let mut store = HistoryStore::new(200, WEEK, WEEK);
        for i in 0..4u64 {
            store
                .append(&snapshot(1_000 + i * 1_000, &[("Zalando", 1249.0)]))
                .unwrap();
        }

        let hits = store.window(Timestamp::from_millis(3_000));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.timestamp >= Timestamp::from_millis(3_000)));
        assert!(hits.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
    }

    #[test]
    fn window_in_the_future_is_empty() {
        let mut store = HistoryStore::new(200, WEEK, WEEK);
        store.append(&snapshot(1_000, &[("Otto.de", 1279.0)])).unwrap();
        assert!(store.window(Timestamp::from_millis(1_000_000)).is_empty());
    }

    #[test]
    fn tail_returns_most_recent_readings_oldest_first() {
        let mut store = HistoryStore::new(200, WEEK, WEEK);
        for i in 0..4u64 {
            store
                .append(&snapshot(1_000 + i * 1_000, &[("Amazon.de", 1299.0)]))
                .unwrap();
        }

        let tail = store.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].timestamp, Timestamp::from_millis(3_000));
        assert_eq!(tail[1].timestamp, Timestamp::from_millis(4_000));

        assert_eq!(store.tail(100).len(), 4);
    }

    #[test]
    fn timestamp_regression_is_rejected_whole() {
        let mut store = HistoryStore::new(200, WEEK, WEEK);
        store
            .append(&snapshot(5_000, &[("Amazon.de", 1299.0)]))
            .unwrap();

        let err = store
            .append(&snapshot(4_000, &[("Amazon.de", 1298.0)]))
            .unwrap_err();
        assert!(matches!(err, Error::HistoryCorruption(_)));
        assert_eq!(store.len(), 1);
    }
}
