use serde::{Deserialize, Serialize};

use crate::error::{Error, InvariantViolation, Result};
use crate::types::price::Price;
use crate::types::timestamp::Timestamp;

/// How a reading was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    /// Price was retrieved live and parsed successfully.
    Observed,
    /// Live retrieval failed; the configured static fallback price was used.
    Fallback,
}

/// One price observation for one retailer at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub retailer: String,
    pub price: Price,
    pub status: ReadingStatus,
    pub timestamp: Timestamp,
}

/// The complete set of readings produced by one collection round.
///
/// Invariants, enforced at construction: non-empty, no duplicate retailers,
/// all readings share the snapshot timestamp. Readings are kept sorted by
/// retailer name so downstream ordering is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    timestamp: Timestamp,
    readings: Vec<Reading>,
}

impl Snapshot {
    pub fn new(timestamp: Timestamp, mut readings: Vec<Reading>) -> Result<Self> {
        if readings.is_empty() {
            return Err(Error::HistoryCorruption(InvariantViolation {
                invariant: "snapshot_non_empty",
                details: "snapshot must contain at least one reading".to_string(),
            }));
        }

        readings.sort_by(|a, b| a.retailer.cmp(&b.retailer));

        for pair in readings.windows(2) {
            if pair[0].retailer == pair[1].retailer {
                return Err(Error::HistoryCorruption(InvariantViolation {
                    invariant: "snapshot_unique_retailers",
                    details: format!("duplicate retailer {}", pair[0].retailer),
                }));
            }
        }

        for reading in &readings {
            if reading.timestamp != timestamp {
                return Err(Error::HistoryCorruption(InvariantViolation {
                    invariant: "snapshot_single_timestamp",
                    details: format!(
                        "reading for {} stamped {} but snapshot is {}",
                        reading.retailer, reading.timestamp, timestamp
                    ),
                }));
            }
        }

        Ok(Snapshot {
            timestamp,
            readings,
        })
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
