use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::config::RetailerConfig;
use crate::error::{Error, Result};
use crate::observability::metrics::{FALLBACK_READINGS, FETCH_LATENCY, OBSERVED_READINGS};
use crate::sources::fetcher::PriceFetcher;
use crate::types::price::Price;
use crate::types::reading::{Reading, ReadingStatus};
use crate::types::timestamp::Timestamp;

/// One price lookup per retailer per cycle, with the fallback policy baked in.
///
/// Every failure mode of the underlying fetcher — timeout, transport error,
/// missing price field, unparseable text — produces a Fallback reading with
/// the retailer's configured static price. The adapter itself never fails.
pub struct SourceAdapter {
    retailer: RetailerConfig,
    fetcher: Arc<dyn PriceFetcher>,
    budget: Duration,
    fallback_price: Price,
}

impl SourceAdapter {
    pub fn new(retailer: RetailerConfig, fetcher: Arc<dyn PriceFetcher>, budget: Duration) -> Self {
        let fallback_price = Price::from_f64(retailer.fallback_price);
        SourceAdapter {
            retailer,
            fetcher,
            budget,
            fallback_price,
        }
    }

    pub fn retailer_name(&self) -> &str {
        &self.retailer.name
    }

    /// Performs exactly one lookup. No retries within a cycle; a degraded
    /// retailer gets another chance on the next poll.
    pub async fn fetch(&self, stamp: Timestamp) -> Reading {
        let started = Instant::now();
        let outcome = self.try_fetch().await;
        FETCH_LATENCY.observe(started.elapsed().as_secs_f64());

        match outcome {
            Ok(price) => {
                OBSERVED_READINGS.inc();
                Reading {
                    retailer: self.retailer.name.clone(),
                    price,
                    status: ReadingStatus::Observed,
                    timestamp: stamp,
                }
            }
            Err(e) => {
                FALLBACK_READINGS.inc();
                tracing::warn!(
                    retailer = %self.retailer.name,
                    fallback = %self.fallback_price,
                    "lookup failed, using fallback: {}",
                    e
                );
                Reading {
                    retailer: self.retailer.name.clone(),
                    price: self.fallback_price,
                    status: ReadingStatus::Fallback,
                    timestamp: stamp,
                }
            }
        }
    }

    async fn try_fetch(&self) -> Result<Price> {
        let raw = timeout(
            self.budget,
            self.fetcher.fetch_raw(&self.retailer.name, &self.retailer.locator),
        )
        .await
        .map_err(|_| Error::SourceUnavailable {
            retailer: self.retailer.name.clone(),
            reason: format!("timed out after {:?}", self.budget),
        })??;

        parse_price(&raw).ok_or_else(|| Error::MalformedPrice {
            retailer: self.retailer.name.clone(),
            raw,
        })
    }
}

/// Parses retail price text into a valid positive price. Tolerates currency
/// symbols, whitespace, and both `1,299.00` and `1.299,00` separator styles.
pub fn parse_price(raw: &str) -> Option<Price> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        // Both present: the later separator is the decimal point.
        (Some(dot), Some(comma)) if comma > dot => {
            cleaned.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    let value: f64 = normalized.parse().ok()?;
    if value > 0.0 && value.is_finite() {
        Some(Price::from_f64(value))
    } else {
        None
    }
}
