use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use crate::config::RetailerConfig;
use crate::error::{Error, Result};
use crate::sources::adapter::SourceAdapter;
use crate::sources::fetcher::PriceFetcher;
use crate::types::reading::Snapshot;
use crate::types::timestamp::Timestamp;

/// Orchestrates one adapter call per retailer and fixes the results into a
/// single snapshot.
///
/// Adapters run concurrently, each under its own fetch budget, so the round's
/// wall time is bounded by one budget regardless of retailer count. The round
/// never fails: a retailer can only ever degrade to its fallback reading.
pub struct CollectionRound {
    adapters: Vec<SourceAdapter>,
}

impl CollectionRound {
    pub fn new(
        retailers: &[RetailerConfig],
        fetcher: Arc<dyn PriceFetcher>,
        budget: Duration,
    ) -> Result<Self> {
        if retailers.is_empty() {
            return Err(Error::EmptyConfiguration);
        }

        let mut seen = HashSet::new();
        for retailer in retailers {
            if !seen.insert(retailer.name.as_str()) {
                return Err(Error::DuplicateRetailer(retailer.name.clone()));
            }
        }

        let adapters = retailers
            .iter()
            .map(|r| SourceAdapter::new(r.clone(), Arc::clone(&fetcher), budget))
            .collect();

        Ok(CollectionRound { adapters })
    }

    pub fn retailer_count(&self) -> usize {
        self.adapters.len()
    }

    /// Runs all adapters concurrently and returns a complete snapshot, one
    /// reading per retailer, all stamped with the round timestamp.
    pub async fn collect(&self) -> Snapshot {
        let stamp = Timestamp::now();
        let readings = join_all(self.adapters.iter().map(|a| a.fetch(stamp))).await;

        // Construction cannot fail here: the constructor rejected empty and
        // duplicate retailer sets, and every reading carries `stamp`.
        Snapshot::new(stamp, readings).unwrap_or_else(|e| {
            unreachable!("collection round produced an invalid snapshot: {}", e)
        })
    }
}
