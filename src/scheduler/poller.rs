use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;

use crate::analytics::engine::AnalyticsEngine;
use crate::collect::round::CollectionRound;
use crate::error::Result;
use crate::history::store::HistoryStore;
use crate::interfaces::publisher::{CyclePublisher, CycleUpdate};
use crate::observability::metrics::{CYCLES_COMPLETED, CYCLES_REJECTED};

/// Drives collect -> store -> analyze -> publish on a fixed interval.
///
/// Cycles are strictly sequential. The interval is start-to-start; an
/// overrunning cycle makes the next one start immediately instead of
/// stacking delays. The stop signal is observed only between cycles, so a
/// snapshot is never half-written into the store on shutdown.
pub struct PollScheduler {
    round: CollectionRound,
    history: Arc<RwLock<HistoryStore>>,
    engine: AnalyticsEngine,
    publisher: Arc<dyn CyclePublisher>,
    interval: Duration,
    display_tail: usize,
}

#[derive(Debug)]
enum CycleStage {
    Collecting,
    Storing,
    Analyzing,
    Publishing,
}

impl PollScheduler {
    pub fn new(
        round: CollectionRound,
        history: Arc<RwLock<HistoryStore>>,
        engine: AnalyticsEngine,
        publisher: Arc<dyn CyclePublisher>,
        interval: Duration,
        display_tail: usize,
    ) -> Self {
        PollScheduler {
            round,
            history,
            engine,
            publisher,
            interval,
            display_tail,
        }
    }

    /// Runs until the shutdown signal flips to true (or its sender goes
    /// away). A rejected snapshot skips that cycle's publish but never stops
    /// the loop; only cancellation does.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            retailers = self.round.retailer_count(),
            interval = ?self.interval,
            "poll scheduler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    if let Err(e) = self.run_cycle().await {
                        CYCLES_REJECTED.inc();
                        tracing::error!("cycle rejected: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("poll scheduler stopped");
    }

    async fn run_cycle(&self) -> Result<()> {
        tracing::debug!(stage = ?CycleStage::Collecting);
        let snapshot = self.round.collect().await;

        tracing::debug!(stage = ?CycleStage::Storing, readings = snapshot.len());
        {
            let mut history = self.history.write().await;
            history.append(&snapshot)?;
        }

        tracing::debug!(stage = ?CycleStage::Analyzing);
        let (report, recent) = {
            let history = self.history.read().await;
            let report = self.engine.analyze(&snapshot, &history);
            (report, history.tail(self.display_tail))
        };

        tracing::debug!(stage = ?CycleStage::Publishing, best = %report.current_best);
        self.publisher.publish(CycleUpdate {
            snapshot,
            report,
            recent,
        });

        CYCLES_COMPLETED.inc();
        Ok(())
    }
}
