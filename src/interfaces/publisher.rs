use tokio::sync::mpsc;

use crate::analytics::engine::PriceReport;
use crate::types::reading::{Reading, ReadingStatus, Snapshot};

/// What the presentation boundary receives once per cycle.
#[derive(Clone, Debug)]
pub struct CycleUpdate {
    pub snapshot: Snapshot,
    pub report: PriceReport,
    /// The most recent readings for trend display, oldest first.
    pub recent: Vec<Reading>,
}

/// Hand-off seam to whatever renders results. Implementations must not block
/// the scheduler: the next cycle starts on time regardless of how slowly the
/// consumer processes updates.
pub trait CyclePublisher: Send + Sync {
    fn publish(&self, update: CycleUpdate);
}

/// Fire-and-forget publisher over a bounded channel. A lagging consumer
/// drops the update with a warning rather than delaying the scheduler.
pub struct ChannelPublisher {
    tx: mpsc::Sender<CycleUpdate>,
}

impl ChannelPublisher {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<CycleUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        (ChannelPublisher { tx }, rx)
    }
}

impl CyclePublisher for ChannelPublisher {
    fn publish(&self, update: CycleUpdate) {
        if let Err(e) = self.tx.try_send(update) {
            tracing::warn!("presentation consumer lagging, dropping cycle update: {}", e);
        }
    }
}

/// Renders a one-line summary per retailer straight to the log.
pub struct LogPublisher;

impl CyclePublisher for LogPublisher {
    fn publish(&self, update: CycleUpdate) {
        render_report(&update.report);
    }
}

pub fn render_report(report: &PriceReport) {
    let updated = chrono::DateTime::from_timestamp_millis(report.timestamp.as_millis() as i64)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| report.timestamp.to_string());
    tracing::info!("prices updated {}", updated);
    for row in &report.retailers {
        let tag = match row.status {
            ReadingStatus::Observed => "",
            ReadingStatus::Fallback => " [fallback]",
        };
        if row.is_current_best {
            tracing::info!(
                "  {} {}{} <- best deal",
                row.retailer,
                row.price,
                tag
            );
        } else {
            tracing::info!(
                "  {} {}{} (save {} / {:.1}% at best)",
                row.retailer,
                row.price,
                tag,
                row.savings_abs,
                row.savings_pct
            );
        }
    }
    tracing::info!(
        "  best {} | avg {} | {:?}-window {}..{} | all-time {}..{}",
        report.current_best,
        report.current_average,
        report.window_length,
        report.windowed_best,
        report.windowed_worst,
        report.all_time_best,
        report.all_time_worst
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::Price;
    use crate::types::timestamp::Timestamp;
    use std::time::Duration;

    fn update() -> CycleUpdate {
        let ts = Timestamp::from_millis(1_000);
        let snapshot = Snapshot::new(
            ts,
            vec![Reading {
                retailer: "Amazon.de".to_string(),
                price: Price::from_f64(1299.0),
                status: ReadingStatus::Observed,
                timestamp: ts,
            }],
        )
        .unwrap();
        let report = PriceReport {
            timestamp: ts,
            current_best: Price::from_f64(1299.0),
            current_average: Price::from_f64(1299.0),
            retailers: vec![],
            all_time_best: Price::from_f64(1299.0),
            all_time_worst: Price::from_f64(1299.0),
            windowed_best: Price::from_f64(1299.0),
            windowed_worst: Price::from_f64(1299.0),
            window_length: Duration::from_secs(60),
        };
        CycleUpdate {
            snapshot,
            report,
            recent: vec![],
        }
    }

    #[tokio::test]
    async fn channel_publisher_delivers_updates() {
        let (publisher, mut rx) = ChannelPublisher::new(4);
        publisher.publish(update());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.snapshot.len(), 1);
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (publisher, mut rx) = ChannelPublisher::new(1);
        publisher.publish(update());
        publisher.publish(update()); // dropped, not blocked on

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }
}
