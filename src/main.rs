//! priceintel — multi-retailer price tracker.
//!
//! Polls every configured retailer on a fixed cadence, keeps a bounded
//! in-memory history of readings, and derives savings/trend metrics each
//! cycle. Polling interval, retention size, and trend window come from
//! config/default.toml (overridable per environment via PRICEINTEL_ENV and
//! PRICEINTEL_* environment variables). Runs until Ctrl-C.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::info;

use priceintel::analytics::AnalyticsEngine;
use priceintel::collect::CollectionRound;
use priceintel::config::loader::AppConfig;
use priceintel::history::HistoryStore;
use priceintel::interfaces::publisher::{render_report, ChannelPublisher};
use priceintel::observability::metrics::register_metrics;
use priceintel::observability::telemetry::init_telemetry;
use priceintel::scheduler::PollScheduler;
use priceintel::sources::HttpFetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();
    register_metrics();

    let env = std::env::var("PRICEINTEL_ENV").unwrap_or_else(|_| "default".to_string());
    let config = AppConfig::load(&env)?;

    info!(
        product = %config.tracker.product,
        retailers = config.retailers.len(),
        interval = ?config.tracker.poll_interval,
        "starting price tracking"
    );

    let round = CollectionRound::new(
        &config.retailers,
        Arc::new(HttpFetcher::new()),
        config.tracker.fetch_budget,
    )?;

    let history = Arc::new(RwLock::new(HistoryStore::new(
        config.tracker.retention_max_readings,
        config.tracker.max_reading_age,
        config.tracker.trend_window,
    )));

    let (publisher, mut updates) = ChannelPublisher::new(8);

    // Presentation consumer: renders each cycle's report to the log. Stands
    // in for a dashboard; the scheduler never waits on it.
    let product = config.tracker.product.clone();
    let consumer = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            info!(
                "{} — cycle at {} ({} readings retained)",
                product,
                update.report.timestamp,
                update.recent.len()
            );
            render_report(&update.report);
        }
    });

    let scheduler = PollScheduler::new(
        round,
        history,
        AnalyticsEngine::new(config.tracker.trend_window),
        Arc::new(publisher),
        config.tracker.poll_interval,
        config.tracker.display_tail,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    scheduler.run(shutdown_rx).await;
    consumer.abort();
    Ok(())
}
