use std::sync::Arc;

use house_server::{Config, MemStore, ReservationScheduler, events, logger};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logger::init_logger();

    tracing::info!("front-of-house engine starting...");

    let config = Config::from_env();
    tracing::info!(environment = %config.environment, "configuration loaded");

    let store = Arc::new(MemStore::new());
    let (event_tx, mut event_rx) = events::event_channel();

    // log the domain event stream until a transport is attached
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            tracing::debug!(topic = event.topic(), "domain event");
        }
    });

    let cancel = CancellationToken::new();
    let scheduler = ReservationScheduler::new(store, event_tx, &config);
    let scheduler_handle = tokio::spawn(scheduler.run(cancel.clone()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    cancel.cancel();
    scheduler_handle.await?;
    tracing::info!("front-of-house engine stopped");

    Ok(())
}
