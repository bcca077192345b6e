use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reminder_cell::{EngineConfig, ReminderEngine, TracingSink};
use shared_config::{AppConfig, PreferencesStore};
use shared_models::records::ScheduleSnapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting patient portal reminder engine");

    let config = AppConfig::from_env();
    let preferences = PreferencesStore::new(&config.preferences_path);

    let engine = ReminderEngine::new(
        Arc::new(TracingSink),
        EngineConfig {
            tick_interval: Duration::from_secs(config.tick_interval_secs),
        },
    );

    let snapshot = load_snapshot(&config.records_path)
        .with_context(|| format!("reading records from {}", config.records_path))?;
    info!(
        prescriptions = snapshot.prescriptions.len(),
        appointments = snapshot.appointments.len(),
        "loaded record snapshot"
    );
    engine.publish_snapshot(snapshot).await;

    if preferences.load().reminders_enabled {
        engine.set_enabled(true);
        engine.start().await;
    } else {
        info!("reminders disabled in stored preferences, engine idle");
    }

    // The records file stands in for the portal's CRUD backend: re-read it
    // periodically and republish so ticks always evaluate current data.
    let refresh_engine = Arc::clone(&engine);
    let records_path = config.records_path.clone();
    let refresh_interval = Duration::from_secs(config.snapshot_refresh_secs);
    tokio::spawn(async move {
        let mut ticker = interval(refresh_interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match load_snapshot(&records_path) {
                Ok(snapshot) => refresh_engine.publish_snapshot(snapshot).await,
                Err(e) => warn!("snapshot refresh failed: {e:#}"),
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("Shutdown signal received");
    engine.stop().await;

    Ok(())
}

fn load_snapshot(path: &str) -> anyhow::Result<ScheduleSnapshot> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
