use crate::app_config::AppConfig;
use crate::message_listener::message_listener;
use crate::registry::PropertyRegistry;
use crate::session::{DeviceSession, sensor_plan};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, info};

mod app_config;
mod color_normalizer;
mod domain;
mod message_listener;
mod registry;
mod session;
mod thing;
mod thingy;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt().with_max_level(config.core().log_level()).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("✅ Loaded configuration");

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let registry = PropertyRegistry::from_table(thing::property_table(), thing::event_table(), command_tx, config.core().message_buffer_size())?;
    debug!("Thing description: {}", thing::describe(&registry));

    let messages = registry.subscribe();
    task::spawn(async move {
        message_listener(messages).await;
    });
    info!("✅ Initialized message listener");

    let device = thingy::discover(config.device()).await?;

    let mut session = DeviceSession::new(Arc::new(device), registry.shared(), command_rx, sensor_plan(config.sensors()));
    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    session.run().await;
    info!("Session ended in state {}", session.state());

    let registry = session.registry();
    for property in registry.read().await.properties() {
        info!(property = property.name(), "🔹 Last value of '{}': {}", property.name(), property.value());
    }

    Ok(())
}
