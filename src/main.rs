//! Process entry point: loads configuration, wires the registry and bus,
//! and idles until shutdown. Socket framing is intentionally not this
//! crate's concern (spec Non-goals) — a real deployment puts a WebSocket
//! layer in front of `net::Gateway` and forwards frames to `dispatch`.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use warlock_server::bus::OutboundSender;
use warlock_server::catalog::Catalog;
use warlock_server::config::Config;
use warlock_server::net::Gateway;
use warlock_server::registry::Registry;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(port = config.port, max_rooms = config.max_rooms, "starting warlock room server");

    let catalog = Arc::new(Catalog::default_catalog());
    let outbound = OutboundSender::new();
    let registry = Registry::new(catalog, config.clone(), outbound);
    let _gateway = Gateway::new(registry.clone());

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => tracing::error!(%err, "failed to listen for shutdown signal"),
    }

    tracing::info!(rooms = registry.room_count(), "shutting down");
}
