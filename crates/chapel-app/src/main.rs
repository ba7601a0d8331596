use chapel_app::app::api::routes;
use chapel_app::config::ConfigHandler;
use chapel_app::store_handler::EventStoreHandler;
use chapel_core::config::load_config;
use chapel_core::constants::EVENTS_ROUTE_PREFIX;
use chapel_service::events::MemoryEventStore;
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting chapel schedule server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store = match &config.events.seed_path {
        Some(path) => MemoryEventStore::from_seed_file(path).await?,
        None => {
            tracing::debug!("No events.seed_path configured");
            MemoryEventStore::default()
        }
    };

    if store.is_empty().await {
        tracing::warn!("Event store is empty, the schedule will list nothing");
    } else {
        tracing::info!(
            timezone = %config.schedule.timezone,
            events = store.len().await,
            "Event store ready"
        );
    }

    let bind_addr = config.server.bind_addr();
    let origin = config.server.origin();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(EventStoreHandler { store })
        .hoop(ConfigHandler::new(config))
        .push(routes());

    tracing::info!("Server listening on {bind_addr}, schedule at {origin}{EVENTS_ROUTE_PREFIX}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
