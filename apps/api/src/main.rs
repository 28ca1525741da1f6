mod config;
mod errors;
mod opportunities;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::opportunities::aggregator::Aggregator;
use crate::opportunities::scheduler::spawn_refresh_task;
use crate::opportunities::service::OpportunityService;
use crate::opportunities::sources::default_sources;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting opportunities API v{}", env!("CARGO_PKG_VERSION"));

    // Register sources; order decides which duplicate survives
    let aggregator = Aggregator::new(default_sources()).with_default_timeout(config.source_timeout);
    info!("Registered sources: {:?}", aggregator.source_names());

    let service = Arc::new(OpportunityService::new(aggregator, config.snapshot_ttl));

    if config.refresh_interval.is_zero() {
        info!("Background refresh disabled; snapshots rebuild on read");
    } else {
        spawn_refresh_task(Arc::clone(&service), config.refresh_interval);
        info!(
            "Background refresh every {}s",
            config.refresh_interval.as_secs()
        );
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        opportunities: service,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
