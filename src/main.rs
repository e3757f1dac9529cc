use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marine_forecast_proxy::app;
use marine_forecast_proxy::config::{Args, ProxyConfig};
use marine_forecast_proxy::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marine_forecast_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();
    let config = ProxyConfig::from_args(&args)?;

    tracing::info!(
        port = args.port,
        upstream = %config.upstream_base,
        origin = ?config.allowed_origin,
        zones = config.zones.len(),
        rate_limit = config.rate_limit.max_requests,
        rate_window_secs = config.rate_limit.window.as_secs(),
        "marine-forecast-proxy starting"
    );

    let state = Arc::new(AppState::new(config)?);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
