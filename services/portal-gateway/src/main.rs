//! Portal gateway HTTP service entry point.
//!
//! # Purpose
//! Loads configuration and policies, then serves the gated router and the
//! metrics endpoint until shutdown.
use portal_gateway::app::{build_router, build_state};
use portal_gateway::{config, observability};
use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::GatewayConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::GatewayConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("portal-gateway");
    let state = build_state(&config)?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    tracing::info!(%addr, "portal gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}
