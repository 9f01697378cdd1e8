//! Service entrypoint: configuration, pipeline assembly, HTTP serving.

use anyhow::Context;
use pokefusion::{router, AppState};
use pokefusion_catalog::CatalogClient;
use pokefusion_config::Config;
use pokefusion_engine::BattleOrchestrator;
use pokefusion_llm::{GenerativeClient, OpenRouterBackend};
use pokefusion_matchups::Matchups;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pokefusion_utils::logging::init_tracing(false);

    let config = Config::load().context("failed to load configuration")?;

    let catalog = CatalogClient::new(config.catalog.base_url.clone())
        .context("failed to build catalog client")?;
    let backend = OpenRouterBackend::from_config(&config.openrouter)
        .context("failed to build OpenRouter backend")?;
    let generative = GenerativeClient::new(
        Arc::new(backend),
        config.models.generator.clone(),
        config.models.judge.clone(),
    );

    // One-time chart load; a partial or failed load degrades effectiveness
    // queries to neutral instead of blocking startup. The warmed handle
    // lives in the shared state for the rest of the process.
    let matchups = Matchups::new();
    let chart = matchups.load(&catalog).await;
    info!(types_loaded = chart.len(), "type chart warmed");

    let state = Arc::new(AppState {
        orchestrator: BattleOrchestrator::new(catalog.clone(), generative),
        catalog,
        matchups,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, generator = %config.models.generator, judge = %config.models.judge, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
