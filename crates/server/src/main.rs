mod api;
mod db;
mod entity;
mod repository;

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arena_judge::{Judge, JudgeConfig, LeaderboardBroker};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{AppState, create_router};
use crate::repository::Repositories;

const DEFAULT_CONFIG_PATH: &str = "arena.toml";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting arena server");
    let config = load_config()?;

    let db = db::init_pool_and_migrate()
        .await
        .context("failed to initialize database")?;
    info!("database migrations applied");

    let state = Arc::new(AppState::new(
        Repositories::sea_orm(db),
        Arc::new(Judge::from_config(&config)),
        Arc::new(LeaderboardBroker::from_config(&config.broker)),
    ));

    let bind_addr = env::var("ARENA_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

fn load_config() -> anyhow::Result<JudgeConfig> {
    let path = env::var("ARENA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        warn!(%path, "config file not found, using defaults");
        return Ok(JudgeConfig::default());
    }

    info!(%path, "loading judge config");
    JudgeConfig::from_file(&path)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, stopping server"),
        Err(err) => warn!(error = %err, "failed to listen for shutdown signal"),
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
