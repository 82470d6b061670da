use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::{
    auth::TokenStore,
    file::{profiles::ProfileStore, scenarios::ScenarioStore},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load tokens and open both stores. A malformed tokens file aborts startup.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let storage = &cfg.storage;
    common::env::ensure_dirs(&[storage.scenarios_dir(), storage.profiles_dir()]).await?;

    let tokens = TokenStore::load(&storage.tokens_file).await.map_err(|e| match e {
        service::errors::ServiceError::Config(msg) => StartupError::InvalidConfig(msg),
        other => StartupError::Service(other),
    })?;
    let scenarios = ScenarioStore::new(storage.scenarios_dir()).await?;
    let profiles = ProfileStore::new(storage.profiles_dir()).await?;

    // 只记录数量，不输出 token 明文
    info!(
        tokens = tokens.len(),
        scenarios_dir = %scenarios.dir().display(),
        profiles_dir = %profiles.dir().display(),
        "storage ready"
    );

    Ok(ServerState { tokens: Arc::new(tokens), scenarios, profiles })
}

/// Build the router for a given config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    Ok(routes::build_router(state, build_cors(), cfg.server.max_body_bytes))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, docs = %format!("http://{addr}/docs"), "sync server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
