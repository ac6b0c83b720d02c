//! Router assembly and server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::{Json, Router};
use datediff_engine::DiffCalculator;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::{AppConfig, ServerConfig};
use crate::graphql::{self, DiffSchema};
use crate::rest;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<DiffCalculator>,
    pub schema: DiffSchema,
}

impl AppState {
    pub fn new(calculator: DiffCalculator) -> Self {
        let calculator = Arc::new(calculator);
        let schema = graphql::build_schema(Arc::clone(&calculator));
        Self { calculator, schema }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DiffCalculator::new())
    }
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(&config.rest_path, post(rest::calculate))
        .route(&config.graphql_path, post(graphql::graphql_handler))
        .with_state(state)
}

/// Build the router from `config`.
///
/// # Errors
///
/// Fails if the configured default timezone is not a valid IANA name.
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let tz = config.calculator.timezone()?;
    let state = AppState::new(DiffCalculator::with_default_timezone(tz));
    Ok(router(state, &config.server))
}

/// Bind the listener and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&config)?;

    let listener = TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    tracing::info!(
        addr = %config.server.bind_addr,
        rest_path = %config.server.rest_path,
        graphql_path = %config.server.graphql_path,
        default_timezone = %config.calculator.default_timezone,
        "datediff server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("datediff server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
