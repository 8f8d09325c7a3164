//! HTTP transport for the JSON-RPC facade
//!
//! Serves the same request pipeline as the stdio loop: `POST /rpc` takes one
//! JSON-RPC request per call, `GET /health` reports liveness and the current
//! tool count.

use super::server::McpServer;
use crate::inventory::InventoryStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 7777).into(),
        }
    }
}

/// HTTP server state
#[derive(Clone)]
struct AppState {
    /// Shared request pipeline
    server: Arc<McpServer>,
    /// Inventory backing the health report
    store: Arc<InventoryStore>,
}

/// HTTP server exposing the JSON-RPC facade
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over a shared inventory
    pub fn new(config: HttpServerConfig, server: Arc<McpServer>, store: Arc<InventoryStore>) -> Self {
        Self {
            config,
            state: AppState { server, store },
        }
    }

    /// Build router
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/rpc", post(rpc_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until the process stops
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = Self::build_router(self.state);

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;
        info!("HTTP JSON-RPC server listening on http://{}", self.config.addr);
        axum::serve(listener, router).await?;
        Ok(())
    }
}

/// JSON-RPC handler; notifications get 202 with no body
async fn rpc_handler(State(state): State<AppState>, body: String) -> Response {
    match state.server.process_request(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    tools: usize,
}

async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    match state.store.count().await {
        Ok(tools) => Ok(Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            tools,
        })),
        Err(e) => {
            error!("Health check failed to read inventory: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
