// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Catalog backend server
//!
//! Serves the static dataset over the `/api/models` surface that the
//! backend tier of the catalog consumes:
//!
//! - `GET  /api/models?limit=&sort=&filter=&page=` - paginated list
//! - `GET  /api/models/{id}` - one model (ids may contain a slash)
//! - `POST /api/models/batch` - several models by id
//! - `GET  /api/models/search/{query}?limit=` - name/description search
//! - `GET  /health`

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::StaticCatalog;
use crate::error::{Result, TrendError};

pub mod handlers;
pub mod pagination;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StaticCatalog>,
}

impl AppState {
    pub fn new(catalog: StaticCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/models", get(handlers::list_models))
        .route("/api/models/batch", post(handlers::batch_models))
        .route("/api/models/search/:query", get(handlers::search_models))
        .route("/api/models/:id", get(handlers::get_model))
        .route("/api/models/:owner/:name", get(handlers::get_owned_model))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| TrendError::Config(format!("Invalid listen address {}:{}: {}", host, port, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Catalog backend listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TrendError::Server(e.to_string()))?;

    tracing::info!("Catalog backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
