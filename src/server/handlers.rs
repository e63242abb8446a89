// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Route handlers for the catalog backend

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::pagination::Pagination;
use super::AppState;
use crate::catalog::record::DEFAULT_LIMIT;
use crate::catalog::{ModelQuery, ModelRecord, SortOrder};
use crate::error::TrendError;

/// Error type for handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<TrendError> for ApiError {
    fn from(err: TrendError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Query parameters of `GET /api/models`
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub filter: String,
    #[serde(default = "default_page")]
    pub page: usize,
}

/// Query parameters of the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_page() -> usize {
    1
}

/// One page of models
#[derive(Debug, Serialize)]
pub struct ModelPage {
    pub models: Vec<ModelRecord>,
    pub pagination: Pagination,
}

/// GET /api/models
pub async fn list_models(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<ModelPage> {
    let sort = params
        .sort
        .as_deref()
        .map(SortOrder::parse)
        .unwrap_or_default();
    let query = ModelQuery::default()
        .with_limit(params.limit)
        .with_sort(sort)
        .with_filter(params.filter);

    let matching = state.catalog.select(&query)?;
    let pagination = Pagination::new(matching.len(), params.page, params.limit);
    let models = pagination.slice(&matching).to_vec();

    tracing::debug!(
        "Serving page {}/{} ({} models)",
        pagination.page,
        pagination.pages,
        models.len()
    );

    Ok(Json(ModelPage { models, pagination }))
}

/// GET /api/models/:id
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ModelRecord> {
    lookup(&state, &id)
}

/// GET /api/models/:owner/:name
pub async fn get_owned_model(
    State(state): State<AppState>,
    Path((owner, name)): Path<(String, String)>,
) -> ApiResult<ModelRecord> {
    lookup(&state, &format!("{}/{}", owner, name))
}

fn lookup(state: &AppState, id: &str) -> ApiResult<ModelRecord> {
    state
        .catalog
        .find(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Model not found".to_string()))
}

/// POST /api/models/batch
///
/// Body `{"ids": [...]}`; results keep dataset order.
pub async fn batch_models(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Vec<ModelRecord>> {
    let ids: Vec<String> = match body.get("ids") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => {
            return Err(ApiError::BadRequest(
                "Invalid request. Expected array of ids.".to_string(),
            ))
        }
    };

    Ok(Json(state.catalog.find_many(&ids)?))
}

/// GET /api/models/search/:query
pub async fn search_models(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<ModelRecord>> {
    Ok(Json(state.catalog.search(&query, params.limit)?))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
