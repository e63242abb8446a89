// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Network catalog source abstraction
//!
//! A source issues exactly one request per call and never retries; moving
//! on to another tier is the catalog service's job.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use super::record::{ModelQuery, RawModel};
use crate::error::SourceError;

/// Outcome of one tier attempt
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// A network tier of the catalog
#[async_trait]
pub trait ModelSource: Send + Sync {
    /// Short name used in logs (e.g. "huggingface", "backend")
    fn name(&self) -> &str;

    /// Fetch a model list
    async fn list_models(&self, query: &ModelQuery) -> SourceResult<Vec<RawModel>>;

    /// Fetch one model by id
    async fn get_model(&self, id: &str) -> SourceResult<RawModel>;
}

/// Build the shared HTTP client for catalog sources
pub fn build_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder().user_agent(concat!("trendmind/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    match builder.build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
            Client::new()
        }
    }
}

/// GET a URL and return the body parsed as JSON.
///
/// Non-2xx statuses become `HttpStatus`, transport failures `Network`, and
/// a body that is not JSON `Parse`.
pub(crate) async fn fetch_json(
    client: &Client,
    url: &str,
    query: &[(&'static str, String)],
) -> SourceResult<Value> {
    let response: Response = client
        .get(url)
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| SourceError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    let text = response
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read response body: {}", e)))?;

    serde_json::from_str(&text).map_err(|e| SourceError::Parse(format!("Invalid JSON: {}", e)))
}

/// Parse the entries of a model list.
///
/// Entries that are not objects are dropped with a warning; the rest of
/// the list is kept.
pub(crate) fn parse_model_array(items: Vec<Value>) -> Vec<RawModel> {
    let total = items.len();
    let models: Vec<RawModel> = items
        .into_iter()
        .filter_map(|item| match parse_model_object(item) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("Skipping model list entry: {}", e);
                None
            }
        })
        .collect();
    if models.len() < total {
        tracing::warn!("Dropped {} of {} model list entries", total - models.len(), total);
    }
    models
}

/// Parse a single JSON object into a raw model. Any object is accepted.
pub(crate) fn parse_model_object(value: Value) -> SourceResult<RawModel> {
    match value {
        Value::Object(map) => Ok(RawModel::from_map(&map)),
        other => Err(SourceError::Parse(format!(
            "Expected a model object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
