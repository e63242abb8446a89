// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Same-origin backend catalog source (secondary tier)
//!
//! Talks to the backend served by `trendmind serve` (or any server with the
//! same `/api/models` surface). The list endpoint may answer with either
//! `{ "models": [...] }` or a bare array.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::record::{ModelQuery, RawModel};
use super::source::{
    fetch_json, json_kind, parse_model_array, parse_model_object, ModelSource, SourceResult,
};
use crate::error::SourceError;

/// Default backend address (the backend's default port)
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Client for the backend's `/api/models` endpoints
pub struct BackendSource {
    client: Client,
    base_url: String,
}

impl BackendSource {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BACKEND_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull the model array out of a list payload
fn unwrap_model_list(value: Value) -> SourceResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("models") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(SourceError::Parse(format!(
                "Backend `models` field is not an array (got {})",
                json_kind(&other)
            ))),
            None => Err(SourceError::Parse(
                "Backend model list has no `models` field".to_string(),
            )),
        },
        other => Err(SourceError::Parse(format!(
            "Backend model list is not an array or object (got {})",
            json_kind(&other)
        ))),
    }
}

#[async_trait]
impl ModelSource for BackendSource {
    fn name(&self) -> &str {
        "backend"
    }

    async fn list_models(&self, query: &ModelQuery) -> SourceResult<Vec<RawModel>> {
        let url = format!("{}/api/models", self.base_url);
        tracing::debug!("Fetching models from backend: {}", url);

        let items = unwrap_model_list(fetch_json(&self.client, &url, &query.query_pairs()).await?)?;
        if items.is_empty() {
            return Err(SourceError::Parse(
                "Backend returned an empty model list".to_string(),
            ));
        }

        let models = parse_model_array(items);
        tracing::debug!("Retrieved {} models from backend", models.len());
        Ok(models)
    }

    async fn get_model(&self, id: &str) -> SourceResult<RawModel> {
        let url = format!("{}/api/models/{}", self.base_url, id);
        tracing::debug!("Fetching model details from backend: {}", url);

        let raw = parse_model_object(fetch_json(&self.client, &url, &[]).await?)?;
        if raw.id.as_deref().map_or(true, str::is_empty) {
            return Err(SourceError::Parse(format!(
                "Backend record for {} has no id",
                id
            )));
        }
        Ok(raw)
    }
}
