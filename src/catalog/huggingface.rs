// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hugging Face Hub catalog source (primary tier)
//!
//! `GET <base>/models?limit=&sort=&filter=` must return a JSON array and
//! `GET <base>/models/{id}` a JSON object. Any object is accepted for the
//! single-model form; missing fields are defaulted during normalization.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::record::{ModelQuery, RawModel};
use super::source::{
    fetch_json, json_kind, parse_model_array, parse_model_object, ModelSource, SourceResult,
};
use crate::error::SourceError;

/// Public Hub API endpoint
pub const DEFAULT_HUB_API_URL: &str = "https://huggingface.co/api";

/// Direct client for the Hub's model API
pub struct HubSource {
    client: Client,
    base_url: String,
}

impl HubSource {
    /// Create a source against the public Hub API
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_HUB_API_URL)
    }

    /// Create with a custom base URL (mirrors, tests)
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

#[async_trait]
impl ModelSource for HubSource {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn list_models(&self, query: &ModelQuery) -> SourceResult<Vec<RawModel>> {
        let url = format!("{}/models", self.base_url);
        tracing::debug!("Fetching models from Hub: {} {:?}", url, query.query_pairs());

        match fetch_json(&self.client, &url, &query.query_pairs()).await? {
            Value::Array(items) => {
                let models = parse_model_array(items);
                tracing::debug!("Retrieved {} models from Hub", models.len());
                Ok(models)
            }
            other => Err(SourceError::Parse(format!(
                "Hub model list is not an array (got {})",
                json_kind(&other)
            ))),
        }
    }

    async fn get_model(&self, id: &str) -> SourceResult<RawModel> {
        // Ids are `owner/name`; the slash stays part of the path
        let url = format!("{}/models/{}", self.base_url, id);
        tracing::debug!("Fetching model details from Hub: {}", url);

        let value = fetch_json(&self.client, &url, &[]).await?;
        parse_model_object(value)
    }
}
