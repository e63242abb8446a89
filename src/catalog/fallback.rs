// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Static fallback catalog (terminal tier)
//!
//! A fixed dataset compiled into the binary, optionally replaced by a user
//! file. The list form filters, sorts and truncates locally; the single form
//! synthesizes a placeholder for unknown ids instead of failing.
//!
//! The dataset is loaded on first use. A load failure is the one fatal error
//! of the retrieval pipeline since there is no tier left to try.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

use super::record::{filter_by_tag, sort_records, ModelQuery, ModelRecord};
use crate::config::Settings;
use crate::error::{Result, TrendError};

/// Fallback dataset compiled into the binary
const EMBEDDED_DATASET: &str = include_str!("../../registry/models.json");

/// On-disk dataset layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset version
    pub version: String,
    /// Last updated timestamp
    pub updated_at: String,
    pub models: Vec<ModelRecord>,
}

/// Where the fallback dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Embedded,
    File(PathBuf),
    /// Inline JSON, mostly for tests
    Inline(String),
}

pub struct StaticCatalog {
    source: DatasetSource,
    records: OnceLock<Vec<ModelRecord>>,
}

impl StaticCatalog {
    /// Catalog over the compiled-in dataset
    pub fn embedded() -> Self {
        Self::from_source(DatasetSource::Embedded)
    }

    pub fn from_source(source: DatasetSource) -> Self {
        Self {
            source,
            records: OnceLock::new(),
        }
    }

    /// Catalog over `catalog.fallback_path`, or the embedded dataset
    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.catalog.fallback_path {
            Some(path) => Self::from_source(DatasetSource::File(path.clone())),
            None => Self::embedded(),
        }
    }

    /// Catalog over an already-parsed set of records
    pub fn from_records(records: Vec<ModelRecord>) -> Self {
        let catalog = Self::from_source(DatasetSource::Embedded);
        let _ = catalog.records.set(records);
        catalog
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    fn load(&self) -> Result<Vec<ModelRecord>> {
        let contents = match &self.source {
            DatasetSource::Embedded => EMBEDDED_DATASET.to_string(),
            DatasetSource::Inline(json) => json.clone(),
            DatasetSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                TrendError::Dataset(format!(
                    "Failed to read fallback dataset {}: {}",
                    path.display(),
                    e
                ))
            })?,
        };

        let dataset: Dataset = serde_json::from_str(&contents).map_err(|e| {
            TrendError::Dataset(format!("Failed to parse fallback dataset: {}", e))
        })?;

        tracing::debug!(
            "Loaded fallback dataset v{} ({} models)",
            dataset.version,
            dataset.models.len()
        );
        Ok(dataset.models)
    }

    /// All records, loading the dataset on first use.
    ///
    /// Failures are not remembered; the next call tries again.
    pub fn records(&self) -> Result<&[ModelRecord]> {
        if let Some(records) = self.records.get() {
            return Ok(records);
        }
        let loaded = self.load()?;
        Ok(self.records.get_or_init(|| loaded))
    }

    /// Filter by tag, sort, then truncate to the query limit
    pub fn list_models(&self, query: &ModelQuery) -> Result<Vec<ModelRecord>> {
        let mut models = self.select(query)?;
        models.truncate(query.limit);
        Ok(models)
    }

    /// Filter and sort without truncating (used for pagination)
    pub fn select(&self, query: &ModelQuery) -> Result<Vec<ModelRecord>> {
        let mut models = filter_by_tag(self.records()?.to_vec(), &query.filter);
        sort_records(&mut models, &query.sort);
        Ok(models)
    }

    /// Look up a record, synthesizing a placeholder for unknown ids.
    ///
    /// Never fails: a dataset that cannot be loaded is logged and treated
    /// as empty.
    pub fn get_model(&self, id: &str) -> ModelRecord {
        self.get_model_at(id, Utc::now())
    }

    pub fn get_model_at(&self, id: &str, now: DateTime<Utc>) -> ModelRecord {
        match self.find(id) {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!("{} not in fallback dataset, synthesizing placeholder", id);
                ModelRecord::placeholder(id, now)
            }
            Err(e) => {
                tracing::warn!("Fallback dataset unavailable for {}: {}", id, e);
                ModelRecord::placeholder(id, now)
            }
        }
    }

    /// Exact id lookup
    pub fn find(&self, id: &str) -> Result<Option<ModelRecord>> {
        Ok(self.records()?.iter().find(|m| m.id == id).cloned())
    }

    /// Records whose ids are in `ids`, in dataset order
    pub fn find_many(&self, ids: &[String]) -> Result<Vec<ModelRecord>> {
        Ok(self
            .records()?
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    /// Case-insensitive substring search over `name description`
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ModelRecord>> {
        Ok(search_records(self.records()?, query, limit))
    }
}

/// Keep records whose lowercase `name description` contains the lowercase
/// query, in input order, at most `limit` of them.
pub fn search_records(records: &[ModelRecord], query: &str, limit: usize) -> Vec<ModelRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|m| format!("{} {}", m.name, m.description).to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::SortOrder;
    use tempfile::TempDir;

    fn ids(records: &[ModelRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_embedded_dataset_parses() {
        let catalog = StaticCatalog::embedded();
        let records = catalog.records().unwrap();
        assert_eq!(records.len(), 30);
        assert!(records.iter().all(|r| !r.id.is_empty() && !r.name.is_empty()));
    }

    #[test]
    fn test_list_models_trending_default() {
        let catalog = StaticCatalog::embedded();
        let models = catalog.list_models(&ModelQuery::default().with_limit(3)).unwrap();
        assert_eq!(
            ids(&models),
            vec![
                "stabilityai/stable-diffusion-2",
                "runwayml/stable-diffusion-v1-5",
                "meta-llama/Llama-2-7b-chat-hf"
            ]
        );
    }

    #[test]
    fn test_list_models_filter_then_sort_then_limit() {
        let catalog = StaticCatalog::embedded();
        let query = ModelQuery::default()
            .with_filter("text-to-image")
            .with_sort(SortOrder::Downloads)
            .with_limit(1);
        let models = catalog.list_models(&query).unwrap();
        assert_eq!(ids(&models), vec!["stabilityai/stable-diffusion-2"]);
    }

    #[test]
    fn test_list_models_filter_excludes_untagged() {
        let catalog = StaticCatalog::embedded();
        let query = ModelQuery::default().with_filter("even-numbered").with_limit(100);
        let models = catalog.list_models(&query).unwrap();
        assert_eq!(models.len(), 10);
        assert!(models.iter().all(|m| m.has_tag("even-numbered")));
    }

    #[test]
    fn test_list_models_modified_order() {
        let catalog = StaticCatalog::embedded();
        let query = ModelQuery::default()
            .with_sort(SortOrder::Modified)
            .with_limit(100);
        let models = catalog.list_models(&query).unwrap();
        assert!(models
            .windows(2)
            .all(|w| w[0].last_updated >= w[1].last_updated));
    }

    #[test]
    fn test_get_model_known() {
        let catalog = StaticCatalog::embedded();
        let model = catalog.get_model("microsoft/phi-2");
        assert_eq!(model.likes, 7500);
        assert_eq!(model.author, "microsoft");
    }

    #[test]
    fn test_get_model_synthesizes_unknown() {
        let catalog = StaticCatalog::embedded();

        let model = catalog.get_model("acme/foo");
        assert_eq!(model.author, "acme");
        assert_eq!(model.name, "foo");
        assert_eq!(model.likes, 0);

        let model = catalog.get_model("solo");
        assert_eq!(model.author, "Unknown");
        assert_eq!(model.name, "solo");
    }

    #[test]
    fn test_broken_dataset_is_fatal_for_lists_only() {
        let catalog = StaticCatalog::from_source(DatasetSource::Inline("{\"models\": 3}".into()));
        let err = catalog.list_models(&ModelQuery::default()).unwrap_err();
        assert!(matches!(err, TrendError::Dataset(_)));

        let model = catalog.get_model("acme/foo");
        assert_eq!(model.name, "foo");
    }

    #[test]
    fn test_missing_dataset_file() {
        let temp_dir = TempDir::new().unwrap();
        let catalog =
            StaticCatalog::from_source(DatasetSource::File(temp_dir.path().join("missing.json")));
        let err = catalog.records().unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_dataset_file_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("models.json");
        std::fs::write(
            &path,
            r#"{"version": "test", "updated_at": "2024-01-01", "models": [{
                "id": "acme/only", "name": "only", "description": "d", "tags": ["x"],
                "author": "acme", "downloadCount": 1, "likes": 2,
                "lastUpdated": "2024-01-01T00:00:00Z"
            }]}"#,
        )
        .unwrap();

        let catalog = StaticCatalog::from_source(DatasetSource::File(path));
        let models = catalog.list_models(&ModelQuery::default()).unwrap();
        assert_eq!(ids(&models), vec!["acme/only"]);
    }

    #[test]
    fn test_find_many_keeps_dataset_order() {
        let catalog = StaticCatalog::embedded();
        let found = catalog
            .find_many(&["gpt2".to_string(), "meta-llama/Llama-2-7b-chat-hf".to_string()])
            .unwrap();
        assert_eq!(ids(&found), vec!["meta-llama/Llama-2-7b-chat-hf", "gpt2"]);
    }

    #[test]
    fn test_search_case_insensitive() {
        let catalog = StaticCatalog::embedded();
        let found = catalog.search("DIFFUSION", 10).unwrap();
        assert_eq!(found.len(), 2);

        let found = catalog.search("generic model", 3).unwrap();
        assert_eq!(found.len(), 3);
    }
}
