// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Tiered model retrieval
//!
//! Priority:
//! 1. Fresh cache entry (< TTL old, skipped on refresh) - return immediately
//! 2. Network sources in order (Hub, then backend) - normalize and cache
//! 3. Static fallback dataset - cache and return
//!
//! Tier failures are logged and never surface. The only error a caller can
//! see is the static dataset failing to load.

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;

use super::backend::BackendSource;
use super::cache::{CacheKey, CacheStore, CachedValue, DEFAULT_CACHE_TTL};
use super::fallback::{search_records, StaticCatalog};
use super::huggingface::HubSource;
use super::record::{ModelQuery, ModelRecord, RawModel};
use super::source::{build_client, ModelSource};
use crate::config::Settings;
use crate::error::Result;

/// Number of models fetched to search through
const SEARCH_POOL_SIZE: usize = 100;

/// Model catalog with cache and tier fallback
pub struct ModelCatalog {
    cache: CacheStore,
    /// Network tiers in priority order
    sources: Vec<Box<dyn ModelSource>>,
    fallback: StaticCatalog,
    ttl: Duration,
}

impl ModelCatalog {
    /// Catalog over the given primary and secondary sources
    pub fn new(
        primary: Box<dyn ModelSource>,
        secondary: Box<dyn ModelSource>,
        fallback: StaticCatalog,
    ) -> Self {
        Self {
            cache: CacheStore::new(),
            sources: vec![primary, secondary],
            fallback,
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Build the standard Hub → backend → static pipeline from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let client = build_client(settings.catalog.timeout());
        let hub = HubSource::with_base_url(client.clone(), settings.catalog.base_url.clone());
        let backend = BackendSource::with_base_url(client, settings.catalog.backend_url.clone());

        Self::new(
            Box::new(hub),
            Box::new(backend),
            StaticCatalog::from_settings(settings),
        )
        .with_ttl(settings.cache.ttl())
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the (empty) cache, e.g. with a restored snapshot
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn fallback(&self) -> &StaticCatalog {
        &self.fallback
    }

    /// Get a model list
    pub async fn get_models(&self, query: &ModelQuery) -> Result<Vec<ModelRecord>> {
        let key = CacheKey::for_query(query);

        if !query.refresh {
            if let Some(entry) = self.cache.get_fresh(&key, self.ttl) {
                if let CachedValue::List(models) = entry.value {
                    tracing::debug!("Using cached model list for {}", key);
                    return Ok(models);
                }
            }
        }

        let models = match self.fetch_list(query).await {
            Some(models) => models,
            None => {
                tracing::info!("All network sources failed, using fallback dataset");
                self.fallback.list_models(query)?
            }
        };

        self.cache.put(key, CachedValue::List(models.clone()));
        Ok(models)
    }

    async fn fetch_list(&self, query: &ModelQuery) -> Option<Vec<ModelRecord>> {
        for source in &self.sources {
            match source.list_models(query).await {
                Ok(raws) => {
                    let models = normalize_list(raws);
                    tracing::debug!("Retrieved {} models from {}", models.len(), source.name());
                    return Some(models);
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        kind = e.kind(),
                        "Failed to fetch model list: {}",
                        e
                    );
                }
            }
        }
        None
    }

    /// Get a single model. Always returns a record; unknown ids get a
    /// synthesized placeholder.
    pub async fn get_model_by_id(&self, id: &str, refresh: bool) -> ModelRecord {
        let key = CacheKey::for_model(id);

        if !refresh {
            if let Some(entry) = self.cache.get_fresh(&key, self.ttl) {
                if let CachedValue::Single(model) = entry.value {
                    tracing::debug!("Using cached model details for {}", id);
                    return *model;
                }
            }
        }

        let model = match self.fetch_one(id).await {
            Some(model) => model,
            None => {
                tracing::info!("All network sources failed for {}, using fallback dataset", id);
                self.fallback.get_model(id)
            }
        };

        self.cache
            .put(key, CachedValue::Single(Box::new(model.clone())));
        model
    }

    async fn fetch_one(&self, id: &str) -> Option<ModelRecord> {
        for source in &self.sources {
            match source.get_model(id).await {
                Ok(raw) => return Some(raw.into_record_for(id, Utc::now())),
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        kind = e.kind(),
                        "Failed to fetch model {}: {}",
                        id,
                        e
                    );
                }
            }
        }
        None
    }

    /// Search names and descriptions of the top models
    pub async fn search_models(&self, query: &str, limit: usize) -> Result<Vec<ModelRecord>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let pool = self
            .get_models(&ModelQuery::default().with_limit(SEARCH_POOL_SIZE))
            .await?;
        Ok(search_records(&pool, query.trim(), limit))
    }

    /// Resolve favorites concurrently, preserving input order
    pub async fn favorite_models(&self, ids: &[String]) -> Vec<ModelRecord> {
        if ids.is_empty() {
            return Vec::new();
        }
        join_all(ids.iter().map(|id| self.get_model_by_id(id, false))).await
    }

    /// Resolve models side by side and pick the leaders
    pub async fn compare_models(&self, ids: &[String]) -> ModelComparison {
        ModelComparison::new(self.favorite_models(ids).await)
    }
}

/// Normalize list entries, dropping those without an id
fn normalize_list(raws: Vec<RawModel>) -> Vec<ModelRecord> {
    let now = Utc::now();
    let total = raws.len();
    let models: Vec<ModelRecord> = raws.into_iter().filter_map(|r| r.into_record(now)).collect();
    if models.len() < total {
        tracing::warn!("Dropped {} model entries without an id", total - models.len());
    }
    models
}

/// Side-by-side view of several models
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparison {
    pub models: Vec<ModelRecord>,
    pub most_downloaded: Option<String>,
    pub most_liked: Option<String>,
    pub most_recent: Option<String>,
}

impl ModelComparison {
    pub fn new(models: Vec<ModelRecord>) -> Self {
        Self {
            most_downloaded: leader(&models, |m| m.download_count),
            most_liked: leader(&models, |m| m.likes),
            most_recent: leader(&models, |m| m.last_updated),
            models,
        }
    }
}

/// Id of the model with the largest key; ties go to the first listed
fn leader<K: Ord>(models: &[ModelRecord], key: impl Fn(&ModelRecord) -> K) -> Option<String> {
    // `max_by_key` keeps the last maximum, so scan in reverse
    models
        .iter()
        .rev()
        .max_by_key(|m| key(m))
        .map(|m| m.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::cache::CacheEntry;
    use crate::catalog::fallback::DatasetSource;
    use crate::catalog::mock_source::{MockFailure, MockSource};
    use crate::catalog::record::SortOrder;

    fn catalog(primary: &MockSource, secondary: &MockSource) -> ModelCatalog {
        ModelCatalog::new(
            Box::new(primary.clone()),
            Box::new(secondary.clone()),
            StaticCatalog::embedded(),
        )
    }

    #[tokio::test]
    async fn test_primary_success_is_normalized_and_cached() {
        let primary = MockSource::new("primary").with_ids(&["x/y", "solo"]);
        let secondary = MockSource::new("secondary").with_ids(&["z/z"]);
        let catalog = catalog(&primary, &secondary);

        let models = catalog.get_models(&ModelQuery::default()).await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].author, "x");
        assert_eq!(models[1].author, "Unknown");
        assert_eq!(secondary.calls(), 0);
        assert_eq!(catalog.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let primary = MockSource::new("primary").with_ids(&["x/y"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        let first = catalog.get_models(&ModelQuery::default()).await.unwrap();
        let second = catalog.get_models(&ModelQuery::default()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(primary.list_calls(), 1);
        assert_eq!(secondary.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_different_queries_use_different_entries() {
        let primary = MockSource::new("primary").with_ids(&["x/y"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        catalog.get_models(&ModelQuery::default()).await.unwrap();
        catalog
            .get_models(&ModelQuery::default().with_sort(SortOrder::Likes))
            .await
            .unwrap();
        assert_eq!(primary.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let primary = MockSource::new("primary").with_ids(&["x/y"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        catalog.get_models(&ModelQuery::default()).await.unwrap();
        catalog
            .get_models(&ModelQuery::default().refreshed())
            .await
            .unwrap();
        assert_eq!(primary.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_refetch() {
        let primary = MockSource::new("primary").with_ids(&["fresh/model"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        catalog.cache().put_entry(
            CacheKey::for_query(&ModelQuery::default()),
            CacheEntry {
                value: CachedValue::List(vec![ModelRecord::placeholder("old/model", Utc::now())]),
                fetched_at: Utc::now() - chrono::Duration::hours(25),
            },
        );

        let models = catalog.get_models(&ModelQuery::default()).await.unwrap();
        assert_eq!(models[0].id, "fresh/model");
        assert_eq!(primary.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_secondary_used_when_primary_fails() {
        let primary = MockSource::new("primary").failing(MockFailure::Status(503));
        let secondary = MockSource::new("secondary").with_ids(&["backend/model"]);
        let catalog = catalog(&primary, &secondary);

        let models = catalog.get_models(&ModelQuery::default()).await.unwrap();
        assert_eq!(models[0].id, "backend/model");
        assert_eq!(primary.list_calls(), 1);
        assert_eq!(secondary.list_calls(), 1);
        assert_eq!(secondary.recorded_queries()[0], ModelQuery::default());
    }

    #[tokio::test]
    async fn test_static_fallback_when_all_sources_fail() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Parse);
        let catalog = catalog(&primary, &secondary);

        let query = ModelQuery::default()
            .with_filter("computer-vision")
            .with_sort(SortOrder::Likes)
            .with_limit(2);
        let models = catalog.get_models(&query).await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "stabilityai/stable-diffusion-2");
        assert_eq!(models[1].id, "runwayml/stable-diffusion-v1-5");
        assert!(models.iter().all(|m| m.has_tag("computer-vision")));
    }

    #[tokio::test]
    async fn test_static_fallback_output_is_cached() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Network);
        let catalog = catalog(&primary, &secondary);

        catalog.get_models(&ModelQuery::default()).await.unwrap();
        primary.set_failure(None);
        catalog.get_models(&ModelQuery::default()).await.unwrap();

        assert_eq!(primary.list_calls(), 1);
        assert_eq!(secondary.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_fallback_starts_at_primary() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Network);
        let catalog = catalog(&primary, &secondary);

        catalog.get_models(&ModelQuery::default()).await.unwrap();
        primary.set_failure(None);
        let primary = primary.with_ids(&["back/online"]);
        let models = catalog
            .get_models(&ModelQuery::default().refreshed())
            .await
            .unwrap();

        assert_eq!(models[0].id, "back/online");
        assert_eq!(secondary.list_calls(), 1);
        assert_eq!(primary.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_broken_fallback_dataset_propagates() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Network);
        let catalog = ModelCatalog::new(
            Box::new(primary),
            Box::new(secondary),
            StaticCatalog::from_source(DatasetSource::Inline("[]".to_string())),
        );

        let err = catalog.get_models(&ModelQuery::default()).await.unwrap_err();
        assert!(matches!(err, crate::error::TrendError::Dataset(_)));
        assert!(catalog.cache().is_empty());
    }

    #[tokio::test]
    async fn test_get_model_by_id_from_primary() {
        let primary = MockSource::new("primary").with_ids(&["acme/foo"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        let model = catalog.get_model_by_id("acme/foo", false).await;
        assert_eq!(model.name, "foo");
        assert_eq!(primary.get_calls(), 1);

        catalog.get_model_by_id("acme/foo", false).await;
        assert_eq!(primary.get_calls(), 1);

        catalog.get_model_by_id("acme/foo", true).await;
        assert_eq!(primary.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_get_model_by_id_synthesizes_when_unknown_everywhere() {
        let primary = MockSource::new("primary");
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        let model = catalog.get_model_by_id("acme/foo", false).await;
        assert_eq!(model.author, "acme");
        assert_eq!(model.name, "foo");

        let model = catalog.get_model_by_id("solo", false).await;
        assert_eq!(model.author, "Unknown");
        assert_eq!(model.name, "solo");

        assert_eq!(primary.get_calls(), 2);
        assert_eq!(secondary.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_get_model_by_id_static_hit() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Status(404));
        let catalog = catalog(&primary, &secondary);

        let model = catalog.get_model_by_id("gpt2", false).await;
        assert_eq!(model.likes, 10500);
        assert_eq!(model.author, "openai");
    }

    #[tokio::test]
    async fn test_list_and_model_cache_entries_are_separate() {
        let primary = MockSource::new("primary").with_ids(&["acme/foo"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        catalog.get_models(&ModelQuery::default()).await.unwrap();
        catalog.get_model_by_id("acme/foo", false).await;
        assert_eq!(catalog.cache().len(), 2);
        assert_eq!(primary.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_search_models() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Network);
        let catalog = catalog(&primary, &secondary);

        assert!(catalog.search_models("  ", 10).await.unwrap().is_empty());
        assert_eq!(primary.calls(), 0);

        let found = catalog.search_models("Diffusion", 10).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(primary.recorded_queries()[0].limit, 100);
    }

    #[tokio::test]
    async fn test_favorite_models_preserve_order() {
        let primary = MockSource::new("primary").with_ids(&["b/two", "a/one"]);
        let secondary = MockSource::new("secondary");
        let catalog = catalog(&primary, &secondary);

        assert!(catalog.favorite_models(&[]).await.is_empty());

        let ids = vec!["a/one".to_string(), "b/two".to_string(), "c/three".to_string()];
        let favorites = catalog.favorite_models(&ids).await;
        let got: Vec<&str> = favorites.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(got, vec!["a/one", "b/two", "c/three"]);
    }

    #[tokio::test]
    async fn test_compare_models_leaders() {
        let primary = MockSource::new("primary").failing(MockFailure::Network);
        let secondary = MockSource::new("secondary").failing(MockFailure::Network);
        let catalog = catalog(&primary, &secondary);

        let ids = vec![
            "gpt2".to_string(),
            "microsoft/phi-2".to_string(),
            "stabilityai/stable-diffusion-2".to_string(),
        ];
        let comparison = catalog.compare_models(&ids).await;
        assert_eq!(comparison.models.len(), 3);
        assert_eq!(
            comparison.most_downloaded.as_deref(),
            Some("stabilityai/stable-diffusion-2")
        );
        assert_eq!(
            comparison.most_liked.as_deref(),
            Some("stabilityai/stable-diffusion-2")
        );
        assert_eq!(comparison.most_recent.as_deref(), Some("microsoft/phi-2"));
    }

    #[test]
    fn test_comparison_ties_go_to_first_listed() {
        let now = Utc::now();
        let a = ModelRecord::placeholder("a/a", now);
        let b = ModelRecord::placeholder("b/b", now);
        let comparison = ModelComparison::new(vec![a, b]);
        assert_eq!(comparison.most_liked.as_deref(), Some("a/a"));
        assert_eq!(comparison.most_recent.as_deref(), Some("a/a"));
    }

    #[test]
    fn test_comparison_counts_above_i64_range() {
        let now = Utc::now();
        let mut huge = ModelRecord::placeholder("huge/model", now);
        huge.likes = u64::MAX;
        huge.download_count = u64::MAX;
        let mut small = ModelRecord::placeholder("small/model", now);
        small.likes = 1;
        small.download_count = 1;

        let comparison = ModelComparison::new(vec![small, huge]);
        assert_eq!(comparison.most_liked.as_deref(), Some("huge/model"));
        assert_eq!(comparison.most_downloaded.as_deref(), Some("huge/model"));
    }

    #[test]
    fn test_comparison_empty() {
        let comparison = ModelComparison::new(vec![]);
        assert!(comparison.most_downloaded.is_none());
    }

    #[test]
    fn test_normalize_list_drops_entries_without_id() {
        let raws = vec![
            RawModel {
                id: Some("a/b".into()),
                ..Default::default()
            },
            RawModel::default(),
        ];
        assert_eq!(normalize_list(raws).len(), 1);
    }
}
