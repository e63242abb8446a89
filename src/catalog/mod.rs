// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model catalog
//!
//! Retrieves model records through a tiered pipeline with a shared cache.
//!
//! ## Tiers
//!
//! Sources are tried in strict priority order, never raced:
//! 1. **Hub**: the Hugging Face model API (`huggingface`)
//! 2. **Backend**: the same-origin `/api/models` server (`backend`)
//! 3. **Static**: the dataset compiled into the binary (`fallback`)
//!
//! Whatever tier answers, its output is normalized into a [`ModelRecord`]
//! and cached under the query signature (or the model id) for 24 hours.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trendmind::catalog::{ModelCatalog, ModelQuery, SortOrder};
//! use trendmind::config::Settings;
//!
//! let catalog = ModelCatalog::from_settings(&Settings::load()?);
//!
//! let query = ModelQuery::default().with_sort(SortOrder::Downloads).with_limit(10);
//! let models = catalog.get_models(&query).await?;
//!
//! // Always returns a record, synthesizing one for unknown ids
//! let model = catalog.get_model_by_id("microsoft/phi-2", false).await;
//! ```

pub mod backend;
pub mod cache;
pub mod fallback;
pub mod huggingface;
pub mod mock_source;
pub mod record;
pub mod service;
pub mod source;

// Re-export commonly used types
pub use backend::BackendSource;
pub use cache::{CacheEntry, CacheKey, CacheStore, CachedValue, DEFAULT_CACHE_TTL};
pub use fallback::{DatasetSource, StaticCatalog};
pub use huggingface::HubSource;
pub use record::{split_model_id, ModelQuery, ModelRecord, RawModel, SortOrder};
pub use service::{ModelCatalog, ModelComparison};
pub use source::ModelSource;
