// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! In-memory catalog cache with optional JSON snapshots
//!
//! Entries are replaced wholesale on every successful fetch and never
//! evicted. Freshness is judged against a TTL at read time, so a stale
//! entry simply sits there until the next successful fetch overwrites it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use super::record::{ModelQuery, ModelRecord};
use crate::error::Result;

/// Default cache TTL (24 hours)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(86400);

/// Cache key. Lists and single records live in separate namespaces so an
/// id can never collide with a list signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum CacheKey {
    /// `sort|filter|limit`
    List(String),
    /// Model id
    Model(String),
}

impl CacheKey {
    pub fn for_query(query: &ModelQuery) -> Self {
        CacheKey::List(format!(
            "{}|{}|{}",
            query.sort.as_str(),
            query.filter,
            query.limit
        ))
    }

    pub fn for_model(id: &str) -> Self {
        CacheKey::Model(id.to_string())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::List(sig) => write!(f, "list:{sig}"),
            CacheKey::Model(id) => write!(f, "model:{id}"),
        }
    }
}

/// What a cache entry holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CachedValue {
    List(Vec<ModelRecord>),
    Single(Box<ModelRecord>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: CachedValue,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// True iff `now - fetched_at < ttl`
    pub fn is_fresh_at(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => age < ttl,
            // A TTL too large for chrono never expires
            Err(_) => true,
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(ttl, Utc::now())
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.fetched_at)
    }
}

/// On-disk snapshot layout
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    entries: Vec<(CacheKey, CacheEntry)>,
}

/// Catalog cache store
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry regardless of freshness
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Catalog cache lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        entries.get(key).cloned()
    }

    /// Look up an entry only if it is younger than `ttl`
    pub fn get_fresh(&self, key: &CacheKey, ttl: Duration) -> Option<CacheEntry> {
        let entry = self.get(key)?;
        if entry.is_fresh(ttl) {
            Some(entry)
        } else {
            tracing::debug!(
                "Cache entry {} is stale ({}h old)",
                key,
                entry.age().num_hours()
            );
            None
        }
    }

    /// Store a value stamped with the current time, replacing any prior entry
    pub fn put(&self, key: CacheKey, value: CachedValue) {
        self.put_entry(
            key,
            CacheEntry {
                value,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Store a prepared entry
    pub fn put_entry(&self, key: CacheKey, entry: CacheEntry) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Catalog cache lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load a snapshot. A missing or unreadable file gives an empty store.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read catalog cache {}: {}", path.display(), e);
                return Self::new();
            }
        };

        match serde_json::from_str::<Snapshot>(&contents) {
            Ok(snapshot) => {
                tracing::debug!(
                    "Loaded {} catalog cache entries from {}",
                    snapshot.entries.len(),
                    path.display()
                );
                Self {
                    entries: RwLock::new(snapshot.entries.into_iter().collect()),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse catalog cache {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Write a snapshot, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot = {
            let entries = match self.entries.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            Snapshot {
                entries: entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            }
        };

        let contents = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, contents)?;
        tracing::debug!("Saved catalog cache to {}", path.display());
        Ok(())
    }
}
