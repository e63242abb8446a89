// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Favorite models per user
//!
//! Stores favorite model ids in a JSON file keyed by user id. Ids keep the
//! order they were added in and are never duplicated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{Result, TrendError};

/// Favorites store backed by a JSON file
pub struct FavoritesStore {
    /// Path to the favorites file
    path: PathBuf,
    /// user id → model ids
    favorites: BTreeMap<String, Vec<String>>,
}

impl FavoritesStore {
    /// Open the store at the default location
    pub fn open() -> Result<Self> {
        Self::open_at(&Settings::favorites_path())
    }

    /// Open or create a store at a specific path.
    ///
    /// A corrupt file is treated as empty and replaced on the next save.
    pub fn open_at(path: &Path) -> Result<Self> {
        let favorites = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match serde_json::from_str(&content) {
                Ok(favorites) => favorites,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt favorites file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            favorites,
        })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.favorites)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Favorite ids of a user, oldest first
    pub fn list(&self, user: &str) -> &[String] {
        self.favorites.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Add a favorite. Returns false if it was already present.
    pub fn add(&mut self, user: &str, model_id: &str) -> Result<bool> {
        let model_id = model_id.trim();
        if model_id.is_empty() {
            return Err(TrendError::InvalidInput(
                "model id must not be empty".to_string(),
            ));
        }

        let ids = self.favorites.entry(user.to_string()).or_default();
        if ids.iter().any(|id| id == model_id) {
            return Ok(false);
        }
        ids.push(model_id.to_string());
        self.save()?;
        Ok(true)
    }

    /// Remove a favorite. Returns false if it was not present.
    pub fn remove(&mut self, user: &str, model_id: &str) -> Result<bool> {
        let model_id = model_id.trim();
        let Some(ids) = self.favorites.get_mut(user) else {
            return Ok(false);
        };
        let before = ids.len();
        ids.retain(|id| id != model_id);
        if ids.len() == before {
            return Ok(false);
        }
        if ids.is_empty() {
            self.favorites.remove(user);
        }
        self.save()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_list_remove() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favorites.json");
        let mut store = FavoritesStore::open_at(&path).unwrap();

        assert!(store.list("alice").is_empty());
        assert!(store.add("alice", "gpt2").unwrap());
        assert!(store.add("alice", "microsoft/phi-2").unwrap());
        assert!(!store.add("alice", "gpt2").unwrap());
        assert_eq!(store.list("alice"), &["gpt2", "microsoft/phi-2"]);

        assert!(store.remove("alice", "gpt2").unwrap());
        assert!(!store.remove("alice", "gpt2").unwrap());
        assert!(!store.remove("bob", "gpt2").unwrap());
        assert_eq!(store.list("alice"), &["microsoft/phi-2"]);
    }

    #[test]
    fn test_persists_per_user() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dir").join("favorites.json");
        {
            let mut store = FavoritesStore::open_at(&path).unwrap();
            store.add("alice", "gpt2").unwrap();
            store.add("bob", "google/flan-t5-xxl").unwrap();
        }

        let store = FavoritesStore::open_at(&path).unwrap();
        assert_eq!(store.list("alice"), &["gpt2"]);
        assert_eq!(store.list("bob"), &["google/flan-t5-xxl"]);
    }

    #[test]
    fn test_ids_are_trimmed_both_ways() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FavoritesStore::open_at(&temp_dir.path().join("f.json")).unwrap();

        assert!(store.add("alice", " gpt2 ").unwrap());
        assert_eq!(store.list("alice"), &["gpt2"]);
        assert!(store.remove("alice", " gpt2").unwrap());
        assert!(store.list("alice").is_empty());
    }

    #[test]
    fn test_rejects_empty_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FavoritesStore::open_at(&temp_dir.path().join("f.json")).unwrap();
        assert!(store.add("alice", "   ").is_err());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favorites.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = FavoritesStore::open_at(&path).unwrap();
        assert!(store.list("alice").is_empty());
    }
}
