// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for TrendMind
//!
//! Handles loading and saving settings from ~/.trendmind/settings.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::backend::DEFAULT_BACKEND_URL;
use crate::catalog::huggingface::DEFAULT_HUB_API_URL;
use crate::catalog::record::DEFAULT_LIMIT;

mod io;
mod validation;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Hub API base (primary tier)
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    /// Same-origin backend base (secondary tier)
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-request timeout; unset leaves the transport default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Replacement for the built-in fallback dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Keep the cache on disk between runs
    #[serde(default = "default_true")]
    pub persist: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default = "default_sort")]
    pub sort: String,

    /// Whose favorites the CLI manages
    #[serde(default = "default_user")]
    pub user: String,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            backend_url: default_backend_url(),
            timeout_secs: None,
            fallback_path: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            persist: true,
            path: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            sort: default_sort(),
            user: default_user(),
        }
    }
}

fn default_catalog_url() -> String {
    DEFAULT_HUB_API_URL.to_string()
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    86400
}

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_sort() -> String {
    "trending".to_string()
}

fn default_user() -> String {
    "local".to_string()
}
