// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{Result, TrendError};

use super::Settings;

impl Settings {
    /// Apply environment overrides.
    ///
    /// `TRENDMIND_CATALOG_URL` and `TRENDMIND_BACKEND_URL` replace the tier
    /// endpoints; `PORT` replaces the server port when it parses.
    pub fn apply_env_overrides(&mut self) {
        // Priority: env var > config file.
        if let Ok(url) = std::env::var("TRENDMIND_CATALOG_URL") {
            self.catalog.base_url = url;
        }
        if let Ok(url) = std::env::var("TRENDMIND_BACKEND_URL") {
            self.catalog.backend_url = url;
        }
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
    }

    /// Reject settings the catalog cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (field, url) in [
            ("catalog.base_url", &self.catalog.base_url),
            ("catalog.backend_url", &self.catalog.backend_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(TrendError::Config(format!(
                    "{} must be an http(s) URL, got {:?}",
                    field, url
                )));
            }
        }

        if self.defaults.limit == 0 {
            return Err(TrendError::Config(
                "defaults.limit must be at least 1".to_string(),
            ));
        }

        if self.catalog.timeout_secs == Some(0) {
            return Err(TrendError::Config(
                "catalog.timeout_secs must be positive when set".to_string(),
            ));
        }

        Ok(())
    }
}
