// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! trendmind - trending AI model catalog.
//!
//! This crate exposes the shared runtime used by:
//! - the `trendmind` CLI (`src/main.rs`)
//! - the catalog backend server (`trendmind serve`)
//!
//! Architecture highlights:
//! - `catalog`: record normalization, tiered retrieval (cache, Hugging Face
//!   Hub, backend, static dataset) and the TTL cache
//! - `server`: axum backend serving the static dataset
//! - `config`: JSON settings with environment overrides
//! - `favorites`: per-user favorite model ids

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod favorites;
pub mod server;

pub use error::{Result, TrendError};
