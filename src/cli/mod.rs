// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI module for trendmind
//!
//! Handles command-line argument parsing and output rendering.

pub mod args;
pub mod output;

pub use args::*;
