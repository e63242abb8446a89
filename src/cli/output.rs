// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Text and JSON rendering of catalog results

use serde::Serialize;

use crate::catalog::{ModelComparison, ModelRecord};
use crate::cli::args::OutputFormat;
use crate::error::Result;

/// Shown when no tier reports a license
const UNKNOWN_LICENSE: &str = "Unknown";

/// Print `value` as pretty JSON, or the text produced by `text`.
pub fn emit<T, F>(format: &OutputFormat, value: &T, text: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text()),
    }
    Ok(())
}

/// Compact count: 950, 12.5K, 3.2M
pub fn format_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => format!("{:.1}K", count as f64 / 1_000.0),
        _ => format!("{:.1}M", count as f64 / 1_000_000.0),
    }
}

/// One line per model, with rank
pub fn render_model_list(models: &[ModelRecord]) -> String {
    if models.is_empty() {
        return "\nNo models found.\n\n".to_string();
    }

    let mut out = String::from("\n");
    for (i, model) in models.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}. {:<45} {:>8} likes {:>8} downloads  {}\n",
            i + 1,
            model.id,
            format_count(model.likes),
            format_count(model.download_count),
            model.last_updated.format("%Y-%m-%d"),
        ));
    }
    out.push('\n');
    out
}

/// Full detail of a single model
pub fn render_model(model: &ModelRecord) -> String {
    let mut out = format!("\n{} ({})\n", model.name, model.id);
    out.push_str(&format!("  Author:       {}\n", model.author));
    out.push_str(&format!("  Description:  {}\n", model.description));
    out.push_str(&format!("  Likes:        {}\n", model.likes));
    out.push_str(&format!("  Downloads:    {}\n", model.download_count));
    out.push_str(&format!(
        "  Last updated: {}\n",
        model.last_updated.format("%Y-%m-%d %H:%M")
    ));
    if !model.tags.is_empty() {
        out.push_str(&format!("  Tags:         {}\n", model.tags.join(", ")));
    }
    out.push_str(&format!(
        "  License:      {}\n",
        model.license.as_deref().unwrap_or(UNKNOWN_LICENSE)
    ));
    for (label, url) in [
        ("Hugging Face", &model.hugging_face_url),
        ("GitHub", &model.github_url),
        ("Paper", &model.paper_url),
    ] {
        if let Some(url) = url {
            out.push_str(&format!("  {:<13} {}\n", format!("{}:", label), url));
        }
    }
    out.push('\n');
    out
}

/// Side-by-side summary with the leader of each metric
pub fn render_comparison(comparison: &ModelComparison) -> String {
    let mut out = render_model_list(&comparison.models);
    if comparison.models.is_empty() {
        return out;
    }

    let none = "-".to_string();
    out.push_str(&format!(
        "  Most downloaded: {}\n",
        comparison.most_downloaded.as_ref().unwrap_or(&none)
    ));
    out.push_str(&format!(
        "  Most liked:      {}\n",
        comparison.most_liked.as_ref().unwrap_or(&none)
    ));
    out.push_str(&format!(
        "  Most recent:     {}\n\n",
        comparison.most_recent.as_ref().unwrap_or(&none)
    ));
    out
}
