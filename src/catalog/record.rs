// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Canonical model records and normalization
//!
//! Every tier hands back data in its own shape. `RawModel` is the lenient
//! intermediate form all network payloads are parsed into, and
//! `ModelRecord` is the fully-defaulted shape returned to callers.

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Description used when a source omits one
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// Author used when the id carries no owner segment
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Public Hugging Face site, used to build page and thumbnail links
pub const HUGGING_FACE_SITE: &str = "https://huggingface.co";

/// Canonical, fully-populated model record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    /// Unique identifier, conventionally `owner/name`
    pub id: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Tags in source order
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub download_count: u64,
    pub likes: u64,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugging_face_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl ModelRecord {
    /// Build the minimal record for an id no tier knows about.
    pub fn placeholder(id: &str, now: DateTime<Utc>) -> Self {
        RawModel::default().into_record_for(id, now)
    }

    /// Whether the record carries the given tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Split an id into `(author, name)`.
///
/// `acme/foo` gives `("acme", "foo")`; `solo` gives `("Unknown", "solo")`.
pub fn split_model_id(id: &str) -> (String, String) {
    let name = match id.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => id.to_string(),
    };
    let author = match id.split_once('/') {
        Some((owner, _)) => owner.to_string(),
        None => UNKNOWN_AUTHOR.to_string(),
    };
    (author, name)
}

/// `model-card` metadata block as returned by the Hub's single-model endpoint
#[derive(Debug, Clone, Default)]
pub struct CardData {
    pub license: Option<String>,
}

/// Unnormalized record as parsed from a catalog payload.
///
/// Accepts both the Hub's field names (`downloads`, `lastModified`,
/// `github`, `arxiv`) and the canonical ones served by the backend
/// (`downloadCount`, `lastUpdated`, ...). Parsing is per field: unknown
/// fields are ignored and a field of the wrong type counts as absent, so
/// any JSON object yields a `RawModel`.
#[derive(Debug, Clone, Default)]
pub struct RawModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub downloads: Option<u64>,
    pub likes: Option<u64>,
    pub last_modified: Option<String>,
    pub image_url: Option<String>,
    pub hugging_face_url: Option<String>,
    pub github: Option<String>,
    pub arxiv: Option<String>,
    pub license: Option<String>,
    pub card_data: Option<CardData>,
}

impl<'de> Deserialize<'de> for RawModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(RawModel::from_map(&map)),
            _ => Err(de::Error::custom("expected a model object")),
        }
    }
}

/// First of `names` present with a value of type `T`
fn lenient_field<T: DeserializeOwned>(map: &Map<String, Value>, names: &[&str]) -> Option<T> {
    names.iter().find_map(|name| {
        let value = map.get(*name)?;
        match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Ignoring model field {}: {}", name, e);
                None
            }
        }
    })
}

/// String tags, skipping non-string entries
fn lenient_tags(map: &Map<String, Value>) -> Option<Vec<String>> {
    match map.get("tags")? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|tag| tag.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

/// A license given as a string or a list of strings (joined)
fn lenient_license(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(license) if !license.is_empty() => Some(license.clone()),
        Value::Array(items) => {
            let licenses: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!licenses.is_empty()).then(|| licenses.join(", "))
        }
        _ => None,
    }
}

impl RawModel {
    /// Read a payload object field by field.
    ///
    /// When a Hub name and its canonical alias are both present, the Hub
    /// name wins.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            id: lenient_field(map, &["id"]),
            name: lenient_field(map, &["name"]),
            author: lenient_field(map, &["author"]),
            description: lenient_field(map, &["description"]),
            tags: lenient_tags(map),
            downloads: lenient_field(map, &["downloads", "downloadCount"]),
            likes: lenient_field(map, &["likes"]),
            last_modified: lenient_field(map, &["lastModified", "lastUpdated"]),
            image_url: lenient_field(map, &["imageUrl"]),
            hugging_face_url: lenient_field(map, &["huggingFaceUrl"]),
            github: lenient_field(map, &["github", "githubUrl"]),
            arxiv: lenient_field(map, &["arxiv", "paperUrl"]),
            license: lenient_license(map.get("license")),
            card_data: map.get("cardData").and_then(Value::as_object).map(|card| CardData {
                license: lenient_license(card.get("license")),
            }),
        }
    }

    /// Normalize a list entry. Entries without an id cannot be addressed
    /// and yield `None`.
    pub fn into_record(self, now: DateTime<Utc>) -> Option<ModelRecord> {
        let id = self.id.clone().filter(|id| !id.is_empty())?;
        Some(self.into_record_for(&id, now))
    }

    /// Normalize a single-model payload fetched for `requested_id`.
    ///
    /// The payload's own id wins when present.
    pub fn into_record_for(self, requested_id: &str, now: DateTime<Utc>) -> ModelRecord {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| requested_id.to_string());
        let (derived_author, derived_name) = split_model_id(&id);

        let last_updated = self
            .last_modified
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);

        let license = self
            .license
            .or_else(|| self.card_data.and_then(|card| card.license));

        ModelRecord {
            name: self.name.filter(|n| !n.is_empty()).unwrap_or(derived_name),
            author: self
                .author
                .filter(|a| !a.is_empty())
                .unwrap_or(derived_author),
            description: self
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            tags: self.tags.unwrap_or_default(),
            download_count: self.downloads.unwrap_or(0),
            likes: self.likes.unwrap_or(0),
            last_updated,
            image_url: self
                .image_url
                .or_else(|| Some(format!("{HUGGING_FACE_SITE}/{id}/resolve/main/thumbnail.png"))),
            hugging_face_url: self
                .hugging_face_url
                .or_else(|| Some(format!("{HUGGING_FACE_SITE}/{id}"))),
            github_url: self.github,
            paper_url: self.arxiv,
            license,
            id,
        }
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!("Ignoring unparseable timestamp {:?}: {}", value, e);
            None
        }
    }
}

/// Ordering applied to model lists
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortOrder {
    /// Likes, then downloads, then most recent update
    #[default]
    Trending,
    Downloads,
    Likes,
    /// Most recently updated first (`recent` is accepted as an alias)
    Modified,
    /// Passed through to the catalog verbatim; sorted by likes locally
    Other(String),
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "trending" => SortOrder::Trending,
            "downloads" => SortOrder::Downloads,
            "likes" => SortOrder::Likes,
            "modified" | "recent" => SortOrder::Modified,
            other => SortOrder::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::Trending => "trending",
            SortOrder::Downloads => "downloads",
            SortOrder::Likes => "likes",
            SortOrder::Modified => "modified",
            SortOrder::Other(other) => other,
        }
    }

    /// Compare two records; `Less` means `a` comes first.
    pub fn compare(&self, a: &ModelRecord, b: &ModelRecord) -> Ordering {
        match self {
            SortOrder::Downloads => b.download_count.cmp(&a.download_count),
            SortOrder::Likes | SortOrder::Other(_) => b.likes.cmp(&a.likes),
            SortOrder::Modified => b.last_updated.cmp(&a.last_updated),
            SortOrder::Trending => b
                .likes
                .cmp(&a.likes)
                .then_with(|| b.download_count.cmp(&a.download_count))
                .then_with(|| b.last_updated.cmp(&a.last_updated)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        SortOrder::parse(&value)
    }
}

impl From<SortOrder> for String {
    fn from(value: SortOrder) -> Self {
        value.as_str().to_string()
    }
}

/// Stable in-place sort
pub fn sort_records(records: &mut [ModelRecord], order: &SortOrder) {
    records.sort_by(|a, b| order.compare(a, b));
}

/// Keep records tagged with `tag`; an empty tag keeps everything.
pub fn filter_by_tag(records: Vec<ModelRecord>, tag: &str) -> Vec<ModelRecord> {
    if tag.is_empty() {
        return records;
    }
    records.into_iter().filter(|r| r.has_tag(tag)).collect()
}

/// Parameters of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelQuery {
    pub limit: usize,
    pub sort: SortOrder,
    /// Tag filter; empty means no filter
    pub filter: String,
    /// Skip the cache freshness check
    pub refresh: bool,
}

/// Default page size for list requests
pub const DEFAULT_LIMIT: usize = 20;

impl Default for ModelQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            sort: SortOrder::Trending,
            filter: String::new(),
            refresh: false,
        }
    }
}

impl ModelQuery {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn refreshed(mut self) -> Self {
        self.refresh = true;
        self
    }

    /// Query-string pairs shared by both network tiers
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if !self.sort.as_str().is_empty() {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }
        if !self.filter.is_empty() {
            pairs.push(("filter", self.filter.clone()));
        }
        pairs
    }
}
