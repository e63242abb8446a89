// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock catalog source for testing
//!
//! A configurable `ModelSource` that answers from memory and counts calls,
//! so tier sequencing can be tested without a network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::record::{ModelQuery, RawModel};
use super::source::{ModelSource, SourceResult};
use crate::error::SourceError;

/// How the mock should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Network,
    Status(u16),
    Parse,
}

impl MockFailure {
    fn to_error(self, source: &str) -> SourceError {
        match self {
            MockFailure::Network => SourceError::Network(format!("{source}: connection refused")),
            MockFailure::Status(status) => SourceError::HttpStatus {
                status,
                url: format!("mock://{source}"),
            },
            MockFailure::Parse => SourceError::Parse(format!("{source}: unexpected payload")),
        }
    }
}

/// A mock catalog source
#[derive(Clone)]
pub struct MockSource {
    name: String,
    models: Arc<Mutex<Vec<RawModel>>>,
    failure: Arc<Mutex<Option<MockFailure>>>,
    list_calls: Arc<AtomicUsize>,
    get_calls: Arc<AtomicUsize>,
    recorded_queries: Arc<Mutex<Vec<ModelQuery>>>,
}

impl MockSource {
    /// A source that answers with no models
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            list_calls: Arc::new(AtomicUsize::new(0)),
            get_calls: Arc::new(AtomicUsize::new(0)),
            recorded_queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve raw models with the given ids
    pub fn with_ids(self, ids: &[&str]) -> Self {
        let models = ids
            .iter()
            .map(|id| RawModel {
                id: Some(id.to_string()),
                ..Default::default()
            })
            .collect();
        self.with_models(models)
    }

    pub fn with_models(self, models: Vec<RawModel>) -> Self {
        *lock(&self.models) = models;
        self
    }

    /// Fail every call
    pub fn failing(self, failure: MockFailure) -> Self {
        self.set_failure(Some(failure));
        self
    }

    /// Change failure mode after construction (clones share state)
    pub fn set_failure(&self, failure: Option<MockFailure>) {
        *lock(&self.failure) = failure;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Total calls of either kind
    pub fn calls(&self) -> usize {
        self.list_calls() + self.get_calls()
    }

    pub fn recorded_queries(&self) -> Vec<ModelQuery> {
        lock(&self.recorded_queries).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Mock source lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

#[async_trait]
impl ModelSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_models(&self, query: &ModelQuery) -> SourceResult<Vec<RawModel>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.recorded_queries).push(query.clone());

        if let Some(failure) = *lock(&self.failure) {
            return Err(failure.to_error(&self.name));
        }
        let mut models = lock(&self.models).clone();
        models.truncate(query.limit);
        Ok(models)
    }

    async fn get_model(&self, id: &str) -> SourceResult<RawModel> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = *lock(&self.failure) {
            return Err(failure.to_error(&self.name));
        }
        lock(&self.models)
            .iter()
            .find(|m| m.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| SourceError::HttpStatus {
                status: 404,
                url: format!("mock://{}/{}", self.name, id),
            })
    }
}
