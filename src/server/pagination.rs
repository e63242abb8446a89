// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Page arithmetic for the list endpoint

use serde::Serialize;

/// Pagination metadata returned next to a page of models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Total matching models
    pub total: usize,
    /// Current page (1-indexed)
    pub page: usize,
    /// Page size
    pub limit: usize,
    /// Total number of pages
    pub pages: usize,
}

impl Pagination {
    /// Compute metadata; page and limit below 1 are raised to 1.
    pub fn new(total: usize, page: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            page: page.max(1),
            limit,
            pages: total.div_ceil(limit),
        }
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Slice out this page's items
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}
