//! Page/limit pagination for listings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 25;
pub const MAX_LIMIT: u32 = 100;

/// A normalized page request (1-based page number).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from optional client values.
    ///
    /// Missing or non-positive values fall back to the defaults; `limit` is capped
    /// at [`MAX_LIMIT`].
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .map(|l| l.min(MAX_LIMIT as i64) as u32)
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Index one past the last record of this page.
    pub fn end(&self) -> usize {
        self.page as usize * self.limit as usize
    }

    /// Links to the neighbouring pages given the total record count.
    pub fn pagination(&self, total: usize) -> Pagination {
        Pagination {
            next: (self.end() < total).then(|| PageLink {
                page: self.page + 1,
                limit: self.limit,
            }),
            prev: (self.offset() > 0).then(|| PageLink {
                page: self.page - 1,
                limit: self.limit,
            }),
        }
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}
