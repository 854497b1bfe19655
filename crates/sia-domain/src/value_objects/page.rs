//! Pagination input and output

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// One-based page request. Out-of-range values are clamped on
/// construction, so a stored instance is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// One-based page number
    pub page: u32,
    /// Records per page, capped at [`MAX_PAGE_SIZE`]
    pub size: u32,
}

impl PageRequest {
    /// Clamping constructor: page at least 1, size in 1..=[`MAX_PAGE_SIZE`]
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of records to skip
    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * (self.size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the totals the reporting layer renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The page contents
    pub items: Vec<T>,
    /// Total matching records across all pages
    pub total: u64,
    /// One-based page number served
    pub page: u32,
    /// Page size used
    pub size: u32,
    /// Ceiling of total / size
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page, deriving `total_pages` from the request
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let total_pages = u32::try_from(total.div_ceil(u64::from(request.size))).unwrap_or(u32::MAX);
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
            total_pages,
        }
    }
}
