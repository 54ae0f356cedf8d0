//! Page and limit clamping for listing endpoints.

/// Default page size for dataset and text-pair listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size for dataset and text-pair listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of activity log entries per request.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 50;

/// Maximum number of activity log entries per request.
pub const MAX_ACTIVITY_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// A zero-based page request after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(0).max(0),
            size: clamp_limit(size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}
