//! Shared query parameter types for API handlers.

use annotate_core::pagination::{
    clamp_limit, clamp_offset, PageRequest, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT,
};
use annotate_core::types::DbId;
use serde::Deserialize;

/// Zero-based page parameters (`?page=&size=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

/// Offset pagination parameters (`?limit=&offset=`) for the activity log.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` for activity log listings.
    pub fn activity_window(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// Query parameters for the annotator workspace.
#[derive(Debug, Deserialize)]
pub struct WorkspaceParams {
    pub dataset_id: DbId,
    pub page: Option<i64>,
}
