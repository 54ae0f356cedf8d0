//! Activity log action codes and their dashboard classification.
//!
//! Action codes are stored verbatim in `activity_logs.action`.

use serde::Serialize;

pub mod actions {
    pub const DATASET_CREATED: &str = "DATASET_CREATED";
    pub const DATASET_ERROR: &str = "DATASET_ERROR";
    pub const DATASET_DOWNLOADED: &str = "DATASET_DOWNLOADED";
    pub const DATASET_DOWNLOAD_ERROR: &str = "DATASET_DOWNLOAD_ERROR";
    pub const CLASSES_CREATED: &str = "CLASSES_CREATED";
    pub const FILE_PROCESSING_ERROR: &str = "FILE_PROCESSING_ERROR";

    pub const TASKS_ASSIGNED: &str = "TASKS_ASSIGNED";
    pub const TASK_ASSIGNMENT_ERROR: &str = "TASK_ASSIGNMENT_ERROR";
    pub const ANNOTATOR_UNASSIGNED: &str = "ANNOTATOR_UNASSIGNED";
    pub const ANNOTATOR_UNASSIGN_ERROR: &str = "ANNOTATOR_UNASSIGN_ERROR";

    pub const ANNOTATION_CREATED: &str = "ANNOTATION_CREATED";
    pub const ANNOTATION_ERROR: &str = "ANNOTATION_ERROR";

    pub const USER_CREATED: &str = "USER_CREATED";
    pub const USER_CREATION_ERROR: &str = "USER_CREATION_ERROR";
    pub const ANNOTATOR_UPDATED: &str = "ANNOTATOR_UPDATED";
    pub const ANNOTATOR_UPDATE_ERROR: &str = "ANNOTATOR_UPDATE_ERROR";
    pub const ANNOTATOR_DELETED: &str = "ANNOTATOR_DELETED";
    pub const ANNOTATOR_DELETE_ERROR: &str = "ANNOTATOR_DELETE_ERROR";
    pub const ANNOTATOR_FETCH_ERROR: &str = "ANNOTATOR_FETCH_ERROR";

    pub const TASKS_FETCH_ERROR: &str = "TASKS_FETCH_ERROR";
    pub const STATISTICS_ERROR: &str = "STATISTICS_ERROR";

    pub const USER_LOGIN: &str = "USER_LOGIN";
    pub const USER_LOGOUT: &str = "USER_LOGOUT";
}

/// How an activity is rendered in the dashboard feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Success,
    Info,
    Error,
}

impl ActivityKind {
    /// Classify an action code. Unknown codes ending in `_ERROR` are errors,
    /// everything else unknown is informational.
    pub fn of(action: &str) -> Self {
        match action {
            actions::DATASET_CREATED
            | actions::TASKS_ASSIGNED
            | actions::ANNOTATOR_UNASSIGNED
            | actions::DATASET_DOWNLOADED => Self::Success,
            actions::USER_CREATED | actions::ANNOTATION_CREATED => Self::Info,
            other if other.ends_with("_ERROR") => Self::Error,
            _ => Self::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_success_codes() {
        assert_eq!(ActivityKind::of(actions::DATASET_CREATED), ActivityKind::Success);
        assert_eq!(ActivityKind::of(actions::TASKS_ASSIGNED), ActivityKind::Success);
    }

    #[test]
    fn error_suffix_is_error() {
        assert_eq!(ActivityKind::of(actions::TASK_ASSIGNMENT_ERROR), ActivityKind::Error);
        assert_eq!(ActivityKind::of("SOMETHING_NEW_ERROR"), ActivityKind::Error);
    }

    #[test]
    fn unknown_is_info() {
        assert_eq!(ActivityKind::of("DATASETS_RETRIEVED"), ActivityKind::Info);
        assert_eq!(ActivityKind::of(actions::ANNOTATION_CREATED), ActivityKind::Info);
    }
}
