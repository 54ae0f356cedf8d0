//! Completion math shared by dataset listings, dataset details, the annotator
//! workspace and the statistics dashboard.
//!
//! All inputs are raw counts coming from the task and annotation tables;
//! nothing here queries storage.

use serde::Serialize;

use crate::types::DbId;

/// Percentage of `completed` over `total`, capped at 100.
///
/// Returns `0.0` when there is nothing to complete.
pub fn progress_pct(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (completed as f64 * 100.0 / total as f64).min(100.0)
}

/// Canonical completion rule: at least one task, and every task done.
pub fn is_complete(completed: i64, total: i64) -> bool {
    total > 0 && completed >= total
}

/// Integer completion percentage used for annotator rankings (floored).
pub fn completion_pct_floor(completed: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (completed * 100 / total).min(100)
}

/// Annotated vs. not-annotated pair counts for one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnotationCoverage {
    pub total: i64,
    pub annotated: i64,
    pub not_annotated: i64,
}

impl AnnotationCoverage {
    /// Build coverage from the dataset's pair count and the number of
    /// distinct pairs carrying at least one annotation.
    pub fn new(total: i64, annotated: i64) -> Self {
        let annotated = annotated.clamp(0, total.max(0));
        Self {
            total,
            annotated,
            not_annotated: total - annotated,
        }
    }
}

/// Task counts for one dataset that has at least one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetTaskCounts {
    pub dataset_id: DbId,
    pub total: i64,
    pub completed: i64,
}

/// Completed / not-completed / unassigned datasets across the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionBreakdown {
    pub completed: i64,
    pub not_completed: i64,
    pub unassigned: i64,
}

/// Classify datasets by completion.
///
/// `with_tasks` holds one entry per dataset referenced by at least one task;
/// every other dataset counts as unassigned.
pub fn completion_breakdown(
    total_datasets: i64,
    with_tasks: &[DatasetTaskCounts],
) -> CompletionBreakdown {
    let completed = with_tasks
        .iter()
        .filter(|c| is_complete(c.completed, c.total))
        .count() as i64;
    let assigned = with_tasks.len() as i64;
    CompletionBreakdown {
        completed,
        not_completed: assigned - completed,
        unassigned: (total_datasets - assigned).max(0),
    }
}

/// Number of pages for `total` items at `size` per page.
pub fn total_pages(total: i64, size: i64) -> i64 {
    if size <= 0 || total <= 0 {
        return 0;
    }
    (total + size - 1) / size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tasks_is_zero_progress() {
        assert_eq!(progress_pct(0, 0), 0.0);
    }

    #[test]
    fn all_done_is_exactly_one_hundred() {
        assert_eq!(progress_pct(7, 7), 100.0);
        assert_eq!(progress_pct(1, 1), 100.0);
    }

    #[test]
    fn partial_progress() {
        assert_eq!(progress_pct(1, 4), 25.0);
        assert!((progress_pct(2, 3) - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress_pct(9, 7), 100.0);
    }

    #[test]
    fn one_missing_task_is_not_complete() {
        assert!(!is_complete(99, 100));
        assert!(!is_complete(1, 2));
        assert!(is_complete(2, 2));
        assert!(!is_complete(0, 0));
    }

    #[test]
    fn floor_percentage_for_rankings() {
        assert_eq!(completion_pct_floor(2, 3), 66);
        assert_eq!(completion_pct_floor(0, 0), 0);
        assert_eq!(completion_pct_floor(5, 5), 100);
    }

    #[test]
    fn coverage_splits_total() {
        let c = AnnotationCoverage::new(10, 4);
        assert_eq!(c.annotated, 4);
        assert_eq!(c.not_annotated, 6);
    }

    #[test]
    fn coverage_never_negative() {
        let c = AnnotationCoverage::new(3, 5);
        assert_eq!(c.annotated, 3);
        assert_eq!(c.not_annotated, 0);
    }

    fn counts(dataset_id: i64, total: i64, completed: i64) -> DatasetTaskCounts {
        DatasetTaskCounts {
            dataset_id,
            total,
            completed,
        }
    }

    #[test]
    fn breakdown_counts_each_bucket() {
        let with_tasks = [counts(1, 4, 4), counts(2, 4, 3), counts(3, 10, 0)];
        let b = completion_breakdown(6, &with_tasks);
        assert_eq!(
            b,
            CompletionBreakdown {
                completed: 1,
                not_completed: 2,
                unassigned: 3,
            }
        );
    }

    #[test]
    fn breakdown_with_no_tasks_is_all_unassigned() {
        let b = completion_breakdown(4, &[]);
        assert_eq!(b.unassigned, 4);
        assert_eq!(b.completed + b.not_completed, 0);
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 1), 3);
    }
}
