//! Progress aggregation: dataset completion, annotation coverage, and the
//! read models built on them (dataset listing, details, text-pair browser).

use std::collections::HashMap;

use annotate_core::error::CoreError;
use annotate_core::pagination::PageRequest;
use annotate_core::progress::{
    completion_breakdown, progress_pct, total_pages, AnnotationCoverage, CompletionBreakdown,
    DatasetTaskCounts,
};
use annotate_core::types::{DbId, Timestamp};
use annotate_db::models::dataset::Dataset;
use annotate_db::models::text_pair::TextPairAnnotationRow;
use annotate_db::models::user::AnnotatorWorkload;
use annotate_db::repositories::{ClassRepo, DatasetRepo, TaskRepo, TextPairRepo, UserRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Percentage of the dataset's tasks that are DONE, `0.0` without tasks.
pub async fn calculate_dataset_progress(pool: &PgPool, dataset_id: DbId) -> AppResult<f64> {
    let totals = TaskRepo::totals_for_dataset(pool, dataset_id).await?;
    Ok(progress_pct(totals.completed, totals.total))
}

/// Distinct annotated pairs vs. the rest, for one dataset.
pub async fn count_annotated_text_pairs(
    pool: &PgPool,
    dataset_id: DbId,
) -> AppResult<AnnotationCoverage> {
    let total = TextPairRepo::count_by_dataset(pool, dataset_id).await?;
    let annotated = TextPairRepo::count_annotated(pool, dataset_id).await?;
    Ok(AnnotationCoverage::new(total, annotated))
}

pub async fn find_dataset(pool: &PgPool, dataset_id: DbId) -> AppResult<Dataset> {
    Ok(DatasetRepo::find_by_id(pool, dataset_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Dataset",
            id: dataset_id,
        })?)
}

/// One dataset row in the admin listing.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub classes: Vec<String>,
    pub progress: f64,
    pub created_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct DatasetPage {
    pub datasets: Vec<DatasetSummary>,
    /// Counts over every dataset, not only this page.
    pub counts: CompletionBreakdown,
    pub total_elements: i64,
    pub total_pages: i64,
    pub page: i64,
    pub size: i64,
}

/// Paged dataset listing with progress and store-wide completion counts.
pub async fn list_datasets(pool: &PgPool, page: PageRequest) -> AppResult<DatasetPage> {
    let total_elements = DatasetRepo::count(pool).await?;
    let datasets = DatasetRepo::list_page(pool, page.size, page.offset()).await?;

    let with_tasks: Vec<DatasetTaskCounts> = DatasetRepo::task_totals(pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let counts = completion_breakdown(total_elements, &with_tasks);
    let progress_by_dataset: HashMap<DbId, f64> = with_tasks
        .iter()
        .map(|c| (c.dataset_id, progress_pct(c.completed, c.total)))
        .collect();

    let ids: Vec<DbId> = datasets.iter().map(|d| d.id).collect();
    let mut classes_by_dataset: HashMap<DbId, Vec<String>> = HashMap::new();
    for class in ClassRepo::list_by_datasets(pool, &ids).await? {
        classes_by_dataset
            .entry(class.dataset_id)
            .or_default()
            .push(class.name);
    }

    let datasets = datasets
        .into_iter()
        .map(|d| DatasetSummary {
            progress: progress_by_dataset.get(&d.id).copied().unwrap_or(0.0),
            classes: classes_by_dataset.remove(&d.id).unwrap_or_default(),
            id: d.id,
            name: d.name,
            description: d.description,
            created_at: d.created_at,
        })
        .collect();

    Ok(DatasetPage {
        datasets,
        counts,
        total_elements,
        total_pages: total_pages(total_elements, page.size),
        page: page.page,
        size: page.size,
    })
}

#[derive(Debug, Serialize)]
pub struct DatasetDetails {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub classes: Vec<String>,
    pub progress: f64,
    pub total_pairs: i64,
    pub annotated: i64,
    pub not_annotated: i64,
}

pub async fn dataset_details(pool: &PgPool, dataset_id: DbId) -> AppResult<DatasetDetails> {
    let dataset = find_dataset(pool, dataset_id).await?;
    let classes = ClassRepo::list_by_dataset(pool, dataset_id)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    let progress = calculate_dataset_progress(pool, dataset_id).await?;
    let coverage = count_annotated_text_pairs(pool, dataset_id).await?;

    Ok(DatasetDetails {
        id: dataset.id,
        name: dataset.name,
        description: dataset.description,
        classes,
        progress,
        total_pairs: coverage.total,
        annotated: coverage.annotated,
        not_annotated: coverage.not_annotated,
    })
}

/// First annotation recorded on a pair.
#[derive(Debug, Serialize)]
pub struct PairAnnotation {
    pub id: DbId,
    pub class_id: Option<DbId>,
    pub class_name: Option<String>,
    pub annotator_id: Option<DbId>,
    pub annotated_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct TextPairView {
    pub id: DbId,
    pub text1: String,
    pub text2: String,
    pub assigned: bool,
    pub has_annotations: bool,
    pub annotation: Option<PairAnnotation>,
}

impl From<TextPairAnnotationRow> for TextPairView {
    fn from(row: TextPairAnnotationRow) -> Self {
        let annotation = row.annotation_id.map(|id| PairAnnotation {
            id,
            class_id: row.class_id,
            class_name: row.class_name,
            annotator_id: row.annotator_id,
            annotated_at: row.annotated_at,
        });
        Self {
            id: row.id,
            text1: row.text1,
            text2: row.text2,
            assigned: row.assigned,
            has_annotations: annotation.is_some(),
            annotation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignedAnnotator {
    #[serde(flatten)]
    pub annotator: AnnotatorWorkload,
    pub can_unassign: bool,
}

#[derive(Debug, Serialize)]
pub struct TextPairPage {
    pub dataset_id: DbId,
    pub dataset_name: String,
    pub text_pairs: Vec<TextPairView>,
    pub annotators: Vec<AssignedAnnotator>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub page: i64,
    pub size: i64,
}

/// One page of a dataset's pairs with their first annotation, plus the
/// annotators currently working on the dataset.
pub async fn text_pair_page(
    pool: &PgPool,
    dataset_id: DbId,
    page: PageRequest,
) -> AppResult<TextPairPage> {
    let dataset = find_dataset(pool, dataset_id).await?;
    let total_elements = TextPairRepo::count_by_dataset(pool, dataset_id).await?;
    let text_pairs =
        TextPairRepo::list_page_with_annotation(pool, dataset_id, page.size, page.offset())
            .await?
            .into_iter()
            .map(TextPairView::from)
            .collect();
    let annotators = UserRepo::list_assigned_to_dataset(pool, dataset_id)
        .await?
        .into_iter()
        .map(|annotator| AssignedAnnotator {
            annotator,
            can_unassign: true,
        })
        .collect();

    Ok(TextPairPage {
        dataset_id,
        dataset_name: dataset.name,
        text_pairs,
        annotators,
        total_elements,
        total_pages: total_pages(total_elements, page.size),
        page: page.page,
        size: page.size,
    })
}
