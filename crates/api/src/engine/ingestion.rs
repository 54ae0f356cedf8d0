//! Dataset ingestion from uploaded files, and CSV export.

use annotate_core::activity::actions;
use annotate_core::error::CoreError;
use annotate_core::export::{export_file_name, render_csv, ExportRow};
use annotate_core::ingest::{parse_class_names, parse_text_pairs, validate_dataset_name};
use annotate_core::types::DbId;
use annotate_db::models::class::DatasetClass;
use annotate_db::models::dataset::{CreateDataset, Dataset};
use annotate_db::repositories::{ClassRepo, DatasetRepo, TextPairRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::engine::activity::ActivityRecorder;
use crate::engine::progress::find_dataset;
use crate::error::AppResult;

/// Form fields of a dataset upload.
#[derive(Debug, Default)]
pub struct DatasetUpload {
    pub name: String,
    pub description: Option<String>,
    /// `;`-separated class names.
    pub classes: String,
    pub file_name: Option<String>,
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct CreatedDataset {
    pub dataset: Dataset,
    pub classes: Vec<DatasetClass>,
    pub text_pair_count: u64,
    /// Lines ignored because they had fewer than two fields.
    pub skipped_lines: Vec<usize>,
}

/// Create a dataset with its pairs and classes in one transaction.
pub async fn create_dataset(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    upload: DatasetUpload,
) -> AppResult<CreatedDataset> {
    let name = upload.name.clone();
    match try_create(pool, activity, actor_id, upload).await {
        Ok(created) => {
            activity
                .record(
                    actions::DATASET_CREATED,
                    format!(
                        "Dataset '{}' created with {} text pairs",
                        created.dataset.name, created.text_pair_count
                    ),
                    Some(actor_id),
                )
                .await;
            if !created.classes.is_empty() {
                let names: Vec<&str> = created.classes.iter().map(|c| c.name.as_str()).collect();
                activity
                    .record(
                        actions::CLASSES_CREATED,
                        format!(
                            "Classes for dataset '{}': {}",
                            created.dataset.name,
                            names.join(", ")
                        ),
                        Some(actor_id),
                    )
                    .await;
            }
            Ok(created)
        }
        Err(err) => {
            activity
                .record_failure(
                    actions::DATASET_ERROR,
                    &format!("Failed to create dataset '{}'", name.trim()),
                    &err,
                    Some(actor_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_create(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    upload: DatasetUpload,
) -> AppResult<CreatedDataset> {
    let name = validate_dataset_name(&upload.name)?;
    if upload.file.is_empty() {
        return Err(CoreError::Validation("A non-empty file is required".into()).into());
    }
    let content = String::from_utf8(upload.file)
        .map_err(|_| CoreError::Validation("File must be UTF-8 encoded text".into()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let parsed = parse_text_pairs(content);
    let class_names = parse_class_names(&upload.classes);
    let description = upload
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let mut tx = pool.begin().await?;
    let dataset = DatasetRepo::create(&mut tx, &CreateDataset { name, description }).await?;
    let text_pair_count = TextPairRepo::create_batch(&mut tx, dataset.id, &parsed.pairs).await?;
    let classes = ClassRepo::create_batch(&mut tx, dataset.id, &class_names).await?;
    tx.commit().await?;

    for record in &parsed.skipped {
        tracing::warn!(
            dataset_id = dataset.id,
            line = record.line,
            content = %record.content,
            "Skipped record with fewer than two fields"
        );
    }
    if !parsed.skipped.is_empty() {
        let lines: Vec<String> = parsed.skipped.iter().map(|r| r.line.to_string()).collect();
        activity
            .record(
                actions::FILE_PROCESSING_ERROR,
                format!(
                    "Dataset '{}': skipped {} malformed lines of {} (lines {})",
                    dataset.name,
                    parsed.skipped.len(),
                    upload.file_name.as_deref().unwrap_or("upload"),
                    lines.join(", ")
                ),
                Some(actor_id),
            )
            .await;
    }

    tracing::info!(
        dataset_id = dataset.id,
        text_pairs = text_pair_count,
        classes = classes.len(),
        "Dataset created"
    );

    Ok(CreatedDataset {
        dataset,
        classes,
        text_pair_count,
        skipped_lines: parsed.skipped.iter().map(|r| r.line).collect(),
    })
}

/// A rendered CSV download.
#[derive(Debug)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Render a dataset's pairs and latest annotations as CSV.
pub async fn export_csv(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    dataset_id: DbId,
) -> AppResult<CsvExport> {
    match try_export(pool, dataset_id).await {
        Ok((export, rows)) => {
            activity
                .record(
                    actions::DATASET_DOWNLOADED,
                    format!("Dataset {dataset_id} downloaded ({rows} text pairs)"),
                    Some(actor_id),
                )
                .await;
            Ok(export)
        }
        Err(err) => {
            activity
                .record_failure(
                    actions::DATASET_DOWNLOAD_ERROR,
                    &format!("Failed to export dataset {dataset_id}"),
                    &err,
                    Some(actor_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_export(pool: &PgPool, dataset_id: DbId) -> AppResult<(CsvExport, usize)> {
    find_dataset(pool, dataset_id).await?;
    let rows: Vec<ExportRow> = TextPairRepo::list_for_export(pool, dataset_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    if rows.is_empty() {
        return Err(CoreError::Validation("Dataset has no text pairs to export".into()).into());
    }
    Ok((
        CsvExport {
            file_name: export_file_name(dataset_id),
            content: render_csv(&rows),
        },
        rows.len(),
    ))
}
