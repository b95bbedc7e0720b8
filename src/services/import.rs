//! The sourcing data import pipeline.
//!
//! Stages run strictly sequentially within one job:
//! parse -> validate -> geocode -> persist -> calculate impact.
//! Row-level validation failures are accumulated and reported; parse and
//! persistence failures abort the whole job.

use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::ImportProgressKind;
use crate::services::file_service::FileService;
use crate::services::geocoding::Geocoder;
use crate::services::progress::ImportProgressTracker;
use crate::services::queue::ImportJob;
use crate::services::{validation, xlsx_parser};

/// Counts reported after a successful pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub locations: usize,
    pub records: usize,
    pub indicator_records: usize,
    pub row_errors: usize,
}

/// Run the full pipeline for one dequeued job.
///
/// The temporary file is NOT deleted here; the worker owns cleanup so it
/// happens on the failure path too.
pub async fn run_pipeline(
    pool: &DbPool,
    files: &FileService,
    geocoder: &dyn Geocoder,
    tracker: &mut ImportProgressTracker,
    job: &ImportJob,
) -> AppResult<ImportSummary> {
    files.is_file_present(&job.file_path).await?;

    tracker.stage(ImportProgressKind::ImportingData);

    let path = job.file_path.clone();
    let workbook = tokio::task::spawn_blocking(move || xlsx_parser::parse_workbook(&path))
        .await
        .map_err(|e| AppError::Parse(format!("Parser task panicked: {}", e)))??;

    info!(
        task_id = %job.task_id,
        rows = workbook.sourcing_data.len(),
        "Parsed sourcing data sheet"
    );

    let outcome = validation::validate_sourcing_rows(&workbook.sourcing_data);
    let row_errors = outcome.errors.len();
    if row_errors > 0 {
        pool.set_task_errors(job.task_id, &outcome.errors).await?;
        info!(
            task_id = %job.task_id,
            errors = row_errors,
            "Validation flagged malformed rows"
        );
    }

    let mut records = outcome.records;

    tracker.stage(ImportProgressKind::Geocoding);
    let total = records.len();
    let mut warnings: Vec<String> = Vec::new();
    for (processed, record) in records.iter_mut().enumerate() {
        geocoder.geocode(record).await?;
        if let Some(warning) = &record.location_warning {
            warnings.push(warning.clone());
        }
        tracker.geocoding_progress(processed + 1, total);
    }
    if !warnings.is_empty() {
        pool.append_task_logs(job.task_id, &warnings).await?;
    }

    let (locations, persisted) = pool.replace_sourcing_data(&records).await?;
    info!(
        task_id = %job.task_id,
        locations,
        records = persisted,
        "Persisted sourcing data batch"
    );

    tracker.stage(ImportProgressKind::CalculatingImpact);
    let indicator_records = pool.recalculate_indicator_records().await?;
    info!(
        task_id = %job.task_id,
        indicator_records,
        "Indicator records generated"
    );

    Ok(ImportSummary {
        locations,
        records: persisted,
        indicator_records,
        row_errors,
    })
}
