//! Import job queue and worker.
//!
//! A bounded mpsc channel with a single consumer task: jobs are delivered in
//! FIFO order and at most one job is processed at a time, so two workers can
//! never run the same job concurrently. The queue handle is created at
//! process start and passed explicitly to whatever needs to enqueue - there
//! is no ambient global client.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::TaskStatus;
use crate::services::file_service::FileService;
use crate::services::geocoding::Geocoder;
use crate::services::import;
use crate::services::progress::ImportProgressTracker;
use crate::services::EventBroadcaster;

/// One queued file-processing request.
#[derive(Debug)]
pub struct ImportJob {
    pub task_id: Uuid,
    pub file_path: PathBuf,
}

/// Explicit handle for enqueueing import jobs.
///
/// Dropping every clone closes the channel and lets the worker drain and
/// exit, which is the shutdown path.
#[derive(Clone)]
pub struct ImportQueue {
    tx: mpsc::Sender<ImportJob>,
}

impl ImportQueue {
    /// Create the queue and the receiver the worker consumes from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ImportJob>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueue a job without blocking the request handler.
    ///
    /// Queue errors surface to the caller here; they are not retried.
    pub fn enqueue(&self, job: ImportJob) -> AppResult<()> {
        self.tx.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => {
                AppError::QueueUnavailable("import queue is full".to_string())
            }
            TrySendError::Closed(_) => {
                AppError::QueueUnavailable("import worker is not running".to_string())
            }
        })
    }
}

/// Everything the worker needs, wired at process start.
pub struct ImportWorker {
    pub pool: DbPool,
    pub broadcaster: EventBroadcaster,
    pub files: FileService,
    pub geocoder: Arc<dyn Geocoder>,
}

/// Spawn the single consumer task draining the import queue.
pub fn start_import_worker(
    worker: ImportWorker,
    mut rx: mpsc::Receiver<ImportJob>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Import worker started");

        while let Some(job) = rx.recv().await {
            process_job(&worker, job).await;
        }

        info!("Import queue closed, worker exiting");
    })
}

/// Run one job to completion or failure. Never panics the worker loop.
async fn process_job(worker: &ImportWorker, job: ImportJob) {
    let task_id = job.task_id;
    let mut tracker = ImportProgressTracker::new(task_id, worker.broadcaster.clone());

    // queued -> processing; a task already in a terminal state stays there
    match worker
        .pool
        .transition_task(task_id, TaskStatus::Queued, TaskStatus::Processing)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            warn!(task_id = %task_id, "Dequeued job for a task not in queued state, skipping");
            return;
        }
        Err(e) => {
            error!(task_id = %task_id, error = %e, "Failed to start processing");
            return;
        }
    }

    let result = import::run_pipeline(
        &worker.pool,
        &worker.files,
        worker.geocoder.as_ref(),
        &mut tracker,
        &job,
    )
    .await;

    match result {
        Ok(summary) => {
            match worker
                .pool
                .transition_task(task_id, TaskStatus::Processing, TaskStatus::Completed)
                .await
            {
                Ok(_) => {
                    tracker.finished();
                    info!(
                        task_id = %task_id,
                        locations = summary.locations,
                        records = summary.records,
                        row_errors = summary.row_errors,
                        "Import completed"
                    );
                }
                Err(e) => {
                    error!(task_id = %task_id, error = %e, "Failed to mark task completed");
                }
            }
        }
        Err(e) => {
            // Pipeline failures mark the task failed and notify subscribers
            // instead of being swallowed.
            if let Err(db_err) = worker.pool.fail_task(task_id, &e.to_string()).await {
                error!(task_id = %task_id, error = %db_err, "Failed to mark task failed");
            }
            tracker.failed();
            error!(task_id = %task_id, error = %e, "Import failed");
        }
    }

    // Cleanup runs for success and failure alike; a file that is already
    // gone is not an error here.
    match worker.files.delete(&job.file_path).await {
        Ok(()) | Err(AppError::NotFound(_)) => {}
        Err(e) => {
            warn!(task_id = %task_id, error = %e, "Failed to delete temporary file");
        }
    }
}
