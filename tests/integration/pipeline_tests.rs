//! Tests for the import pipeline and worker failure handling.

use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use sourcing_import_lib::models::TaskStatus;
use sourcing_import_lib::services::geocoding::CoordinateGeocoder;
use sourcing_import_lib::services::import::run_pipeline;
use sourcing_import_lib::services::progress::ImportProgressTracker;
use sourcing_import_lib::services::{
    start_import_worker, EventBroadcaster, FileService, ImportJob, ImportQueue, ImportWorker,
};

use crate::common;
use crate::common::{TonnageCell, UploadRow};

#[actix_web::test]
async fn test_pipeline_persists_valid_rows() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let broadcaster = EventBroadcaster::new();

    let task_id = Uuid::new_v4();
    let file_path = files.upload_path(task_id);
    common::write_sourcing_workbook(
        &file_path,
        &[
            UploadRow {
                hs_code: "1005",
                location_type: "country of production",
                country: "Spain",
                tonnage: TonnageCell::Number(500.5),
            },
            UploadRow {
                hs_code: "4107",
                location_type: "country of production",
                country: "Kenya",
                tonnage: TonnageCell::Number(20.0),
            },
        ],
    );

    pool.insert_task(task_id, "sourcing.xlsx", &file_path.to_string_lossy())
        .await
        .unwrap();

    let mut tracker = ImportProgressTracker::new(task_id, broadcaster);
    let job = ImportJob { task_id, file_path };
    let summary = run_pipeline(&pool, &files, &CoordinateGeocoder, &mut tracker, &job)
        .await
        .unwrap();

    assert_eq!(summary.locations, 2);
    assert_eq!(summary.records, 2);
    assert_eq!(summary.indicator_records, 2);
    assert_eq!(summary.row_errors, 0);
    assert_eq!(pool.count_sourcing_records().await.unwrap(), 2);
}

#[actix_web::test]
async fn test_reimport_replaces_previous_data() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());

    let rows = [
        UploadRow {
            hs_code: "1005",
            location_type: "country of production",
            country: "Spain",
            tonnage: TonnageCell::Number(500.5),
        },
        UploadRow {
            hs_code: "4107",
            location_type: "country of production",
            country: "Kenya",
            tonnage: TonnageCell::Number(20.0),
        },
    ];

    // Run the same workbook twice through the pipeline
    for _ in 0..2 {
        let task_id = Uuid::new_v4();
        let file_path = files.upload_path(task_id);
        common::write_sourcing_workbook(&file_path, &rows);
        pool.insert_task(task_id, "sourcing.xlsx", &file_path.to_string_lossy())
            .await
            .unwrap();

        let mut tracker = ImportProgressTracker::new(task_id, EventBroadcaster::new());
        let job = ImportJob { task_id, file_path };
        run_pipeline(&pool, &files, &CoordinateGeocoder, &mut tracker, &job)
            .await
            .unwrap();
    }

    // Wipe-then-insert keeps counts stable across re-imports
    assert_eq!(pool.count_sourcing_records().await.unwrap(), 2);
    assert_eq!(pool.count_indicator_records().await.unwrap(), 2);
}

#[actix_web::test]
async fn test_missing_file_fails_pipeline() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());

    let task_id = Uuid::new_v4();
    let file_path = files.upload_path(task_id);
    let mut tracker = ImportProgressTracker::new(task_id, EventBroadcaster::new());
    let job = ImportJob { task_id, file_path };

    let result = run_pipeline(&pool, &files, &CoordinateGeocoder, &mut tracker, &job).await;
    assert!(result.is_err());
}

#[actix_web::test]
async fn test_worker_marks_failed_task_and_broadcasts() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let broadcaster = EventBroadcaster::new();
    let mut events = broadcaster.subscribe();
    let (queue, queue_rx) = ImportQueue::new(4);

    start_import_worker(
        ImportWorker {
            pool: pool.clone(),
            broadcaster: broadcaster.clone(),
            files: files.clone(),
            geocoder: Arc::new(CoordinateGeocoder),
        },
        queue_rx,
    );

    // A corrupt staged file: not an xlsx container
    let task_id = Uuid::new_v4();
    let file_path = files.upload_path(task_id);
    std::fs::write(&file_path, b"not a spreadsheet").unwrap();
    pool.insert_task(task_id, "broken.xlsx", &file_path.to_string_lossy())
        .await
        .unwrap();

    queue
        .enqueue(ImportJob {
            task_id,
            file_path: file_path.clone(),
        })
        .unwrap();

    let task = common::wait_for_terminal(&pool, task_id).await;
    assert_eq!(TaskStatus::parse(&task.status), Some(TaskStatus::Failed));
    assert!(task.error_message.is_some());

    // Terminal FAILED event reached subscribers
    let mut saw_failed = false;
    while let Ok(event) = events.try_recv() {
        if event.kind.as_str() == "FAILED" {
            saw_failed = true;
            assert_eq!(event.status, TaskStatus::Failed);
        }
    }
    assert!(saw_failed);

    // The staged file was cleaned up on the failure path too
    assert!(!file_path.exists());
}

#[actix_web::test]
async fn test_worker_skips_task_not_in_queued_state() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let (queue, queue_rx) = ImportQueue::new(4);

    start_import_worker(
        ImportWorker {
            pool: pool.clone(),
            broadcaster: EventBroadcaster::new(),
            files: files.clone(),
            geocoder: Arc::new(CoordinateGeocoder),
        },
        queue_rx,
    );

    // Task already completed before the job is picked up
    let task_id = Uuid::new_v4();
    pool.insert_task(task_id, "sourcing.xlsx", "/tmp/gone.xlsx")
        .await
        .unwrap();
    assert!(
        pool.transition_task(task_id, TaskStatus::Queued, TaskStatus::Processing)
            .await
            .unwrap()
    );
    assert!(
        pool.transition_task(task_id, TaskStatus::Processing, TaskStatus::Completed)
            .await
            .unwrap()
    );

    queue
        .enqueue(ImportJob {
            task_id,
            file_path: PathBuf::from("/tmp/gone.xlsx"),
        })
        .unwrap();

    // The worker must leave the terminal status untouched
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let task = pool.get_task(task_id).await.unwrap().unwrap();
    assert_eq!(TaskStatus::parse(&task.status), Some(TaskStatus::Completed));
}
