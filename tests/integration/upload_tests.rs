//! Integration tests for the upload intake and the end-to-end import flow.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::Value;

use sourcing_import_lib::api;
use sourcing_import_lib::models::TaskStatus;
use sourcing_import_lib::services::geocoding::CoordinateGeocoder;
use sourcing_import_lib::services::{
    start_import_worker, EventBroadcaster, FileService, ImportJob, ImportQueue, ImportWorker,
};

use crate::common;
use crate::common::{TonnageCell, UploadRow};

#[actix_web::test]
async fn test_upload_without_file_is_rejected() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let (queue, _rx) = ImportQueue::new(16);
    let config = common::test_config(tmp.path());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(files))
            .app_data(web::Data::new(queue))
            .app_data(web::Data::new(config))
            .service(web::scope("/api/v1").configure(api::configure_import_routes)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/import/sourcing-data")
        .insert_header(("content-type", common::multipart_content_type()))
        .set_payload(common::multipart_body_without_file())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // No task record is left behind
    let (tasks, total) = pool.list_tasks(None, 50, 0).await.unwrap();
    assert!(tasks.is_empty());
    assert_eq!(total, 0);
}

#[actix_web::test]
async fn test_upload_non_xlsx_is_rejected() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let (queue, _rx) = ImportQueue::new(16);
    let config = common::test_config(tmp.path());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(files))
            .app_data(web::Data::new(queue))
            .app_data(web::Data::new(config))
            .service(web::scope("/api/v1").configure(api::configure_import_routes)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/import/sourcing-data")
        .insert_header(("content-type", common::multipart_content_type()))
        .set_payload(common::multipart_body("data.csv", b"a,b,c"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_web::test]
async fn test_upload_with_full_queue_fails_task_and_removes_file() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let config = common::test_config(tmp.path());

    // Capacity-one queue with no worker draining it: pre-filling it makes
    // the next enqueue fail.
    let (queue, _queue_rx) = ImportQueue::new(1);
    queue
        .enqueue(ImportJob {
            task_id: uuid::Uuid::new_v4(),
            file_path: tmp.path().join("placeholder.xlsx"),
        })
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(files.clone()))
            .app_data(web::Data::new(queue))
            .app_data(web::Data::new(config))
            .service(web::scope("/api/v1").configure(api::configure_import_routes)),
    )
    .await;

    let fixture = tmp.path().join("sourcing.xlsx");
    common::write_sourcing_workbook(
        &fixture,
        &[UploadRow {
            hs_code: "1005",
            location_type: "country of production",
            country: "Spain",
            tonnage: TonnageCell::Number(100.0),
        }],
    );
    let xlsx_bytes = std::fs::read(&fixture).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/import/sourcing-data")
        .insert_header(("content-type", common::multipart_content_type()))
        .set_payload(common::multipart_body("sourcing.xlsx", &xlsx_bytes))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "QUEUE_UNAVAILABLE");

    // The intake is still visible as a failed task
    let (tasks, total) = pool
        .list_tasks(Some(TaskStatus::Failed), 50, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(tasks[0].file_name, "sourcing.xlsx");
    assert_eq!(
        tasks[0].error_message.as_deref(),
        Some("import queue unavailable")
    );

    // The staged file was removed
    let task_id = tasks[0].id;
    assert!(!files.upload_path(task_id).exists());
}

#[actix_web::test]
async fn test_upload_end_to_end_completes_with_row_errors() {
    let pool = common::test_pool().await;
    let tmp = common::tmp_dir();
    let files = FileService::new(tmp.path().to_path_buf());
    let broadcaster = EventBroadcaster::new();
    let (queue, queue_rx) = ImportQueue::new(16);
    let config = common::test_config(tmp.path());

    let mut events = broadcaster.subscribe();

    start_import_worker(
        ImportWorker {
            pool: pool.clone(),
            broadcaster: broadcaster.clone(),
            files: files.clone(),
            geocoder: Arc::new(CoordinateGeocoder),
        },
        queue_rx,
    );

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(files.clone()))
            .app_data(web::Data::new(queue))
            .app_data(web::Data::new(config))
            .service(web::scope("/api/v1").configure(api::configure_import_routes)),
    )
    .await;

    // Three data rows; row 2 carries a non-numeric tonnage cell
    let fixture = tmp.path().join("sourcing.xlsx");
    common::write_sourcing_workbook(
        &fixture,
        &[
            UploadRow {
                hs_code: "1005",
                location_type: "country of production",
                country: "Spain",
                tonnage: TonnageCell::Number(100.0),
            },
            UploadRow {
                hs_code: "4107",
                location_type: "country of production",
                country: "Kenya",
                tonnage: TonnageCell::Text("oops"),
            },
            UploadRow {
                hs_code: "5201",
                location_type: "country of production",
                country: "India",
                tonnage: TonnageCell::Number(300.0),
            },
        ],
    );
    let xlsx_bytes = std::fs::read(&fixture).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/import/sourcing-data")
        .insert_header(("content-type", common::multipart_content_type()))
        .set_payload(common::multipart_body("sourcing.xlsx", &xlsx_bytes))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "queued");
    let task_id = body["task_id"]
        .as_str()
        .expect("task id in response")
        .parse()
        .unwrap();

    let task = common::wait_for_terminal(&pool, task_id).await;
    assert_eq!(
        TaskStatus::parse(&task.status),
        Some(TaskStatus::Completed),
        "error_message: {:?}",
        task.error_message
    );

    // Row 2 was rejected, rows 1 and 3 persisted
    let errors: Vec<Value> =
        serde_json::from_value(task.errors.clone().expect("errors recorded")).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["line"], 2);
    assert_eq!(errors[0]["column"], "2019_tonnage");

    assert_eq!(pool.count_sourcing_records().await.unwrap(), 2);
    assert_eq!(pool.count_indicator_records().await.unwrap(), 2);

    // Progress events were broadcast, ending with FINISHED at 100%
    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push((event.kind, event.progress));
    }
    assert!(!kinds.is_empty());
    let (last_kind, last_progress) = kinds.last().unwrap();
    assert_eq!(last_kind.as_str(), "FINISHED");
    assert_eq!(*last_progress, 100.0);

    // The worker deleted the staged upload
    let staged = files.upload_path(task_id);
    assert!(!staged.exists());
}
