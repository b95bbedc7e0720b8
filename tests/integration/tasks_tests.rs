//! Integration tests for the task endpoints and transition guards.

use actix_web::{test, web, App};
use serde_json::Value;
use uuid::Uuid;

use sourcing_import_lib::api;
use sourcing_import_lib::db::DbPool;
use sourcing_import_lib::models::{ImportTaskError, TaskStatus};

use crate::common;

async fn task_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .service(web::scope("/api/v1").configure(api::configure_task_routes)),
    )
    .await
}

#[actix_web::test]
async fn test_get_task_not_found() {
    let pool = common::test_pool().await;
    let app = task_app(&pool).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_list_tasks_with_status_filter() {
    let pool = common::test_pool().await;
    let app = task_app(&pool).await;

    let queued = Uuid::new_v4();
    let failed = Uuid::new_v4();
    pool.insert_task(queued, "a.xlsx", "/tmp/a.xlsx").await.unwrap();
    pool.insert_task(failed, "b.xlsx", "/tmp/b.xlsx").await.unwrap();
    pool.fail_task(failed, "boom").await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks?status=failed")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["tasks"][0]["id"], failed.to_string());
    assert_eq!(body["tasks"][0]["status"], "failed");
    assert_eq!(body["tasks"][0]["error_message"], "boom");

    // Unknown status values are rejected, not silently ignored
    let req = test::TestRequest::get()
        .uri("/api/v1/tasks?status=bogus")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_delete_task() {
    let pool = common::test_pool().await;
    let app = task_app(&pool).await;

    let task_id = Uuid::new_v4();
    pool.insert_task(task_id, "a.xlsx", "/tmp/a.xlsx").await.unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_error_report_csv() {
    let pool = common::test_pool().await;
    let app = task_app(&pool).await;

    let task_id = Uuid::new_v4();
    pool.insert_task(task_id, "a.xlsx", "/tmp/a.xlsx").await.unwrap();
    pool.set_task_errors(
        task_id,
        &[ImportTaskError {
            line: 2,
            column: "2019_tonnage".to_string(),
            sheet: "sourcingData".to_string(),
            error: "tonnage must be a number".to_string(),
        }],
    )
    .await
    .unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}/errors/report", task_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/csv"
    );

    let body = test::read_body(resp).await;
    let csv = String::from_utf8(body.to_vec()).unwrap();
    assert!(csv.starts_with("line,column,error"));
    assert!(csv.contains("2,2019_tonnage,tonnage must be a number"));
}

#[actix_web::test]
async fn test_error_report_unknown_task_is_404() {
    let pool = common::test_pool().await;
    let app = task_app(&pool).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}/errors/report", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_transitions_are_monotonic() {
    let pool = common::test_pool().await;

    let task_id = Uuid::new_v4();
    pool.insert_task(task_id, "a.xlsx", "/tmp/a.xlsx").await.unwrap();

    // queued -> processing succeeds exactly once
    assert!(
        pool.transition_task(task_id, TaskStatus::Queued, TaskStatus::Processing)
            .await
            .unwrap()
    );
    assert!(
        !pool
            .transition_task(task_id, TaskStatus::Queued, TaskStatus::Processing)
            .await
            .unwrap()
    );

    // processing -> completed; terminal states cannot be failed afterwards
    assert!(
        pool.transition_task(task_id, TaskStatus::Processing, TaskStatus::Completed)
            .await
            .unwrap()
    );
    assert!(!pool.fail_task(task_id, "too late").await.unwrap());

    let task = pool.get_task(task_id).await.unwrap().unwrap();
    assert_eq!(TaskStatus::parse(&task.status), Some(TaskStatus::Completed));
    assert!(task.error_message.is_none());
}
