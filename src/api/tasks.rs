//! Import task API handlers.

use actix_web::{HttpResponse, web};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entity::import_task;
use crate::error::{AppError, AppResult};
use crate::models::{
    ImportTaskError, ListTasksQuery, TaskListResponse, TaskResponse, TaskStatus, clamp_pagination,
};

/// Convert a task row into its API shape, decoding the JSON columns.
fn task_to_response(model: import_task::Model) -> TaskResponse {
    let errors: Vec<ImportTaskError> = model
        .errors
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    let logs: Vec<String> = model
        .logs
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let status = TaskStatus::parse(&model.status).unwrap_or_else(|| {
        warn!(
            task_id = %model.id,
            status = %model.status,
            "Task row carries an unknown status, reporting it as queued"
        );
        TaskStatus::Queued
    });

    TaskResponse {
        id: model.id,
        status,
        file_name: model.file_name,
        errors,
        logs,
        error_message: model.error_message,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// List import tasks, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "List of import tasks", body = TaskListResponse),
        (status = 400, description = "Invalid status filter", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_tasks(
    pool: web::Data<DbPool>,
    query: web::Query<ListTasksQuery>,
) -> AppResult<HttpResponse> {
    let status = match &query.status {
        Some(raw) => Some(TaskStatus::parse(raw).ok_or_else(|| {
            AppError::InvalidInput(format!("Unknown task status: {}", raw))
        })?),
        None => None,
    };
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let (tasks, total) = pool.list_tasks(status, limit, offset).await?;

    Ok(HttpResponse::Ok().json(TaskListResponse {
        tasks: tasks.into_iter().map(task_to_response).collect(),
        total,
        limit,
        offset,
    }))
}

/// Get a single import task with its row errors and logs.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}",
    tag = "Tasks",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task detail", body = TaskResponse),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_task(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let task_id = path.into_inner();
    let task = pool
        .get_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {}", task_id)))?;

    Ok(HttpResponse::Ok().json(task_to_response(task)))
}

/// Delete an import task record.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{task_id}",
    tag = "Tasks",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_task(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let task_id = path.into_inner();
    if !pool.delete_task(task_id).await? {
        return Err(AppError::NotFound(format!("Task {}", task_id)));
    }

    info!(task_id = %task_id, "Task deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Download the validation errors of a task as a CSV report.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/errors/report",
    tag = "Tasks",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "CSV error report", content_type = "text/csv"),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_task_error_report(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let task_id = path.into_inner();
    let task = pool
        .get_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {}", task_id)))?;

    let errors: Vec<ImportTaskError> = task
        .errors
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["line", "column", "error"])
        .map_err(|e| AppError::Parse(format!("Failed to build CSV report: {}", e)))?;
    for err in &errors {
        writer
            .write_record([err.line.to_string().as_str(), &err.column, &err.error])
            .map_err(|e| AppError::Parse(format!("Failed to build CSV report: {}", e)))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| AppError::Parse(format!("Failed to build CSV report: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"import-errors-{}.csv\"", task_id),
        ))
        .body(body))
}

/// Configure task routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/tasks").route(web::get().to(list_tasks)))
        .service(
            web::resource("/tasks/{task_id}")
                .route(web::get().to(get_task))
                .route(web::delete().to(delete_task)),
        )
        .service(
            web::resource("/tasks/{task_id}/errors/report")
                .route(web::get().to(get_task_error_report)),
        );
}
