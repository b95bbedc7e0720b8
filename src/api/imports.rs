//! Sourcing data upload intake.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{TaskStatus, UploadResponse};
use crate::services::{FileService, ImportJob, ImportQueue};

/// Accept an xlsx upload and queue it for asynchronous import.
///
/// The file is streamed to the staging directory and a task record is
/// created before the request returns; parsing and validation happen in the
/// background worker. Clients follow progress over the websocket or by
/// polling the task endpoint.
#[utoipa::path(
    post,
    path = "/api/v1/import/sourcing-data",
    tag = "Import",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Import task queued", body = UploadResponse),
        (status = 400, description = "No file or unsupported file type", body = crate::error::ErrorResponse),
        (status = 413, description = "File exceeds upload limit", body = crate::error::ErrorResponse),
        (status = 503, description = "Import queue unavailable", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_sourcing_data(
    pool: web::Data<DbPool>,
    files: web::Data<FileService>,
    queue: web::Data<ImportQueue>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let task_id = Uuid::new_v4();
    let dest_path = files.upload_path(task_id);

    let file_name = match receive_file(&mut payload, &dest_path, config.max_upload_size).await {
        Ok(Some(name)) => name,
        Ok(None) => {
            return Err(AppError::InvalidInput(
                "Request must include an xlsx file field".to_string(),
            ));
        }
        Err(e) => {
            // Drop whatever was partially written before failing.
            if let Err(cleanup_err) = files.delete(&dest_path).await
                && !matches!(cleanup_err, AppError::NotFound(_))
            {
                warn!("Failed to remove partial upload: {}", cleanup_err);
            }
            return Err(e);
        }
    };

    let task = pool
        .insert_task(task_id, &file_name, &dest_path.to_string_lossy())
        .await?;

    if let Err(e) = queue.enqueue(ImportJob {
        task_id,
        file_path: dest_path.clone(),
    }) {
        // No worker will pick this up, so remove the staged file and leave
        // the task behind as a failed record of the intake.
        if let Err(cleanup_err) = files.delete(&dest_path).await {
            warn!("Failed to remove staged upload: {}", cleanup_err);
        }
        if let Err(fail_err) = pool.fail_task(task_id, "import queue unavailable").await {
            warn!("Failed to mark task as failed: {}", fail_err);
        }
        return Err(e);
    }

    info!(
        task_id = %task_id,
        file_name = %file_name,
        "Sourcing data upload queued"
    );

    Ok(HttpResponse::Created().json(UploadResponse {
        task_id: task.id,
        status: TaskStatus::Queued,
        file_name,
        message: "File queued for import".to_string(),
    }))
}

/// Stream the first file field to `dest_path`.
///
/// Returns the original file name, or `None` when the request carried no
/// file field at all. Enforces the extension and the size limit while
/// streaming, so an oversized body never lands fully on disk.
async fn receive_file(
    payload: &mut Multipart,
    dest_path: &std::path::Path,
    max_upload_size: usize,
) -> AppResult<Option<String>> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        let Some(file_name) = disposition.get_filename().map(str::to_string) else {
            // Non-file fields are ignored.
            continue;
        };

        if !file_name.to_lowercase().ends_with(".xlsx") {
            drain_field(&mut field).await;
            return Err(AppError::InvalidInput(format!(
                "Unsupported file type for '{}': only .xlsx files are accepted",
                file_name
            )));
        }

        let mut dest = tokio::fs::File::create(dest_path)
            .await
            .map_err(|e| AppError::FileSystem(format!("Failed to create upload file: {}", e)))?;

        let mut size: usize = 0;
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            size += chunk.len();
            if size > max_upload_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File '{}' exceeds the upload limit of {} bytes",
                    file_name, max_upload_size
                )));
            }
            dest.write_all(&chunk)
                .await
                .map_err(|e| AppError::FileSystem(format!("Failed to write upload: {}", e)))?;
        }
        dest.flush()
            .await
            .map_err(|e| AppError::FileSystem(format!("Failed to flush upload: {}", e)))?;

        if size == 0 {
            return Err(AppError::InvalidInput(format!(
                "Uploaded file '{}' is empty",
                file_name
            )));
        }

        info!("Received {} ({} bytes)", file_name, size);
        return Ok(Some(file_name));
    }

    Ok(None)
}

/// Drain a multipart field without saving.
async fn drain_field(field: &mut actix_multipart::Field) {
    while let Some(chunk) = field.next().await {
        let _ = chunk;
    }
}

/// Configure import routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/import/sourcing-data").route(web::post().to(upload_sourcing_data)),
    );
}
