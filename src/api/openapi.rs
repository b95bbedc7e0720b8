//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sourcing Data Import Server",
        version = "0.3.0",
        description = "API server for asynchronous import of supply-chain sourcing data from xlsx workbooks"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Import intake
        api::imports::upload_sourcing_data,
        // Task endpoints
        api::tasks::list_tasks,
        api::tasks::get_task,
        api::tasks::delete_task,
        api::tasks::get_task_error_report,
        // Sourcing record endpoints
        api::sourcing_records::list_sourcing_records,
        api::sourcing_records::get_sourcing_record,
        api::sourcing_records::update_sourcing_record,
        api::sourcing_records::delete_sourcing_record,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Tasks
            models::TaskStatus,
            models::ImportTaskError,
            models::UploadResponse,
            models::TaskResponse,
            models::TaskListResponse,
            // Progress events
            models::ImportProgressKind,
            models::ImportProgressUpdateEvent,
            // Sourcing records
            models::SourcingRecordResponse,
            models::SourcingRecordListResponse,
            models::UpdateSourcingRecordRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Import", description = "Sourcing data file intake"),
        (name = "Tasks", description = "Import task tracking and error reports"),
        (name = "Sourcing Records", description = "Persisted sourcing record management")
    )
)]
pub struct ApiDoc;
