//! Import task domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Import task status enum.
///
/// Transitions are monotonic: queued -> processing -> {completed | failed}.
/// A task never re-enters processing after reaching a terminal state; the
/// database layer enforces this with conditional updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task created, job enqueued, waiting for the worker.
    Queued,
    /// Worker dequeued the job and is running the pipeline.
    Processing,
    /// Pipeline finished and records were persisted.
    Completed,
    /// Pipeline aborted (parse or persistence error) or enqueue failed.
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether the status is terminal (completed or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row-level validation error accumulated during import.
///
/// Never persisted beyond the owning task; serialized into the downloadable
/// CSV report. `line` is the 1-based data-row number within the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImportTaskError {
    pub line: u32,
    pub column: String,
    pub sheet: String,
    pub error: String,
}

/// Response returned by the upload intake endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub task_id: Uuid,
    pub status: TaskStatus,
    pub file_name: String,
    pub message: String,
}

/// Single task detail response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub status: TaskStatus,
    pub file_name: String,
    /// Row-level validation errors (empty unless validation flagged rows).
    pub errors: Vec<ImportTaskError>,
    /// Non-fatal pipeline warnings (e.g. locations that could not be geocoded).
    pub logs: Vec<String>,
    /// Fatal pipeline error when status is failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated task list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for listing tasks.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListTasksQuery {
    /// Filter by status (queued, processing, completed, failed).
    pub status: Option<String>,
    /// Page size (default 50, max 200).
    pub limit: Option<u64>,
    /// Page offset (default 0).
    pub offset: Option<u64>,
}

/// Query parameters for listing sourcing records.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListSourcingRecordsQuery {
    /// Filter by year.
    pub year: Option<i32>,
    /// Page size (default 50, max 200).
    pub limit: Option<u64>,
    /// Page offset (default 0).
    pub offset: Option<u64>,
}

/// Clamp list pagination to sane bounds.
pub fn clamp_pagination(limit: Option<u64>, offset: Option<u64>) -> (u64, u64) {
    (limit.unwrap_or(50).min(200), offset.unwrap_or(0))
}
