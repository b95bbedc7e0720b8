//! Domain models and API DTOs.

pub mod progress;
pub mod sourcing;
pub mod task;

pub use progress::{ImportProgressKind, ImportProgressUpdateEvent};
pub use sourcing::{
    LocationType, SourcingData, SourcingRecordListResponse, SourcingRecordResponse,
    SourcingRecordYear, UpdateSourcingRecordRequest,
};
pub use task::{
    ImportTaskError, ListTasksQuery, ListSourcingRecordsQuery, TaskListResponse, TaskResponse,
    TaskStatus, UploadResponse, clamp_pagination,
};
