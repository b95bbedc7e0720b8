//! Business logic services.

pub mod cleanup;
pub mod event_broadcaster;
pub mod file_service;
pub mod geocoding;
pub mod import;
pub mod progress;
pub mod queue;
pub mod validation;
pub mod xlsx_parser;

pub use cleanup::{start_cleanup_task, CleanupConfig};
pub use event_broadcaster::EventBroadcaster;
pub use file_service::FileService;
pub use queue::{start_import_worker, ImportJob, ImportQueue, ImportWorker};
