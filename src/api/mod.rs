//! API endpoint modules.

pub mod health;
pub mod imports;
pub mod openapi;
pub mod sourcing_records;
pub mod tasks;
pub mod websocket;

pub use health::configure_health_routes;
pub use imports::configure_routes as configure_import_routes;
pub use openapi::ApiDoc;
pub use sourcing_records::configure_routes as configure_sourcing_record_routes;
pub use tasks::configure_routes as configure_task_routes;
pub use websocket::configure_routes as configure_websocket_routes;
