//! SeaORM entity definitions for the PostgreSQL database.

pub mod import_task;
pub mod indicator_record;
pub mod sourcing_location;
pub mod sourcing_record;
