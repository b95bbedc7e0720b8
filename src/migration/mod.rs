//! SeaORM database migrations.
//!
//! Written against the schema-builder API so the same migrations run on
//! PostgreSQL in production and SQLite in the test suite.

pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_import_tasks;
mod m20260810_000002_create_sourcing_locations;
mod m20260810_000003_create_sourcing_records;
mod m20260810_000004_create_indicator_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_import_tasks::Migration),
            Box::new(m20260810_000002_create_sourcing_locations::Migration),
            Box::new(m20260810_000003_create_sourcing_records::Migration),
            Box::new(m20260810_000004_create_indicator_records::Migration),
        ]
    }
}
