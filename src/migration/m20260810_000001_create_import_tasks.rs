//! Create import_tasks table.
//!
//! One row per queued spreadsheet import; mutated by the worker as the
//! pipeline advances, terminal on completed or failed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImportTask::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImportTask::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ImportTask::Status)
                            .string()
                            .not_null()
                            .default("queued"),
                    )
                    .col(ColumnDef::new(ImportTask::FileName).string().not_null())
                    .col(ColumnDef::new(ImportTask::FilePath).string().not_null())
                    .col(ColumnDef::new(ImportTask::Errors).json())
                    .col(ColumnDef::new(ImportTask::Logs).json())
                    .col(ColumnDef::new(ImportTask::ErrorMessage).text())
                    .col(
                        ColumnDef::new(ImportTask::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ImportTask::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_import_tasks_status")
                    .table(ImportTask::Table)
                    .col(ImportTask::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_import_tasks_created_at")
                    .table(ImportTask::Table)
                    .col(ImportTask::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImportTask::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ImportTask {
    #[sea_orm(iden = "import_tasks")]
    Table,
    Id,
    Status,
    FileName,
    FilePath,
    Errors,
    Logs,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}
