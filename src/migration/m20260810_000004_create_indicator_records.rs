//! Create indicator_records table.
//!
//! Derived impact values, recomputed from sourcing records on every import.

use sea_orm_migration::prelude::*;

use super::m20260810_000003_create_sourcing_records::SourcingRecord;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IndicatorRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IndicatorRecord::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(IndicatorRecord::SourcingRecordId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IndicatorRecord::Year).integer().not_null())
                    .col(ColumnDef::new(IndicatorRecord::Value).double().not_null())
                    .col(
                        ColumnDef::new(IndicatorRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_indicator_records_sourcing_record")
                            .from(IndicatorRecord::Table, IndicatorRecord::SourcingRecordId)
                            .to(SourcingRecord::Table, SourcingRecord::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_indicator_records_year")
                    .table(IndicatorRecord::Table)
                    .col(IndicatorRecord::Year)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IndicatorRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IndicatorRecord {
    #[sea_orm(iden = "indicator_records")]
    Table,
    Id,
    SourcingRecordId,
    Year,
    Value,
    CreatedAt,
}
