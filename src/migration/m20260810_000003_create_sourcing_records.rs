//! Create sourcing_records table.

use sea_orm_migration::prelude::*;

use super::m20260810_000002_create_sourcing_locations::SourcingLocation;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SourcingRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SourcingRecord::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SourcingRecord::SourcingLocationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SourcingRecord::Year).integer().not_null())
                    .col(ColumnDef::new(SourcingRecord::Tonnage).double().not_null())
                    .col(
                        ColumnDef::new(SourcingRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SourcingRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sourcing_records_location")
                            .from(SourcingRecord::Table, SourcingRecord::SourcingLocationId)
                            .to(SourcingLocation::Table, SourcingLocation::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sourcing_records_location_year")
                    .table(SourcingRecord::Table)
                    .col(SourcingRecord::SourcingLocationId)
                    .col(SourcingRecord::Year)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SourcingRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SourcingRecord {
    #[sea_orm(iden = "sourcing_records")]
    Table,
    Id,
    SourcingLocationId,
    Year,
    Tonnage,
    CreatedAt,
    UpdatedAt,
}
