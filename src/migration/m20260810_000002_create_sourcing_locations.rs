//! Create sourcing_locations table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SourcingLocation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SourcingLocation::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SourcingLocation::MaterialHsCode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SourcingLocation::BusinessUnitPath).string())
                    .col(ColumnDef::new(SourcingLocation::T1SupplierName).string())
                    .col(ColumnDef::new(SourcingLocation::ProducerName).string())
                    .col(
                        ColumnDef::new(SourcingLocation::LocationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SourcingLocation::Country).string())
                    .col(ColumnDef::new(SourcingLocation::Address).string())
                    .col(ColumnDef::new(SourcingLocation::Latitude).double())
                    .col(ColumnDef::new(SourcingLocation::Longitude).double())
                    .col(ColumnDef::new(SourcingLocation::LocationWarning).text())
                    .col(
                        ColumnDef::new(SourcingLocation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SourcingLocation::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sourcing_locations_material")
                    .table(SourcingLocation::Table)
                    .col(SourcingLocation::MaterialHsCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SourcingLocation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SourcingLocation {
    #[sea_orm(iden = "sourcing_locations")]
    Table,
    Id,
    MaterialHsCode,
    BusinessUnitPath,
    T1SupplierName,
    ProducerName,
    LocationType,
    Country,
    Address,
    Latitude,
    Longitude,
    LocationWarning,
    CreatedAt,
    UpdatedAt,
}
