//! Sourcing location entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sourcing_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// HS code of the sourced material
    pub material_hs_code: String,
    pub business_unit_path: Option<String>,
    pub t1_supplier_name: Option<String>,
    pub producer_name: Option<String>,
    /// Location type: unknown, aggregation-point, point-of-production,
    /// country-of-production
    pub location_type: String,
    pub country: Option<String>,
    pub address: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    /// Warning recorded when the geocoding stage could not resolve this row
    pub location_warning: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sourcing_record::Entity")]
    SourcingRecords,
}

impl Related<super::sourcing_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SourcingRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
