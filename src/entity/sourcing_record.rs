//! Sourcing record entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sourcing_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sourcing_location_id: Uuid,
    pub year: i32,
    #[sea_orm(column_type = "Double")]
    pub tonnage: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sourcing_location::Entity",
        from = "Column::SourcingLocationId",
        to = "super::sourcing_location::Column::Id",
        on_delete = "Cascade"
    )]
    SourcingLocation,
    #[sea_orm(has_many = "super::indicator_record::Entity")]
    IndicatorRecords,
}

impl Related<super::sourcing_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SourcingLocation.def()
    }
}

impl Related<super::indicator_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IndicatorRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
