//! Indicator record entity for SeaORM.
//!
//! Impact values derived from sourcing records during the CALCULATING_IMPACT
//! stage. Recomputed wholesale on every import.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "indicator_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sourcing_record_id: Uuid,
    pub year: i32,
    #[sea_orm(column_type = "Double")]
    pub value: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sourcing_record::Entity",
        from = "Column::SourcingRecordId",
        to = "super::sourcing_record::Column::Id",
        on_delete = "Cascade"
    )]
    SourcingRecord,
}

impl Related<super::sourcing_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SourcingRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
