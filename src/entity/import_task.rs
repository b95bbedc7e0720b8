//! Import task entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "import_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Task status: queued, processing, completed, failed
    pub status: String,
    /// Original filename as uploaded by the client
    pub file_name: String,
    /// On-disk path of the transient spreadsheet copy
    pub file_path: String,
    /// Row-level validation errors as a JSON array of ImportTaskError
    #[sea_orm(column_type = "Json", nullable)]
    pub errors: Option<JsonValue>,
    /// Non-fatal pipeline warnings (geocoding etc.) as a JSON string array
    #[sea_orm(column_type = "Json", nullable)]
    pub logs: Option<JsonValue>,
    /// Fatal pipeline error when status is 'failed'
    pub error_message: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
