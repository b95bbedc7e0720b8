//! Database queries for sourcing locations, records and indicator records.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::indicator_record::{self, Entity as IndicatorRecord};
use crate::entity::sourcing_location::{self, Entity as SourcingLocation};
use crate::entity::sourcing_record::{self, Entity as SourcingRecord};
use crate::error::{AppError, AppResult};
use crate::models::{SourcingData, UpdateSourcingRecordRequest};

use super::DbPool;

impl DbPool {
    /// Replace all persisted sourcing data with a freshly validated batch.
    ///
    /// Runs in a single transaction: prior locations, records and derived
    /// indicator records are wiped, then the batch is bulk-inserted. Partial
    /// failures roll back, so an import is all-or-nothing and re-importing
    /// the same file yields the same row counts.
    pub async fn replace_sourcing_data(&self, data: &[SourcingData]) -> AppResult<(usize, usize)> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open transaction: {}", e)))?;

        IndicatorRecord::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear indicator records: {}", e)))?;
        SourcingRecord::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear sourcing records: {}", e)))?;
        SourcingLocation::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear sourcing locations: {}", e)))?;

        let now = Utc::now();
        let mut locations = Vec::with_capacity(data.len());
        let mut records = Vec::new();

        for entry in data {
            let location_id = Uuid::new_v4();
            locations.push(sourcing_location::ActiveModel {
                id: Set(location_id),
                material_hs_code: Set(entry.material_hs_code.clone()),
                business_unit_path: Set(entry.business_unit_path.clone()),
                t1_supplier_name: Set(entry.t1_supplier_name.clone()),
                producer_name: Set(entry.producer_name.clone()),
                location_type: Set(entry.location_type.as_str().to_string()),
                country: Set(entry.location_country_input.clone()),
                address: Set(entry.location_address_input.clone()),
                latitude: Set(entry.latitude),
                longitude: Set(entry.longitude),
                location_warning: Set(entry.location_warning.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            });

            for record in &entry.sourcing_records {
                records.push(sourcing_record::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    sourcing_location_id: Set(location_id),
                    year: Set(record.year),
                    tonnage: Set(record.tonnage),
                    created_at: Set(now),
                    updated_at: Set(now),
                });
            }
        }

        let location_count = locations.len();
        let record_count = records.len();

        if !locations.is_empty() {
            SourcingLocation::insert_many(locations)
                .exec(&txn)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to insert sourcing locations: {}", e))
                })?;
        }
        if !records.is_empty() {
            SourcingRecord::insert_many(records)
                .exec(&txn)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to insert sourcing records: {}", e))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit import batch: {}", e)))?;

        Ok((location_count, record_count))
    }

    /// Recompute indicator records from the persisted sourcing records.
    ///
    /// Host-side stand-in for the impact stored procedures: one indicator
    /// record per sourcing record with a unit coefficient. Returns the number
    /// of records written.
    pub async fn recalculate_indicator_records(&self) -> AppResult<usize> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open transaction: {}", e)))?;

        IndicatorRecord::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear indicator records: {}", e)))?;

        let sourcing_records = SourcingRecord::find()
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to load sourcing records: {}", e)))?;

        let now = Utc::now();
        let indicators: Vec<indicator_record::ActiveModel> = sourcing_records
            .iter()
            .map(|record| indicator_record::ActiveModel {
                id: Set(Uuid::new_v4()),
                sourcing_record_id: Set(record.id),
                year: Set(record.year),
                value: Set(record.tonnage),
                created_at: Set(now),
            })
            .collect();

        let count = indicators.len();
        if !indicators.is_empty() {
            IndicatorRecord::insert_many(indicators)
                .exec(&txn)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to insert indicator records: {}", e))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit indicator records: {}", e)))?;

        Ok(count)
    }

    /// List sourcing records, optionally filtered by year.
    pub async fn list_sourcing_records(
        &self,
        year: Option<i32>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<sourcing_record::Model>, u64)> {
        let mut query = SourcingRecord::find();
        if let Some(year) = year {
            query = query.filter(sourcing_record::Column::Year.eq(year));
        }

        let total = query
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count sourcing records: {}", e)))?;

        let records = query
            .order_by_asc(sourcing_record::Column::Year)
            .limit(limit)
            .offset(offset)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list sourcing records: {}", e)))?;

        Ok((records, total))
    }

    /// Get a sourcing record by ID.
    pub async fn get_sourcing_record(&self, id: Uuid) -> AppResult<Option<sourcing_record::Model>> {
        let result = SourcingRecord::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get sourcing record: {}", e)))?;

        Ok(result)
    }

    /// Update a sourcing record through the explicit update endpoint.
    pub async fn update_sourcing_record(
        &self,
        id: Uuid,
        update: &UpdateSourcingRecordRequest,
    ) -> AppResult<sourcing_record::Model> {
        let record = self
            .get_sourcing_record(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sourcing record".to_string()))?;

        let mut active: sourcing_record::ActiveModel = record.into();
        if let Some(year) = update.year {
            active.year = Set(year);
        }
        if let Some(tonnage) = update.tonnage {
            if !tonnage.is_finite() || tonnage < 0.0 {
                return Err(AppError::InvalidInput(
                    "tonnage must be a non-negative number".to_string(),
                ));
            }
            active.tonnage = Set(tonnage);
        }
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update sourcing record: {}", e)))?;

        Ok(updated)
    }

    /// Delete a sourcing record. Returns false when no record matched.
    pub async fn delete_sourcing_record(&self, id: Uuid) -> AppResult<bool> {
        let result = SourcingRecord::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete sourcing record: {}", e)))?;

        Ok(result.rows_affected == 1)
    }

    /// Count all persisted sourcing records.
    pub async fn count_sourcing_records(&self) -> AppResult<u64> {
        let count = SourcingRecord::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count sourcing records: {}", e)))?;

        Ok(count)
    }

    /// Count all persisted indicator records.
    pub async fn count_indicator_records(&self) -> AppResult<u64> {
        let count = IndicatorRecord::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count indicator records: {}", e)))?;

        Ok(count)
    }
}
