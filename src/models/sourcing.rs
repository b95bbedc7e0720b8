//! Sourcing data domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of sourcing location declared in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LocationType {
    Unknown,
    AggregationPoint,
    PointOfProduction,
    CountryOfProduction,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::AggregationPoint => "aggregation-point",
            Self::PointOfProduction => "point-of-production",
            Self::CountryOfProduction => "country-of-production",
        }
    }

    /// Parse a location type from raw cell text.
    ///
    /// The spreadsheet template writes types with spaces ("aggregation
    /// point"); whitespace runs are normalized to single dashes before
    /// matching.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        match normalized.as_str() {
            "unknown" => Some(Self::Unknown),
            "aggregation-point" => Some(Self::AggregationPoint),
            "point-of-production" => Some(Self::PointOfProduction),
            "country-of-production" => Some(Self::CountryOfProduction),
            _ => None,
        }
    }

    /// Whether this location type is keyed by coordinates rather than by a
    /// country/address reference.
    pub fn requires_coordinates(&self) -> bool {
        matches!(self, Self::AggregationPoint | Self::PointOfProduction)
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One year's tonnage for a sourcing location, expanded from a
/// `<year>_tonnage` spreadsheet column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingRecordYear {
    pub year: i32,
    pub tonnage: f64,
}

/// A validated sourcing location with its per-year records, produced by the
/// row normalizer from one `for upload` sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingData {
    pub material_hs_code: String,
    pub business_unit_path: Option<String>,
    pub t1_supplier_name: Option<String>,
    pub producer_name: Option<String>,
    pub location_type: LocationType,
    pub location_country_input: Option<String>,
    pub location_address_input: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Set by the geocoding stage when a location could not be resolved.
    pub location_warning: Option<String>,
    pub sourcing_records: Vec<SourcingRecordYear>,
}

/// Sourcing record API representation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SourcingRecordResponse {
    pub id: Uuid,
    pub sourcing_location_id: Uuid,
    pub year: i32,
    pub tonnage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paginated sourcing record list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SourcingRecordListResponse {
    pub records: Vec<SourcingRecordResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Explicit update request for a persisted sourcing record.
///
/// Records are immutable once written except through this endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSourcingRecordRequest {
    pub year: Option<i32>,
    pub tonnage: Option<f64>,
}
