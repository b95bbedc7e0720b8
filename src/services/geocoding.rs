//! Geocoding stage seam.
//!
//! The original pipeline resolves each sourcing location to an admin/geo
//! region through an external geocoding backend. That integration point is a
//! trait here; the shipped implementation works purely from the coordinates
//! already present in the spreadsheet and flags everything it cannot
//! resolve with a location warning.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::SourcingData;

/// Resolves a sourcing location's geographic reference.
///
/// Implementations mutate the record in place and may set
/// `location_warning` instead of failing when a single location cannot be
/// resolved; warnings end up in the task log, not in the error report.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, record: &mut SourcingData) -> AppResult<()>;
}

/// Coordinate-only geocoder.
///
/// Locations that carry explicit coordinates are taken as resolved. Country
/// and unknown-type locations without coordinates get a warning, since
/// resolving them needs an external backend this deployment does not have.
pub struct CoordinateGeocoder;

#[async_trait]
impl Geocoder for CoordinateGeocoder {
    async fn geocode(&self, record: &mut SourcingData) -> AppResult<()> {
        if record.latitude.is_some() && record.longitude.is_some() {
            return Ok(());
        }

        let reference = record
            .location_country_input
            .as_deref()
            .unwrap_or("unknown location");
        record.location_warning = Some(format!(
            "Location '{}' for material {} could not be geocoded: no coordinates and no geocoding backend configured",
            reference, record.material_hs_code
        ));
        Ok(())
    }
}
