//! Row validator/normalizer for the "for upload" sheet.
//!
//! Converts raw spreadsheet rows into typed sourcing data. Validation is
//! row-independent: a malformed row is rejected and reported, but never
//! aborts processing of the remaining rows. Numeric fields are coerced from
//! strings before range checks.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::models::{ImportTaskError, LocationType, SourcingData, SourcingRecordYear};
use crate::services::xlsx_parser::{row_get, SheetRow};

const COLUMN_MATERIAL_HS_CODE: &str = "material.hsCode";
const COLUMN_BUSINESS_UNIT_PATH: &str = "business_unit.path";
const COLUMN_T1_SUPPLIER: &str = "t1_supplier.name";
const COLUMN_PRODUCER: &str = "producer.name";
const COLUMN_LOCATION_TYPE: &str = "location_type";
const COLUMN_COUNTRY: &str = "location_country_input";
const COLUMN_ADDRESS: &str = "location_address_input";
const COLUMN_LATITUDE: &str = "location_latitude_input";
const COLUMN_LONGITUDE: &str = "location_longitude_input";

const SHEET_NAME: &str = "sourcingData";

/// Columns like `2018_tonnage` carry one year's tonnage each.
fn year_column(header: &str) -> Option<i32> {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    let re = YEAR_RE.get_or_init(|| Regex::new(r"^(\d{4})_").expect("valid year regex"));
    re.captures(header)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Result of validating one sheet of raw sourcing rows.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    /// Typed records for rows that passed all checks.
    pub records: Vec<SourcingData>,
    /// One entry per failed check; rows with any error are rejected whole.
    pub errors: Vec<ImportTaskError>,
}

/// Validate and normalize raw `for upload` rows.
///
/// Rows with an empty material code are treated as spreadsheet padding and
/// skipped without error (matching the template, which pads the sheet with
/// blank rows). Line numbers in errors are 1-based data-row numbers.
pub fn validate_sourcing_rows(rows: &[SheetRow]) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;

        let Some(material_hs_code) = string_cell(row, COLUMN_MATERIAL_HS_CODE) else {
            // Blank padding row
            continue;
        };

        let mut row_errors: Vec<ImportTaskError> = Vec::new();

        let location_type = match string_cell(row, COLUMN_LOCATION_TYPE) {
            Some(raw) => match LocationType::parse(&raw) {
                Some(parsed) => parsed,
                None => {
                    row_errors.push(error(
                        line,
                        COLUMN_LOCATION_TYPE,
                        format!("'{}' is not a recognized location type", raw),
                    ));
                    LocationType::Unknown
                }
            },
            None => {
                row_errors.push(error(
                    line,
                    COLUMN_LOCATION_TYPE,
                    "location_type is required".to_string(),
                ));
                LocationType::Unknown
            }
        };

        let latitude = numeric_cell(row, COLUMN_LATITUDE, &mut row_errors, line);
        let longitude = numeric_cell(row, COLUMN_LONGITUDE, &mut row_errors, line);

        if let Some(lat) = latitude
            && !(-90.0..=90.0).contains(&lat)
        {
            row_errors.push(error(
                line,
                COLUMN_LATITUDE,
                "latitude must be between -90 and 90".to_string(),
            ));
        }
        if let Some(lon) = longitude
            && !(-180.0..=180.0).contains(&lon)
        {
            row_errors.push(error(
                line,
                COLUMN_LONGITUDE,
                "longitude must be between -180 and 180".to_string(),
            ));
        }

        let country = string_cell(row, COLUMN_COUNTRY);

        if location_type.requires_coordinates() {
            if latitude.is_none() || longitude.is_none() {
                row_errors.push(error(
                    line,
                    COLUMN_LATITUDE,
                    format!(
                        "location type '{}' requires latitude and longitude",
                        location_type
                    ),
                ));
            }
        } else if country.is_none() {
            row_errors.push(error(
                line,
                COLUMN_COUNTRY,
                format!("location type '{}' requires a country", location_type),
            ));
        }

        // Expand year columns into per-year sourcing records
        let mut sourcing_records = Vec::new();
        for (header, value) in row {
            let Some(year) = year_column(header) else {
                continue;
            };
            if value.is_null() {
                // Sparse years are allowed
                continue;
            }
            match coerce_f64(value) {
                Some(tonnage) if tonnage >= 0.0 => {
                    sourcing_records.push(SourcingRecordYear { year, tonnage });
                }
                Some(_) => {
                    row_errors.push(error(
                        line,
                        header,
                        "tonnage must be greater than or equal to 0".to_string(),
                    ));
                }
                None => {
                    row_errors.push(error(
                        line,
                        header,
                        "tonnage must be a number".to_string(),
                    ));
                }
            }
        }

        if row_errors.is_empty() {
            outcome.records.push(SourcingData {
                material_hs_code,
                business_unit_path: string_cell(row, COLUMN_BUSINESS_UNIT_PATH),
                t1_supplier_name: string_cell(row, COLUMN_T1_SUPPLIER),
                producer_name: string_cell(row, COLUMN_PRODUCER),
                location_type,
                location_country_input: country,
                location_address_input: string_cell(row, COLUMN_ADDRESS),
                latitude,
                longitude,
                location_warning: None,
                sourcing_records,
            });
        } else {
            outcome.errors.append(&mut row_errors);
        }
    }

    outcome
}

fn error(line: u32, column: &str, message: String) -> ImportTaskError {
    ImportTaskError {
        line,
        column: column.to_string(),
        sheet: SHEET_NAME.to_string(),
        error: message,
    }
}

/// Coerce a cell to a trimmed non-empty string.
fn string_cell(row: &SheetRow, column: &str) -> Option<String> {
    match row_get(row, column)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(format_number(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render numeric cells without a trailing ".0" (HS codes arrive as floats).
fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Coerce an optional numeric cell, recording an error on malformed input.
fn numeric_cell(
    row: &SheetRow,
    column: &str,
    row_errors: &mut Vec<ImportTaskError>,
    line: u32,
) -> Option<f64> {
    let value = row_get(row, column)?;
    if value.is_null() {
        return None;
    }
    match coerce_f64(value) {
        Some(parsed) => Some(parsed),
        None => {
            row_errors.push(error(
                line,
                column,
                format!("{} must be a number", column),
            ));
            None
        }
    }
}

/// String-to-number coercion happens before any range check.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty())
                .then(|| trimmed.parse::<f64>().ok())
                .flatten()
        }
        _ => None,
    }
}
