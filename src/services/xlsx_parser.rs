//! Spreadsheet parser for sourcing data workbooks.
//!
//! Pure function of the file contents: reads an on-disk XLSX file into
//! per-sheet row maps or fails with a parse error when the container is
//! unreadable or required sheets are missing.

use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};

/// Sheets every sourcing data workbook must contain.
pub const REQUIRED_SHEETS: &[&str] = &[
    "materials",
    "business units",
    "suppliers",
    "countries",
    "for upload",
];

/// One data row as (header, cell) pairs in sheet column order.
pub type SheetRow = Vec<(String, Value)>;

/// Look up a cell by header name.
pub fn row_get<'a>(row: &'a SheetRow, column: &str) -> Option<&'a Value> {
    row.iter()
        .find(|(header, _)| header == column)
        .map(|(_, value)| value)
}

/// A fully parsed sourcing data workbook.
#[derive(Debug, Default)]
pub struct ParsedWorkbook {
    pub materials: Vec<SheetRow>,
    pub business_units: Vec<SheetRow>,
    pub suppliers: Vec<SheetRow>,
    pub countries: Vec<SheetRow>,
    /// Rows of the "for upload" sheet - the sourcing data itself.
    pub sourcing_data: Vec<SheetRow>,
}

/// Parse the workbook at `path`.
pub fn parse_workbook(path: &Path) -> AppResult<ParsedWorkbook> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| AppError::Parse(format!("XLSX file could not be parsed: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let missing: Vec<&str> = REQUIRED_SHEETS
        .iter()
        .filter(|required| !sheet_names.iter().any(|name| name == *required))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Parse(format!(
            "Spreadsheet is missing required sheets: {}",
            missing.join(", ")
        )));
    }

    let mut read_sheet = |name: &str| -> AppResult<Vec<SheetRow>> {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| AppError::Parse(format!("Failed to read sheet '{}': {}", name, e)))?;
        Ok(rows_from_range(&range))
    };

    Ok(ParsedWorkbook {
        materials: read_sheet("materials")?,
        business_units: read_sheet("business units")?,
        suppliers: read_sheet("suppliers")?,
        countries: read_sheet("countries")?,
        sourcing_data: read_sheet("for upload")?,
    })
}

/// Convert a cell range into row maps, treating the first row as the header.
fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let mut rows = range.rows();

    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    rows.map(|cells| {
        header
            .iter()
            .zip(cells.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, cell)| (name.clone(), cell_to_value(cell)))
            .collect()
    })
    .collect()
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => json!(s.trim()),
        Data::Float(f) => json!(f),
        Data::Int(i) => json!(i),
        Data::Bool(b) => json!(b),
        Data::DateTime(dt) => json!(dt.as_f64()),
        other => Value::String(other.to_string()),
    }
}
