//! Tabular rows to GeoJSON point features

use infragis_core::models::{Cell, Feature, Geometry, Row};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::{coerce_number, format_date, parse_date};
use crate::columns::{ColumnMapping, SemanticField};

/// Outcome of converting a batch of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub features: Vec<Feature>,
    /// 1-based positions of the rows that produced no feature
    pub dropped_rows: Vec<usize>,
}

impl IngestReport {
    pub fn error_count(&self) -> usize {
        self.dropped_rows.len()
    }
}

fn mapped_cell<'a>(row: &'a Row, mapping: &ColumnMapping, field: SemanticField) -> Option<&'a Cell> {
    mapping.get(field).and_then(|column| row.get(column))
}

/// The cell as read: text stays text, numbers and booleans keep their type
fn raw_value(cell: Option<&Cell>) -> Value {
    match cell {
        Some(Cell::Text(text)) => Value::String(text.clone()),
        Some(Cell::Number(n)) => serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
        Some(Cell::Bool(b)) => Value::Bool(*b),
        Some(Cell::Empty) | None => Value::Null,
    }
}

fn number_value(cell: Option<&Cell>) -> Value {
    cell.and_then(coerce_number)
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn date_value(cell: Option<&Cell>) -> Value {
    cell.and_then(parse_date).map(|date| Value::String(format_date(date))).unwrap_or(Value::Null)
}

/// Point feature for one row, `None` when latitude or longitude is missing
/// or not a finite number
///
/// Coordinates are not range-checked here; out-of-range values are left for
/// the coordinate diagnosis to flag.
pub fn mapped_row_to_feature(row: &Row, mapping: &ColumnMapping) -> Option<Feature> {
    let lat = mapped_cell(row, mapping, SemanticField::Lat).and_then(coerce_number)?;
    let lon = mapped_cell(row, mapping, SemanticField::Lon).and_then(coerce_number)?;

    let cell = |field| mapped_cell(row, mapping, field);
    let mut properties = Map::new();
    properties.insert("name".into(), raw_value(cell(SemanticField::Name)));
    properties.insert("type".into(), raw_value(cell(SemanticField::Type)));
    properties.insert("location".into(), raw_value(cell(SemanticField::Location)));
    properties.insert("cost".into(), number_value(cell(SemanticField::Cost)));
    properties.insert("status".into(), raw_value(cell(SemanticField::Status)));
    properties.insert("startDate".into(), date_value(cell(SemanticField::StartDate)));
    properties.insert("endDate".into(), date_value(cell(SemanticField::EndDate)));
    properties.insert("contractor".into(), raw_value(cell(SemanticField::Contractor)));
    properties.insert("description".into(), raw_value(cell(SemanticField::Description)));
    properties.insert("documents".into(), Value::Array(Vec::new()));

    Some(Feature::new(Geometry::point(lon, lat), properties))
}

/// Convert every row, keeping track of the ones that were dropped
pub fn ingest_rows(rows: &[Row], mapping: &ColumnMapping) -> IngestReport {
    let mut report = IngestReport::default();

    for (index, row) in rows.iter().enumerate() {
        match mapped_row_to_feature(row, mapping) {
            Some(feature) => report.features.push(feature),
            None => report.dropped_rows.push(index + 1),
        }
    }

    if !report.dropped_rows.is_empty() {
        tracing::warn!(
            dropped = report.dropped_rows.len(),
            total = rows.len(),
            "{} rows had errors (missing or invalid coordinates)",
            report.dropped_rows.len()
        );
    }
    tracing::info!(features = report.features.len(), "Converted rows to features");

    report
}
