//! Column auto-mapping for spreadsheet and CSV imports

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use infragis_core::models::Row;
use infragis_core::{InfragisError, Result};
use serde::{Deserialize, Serialize};

/// The semantic keys a tabular row can be mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticField {
    Lat,
    Lon,
    Name,
    Type,
    Location,
    Cost,
    Status,
    StartDate,
    EndDate,
    Contractor,
    Description,
}

impl SemanticField {
    pub const ALL: [SemanticField; 11] = [
        SemanticField::Lat,
        SemanticField::Lon,
        SemanticField::Name,
        SemanticField::Type,
        SemanticField::Location,
        SemanticField::Cost,
        SemanticField::Status,
        SemanticField::StartDate,
        SemanticField::EndDate,
        SemanticField::Contractor,
        SemanticField::Description,
    ];

    /// Property key used on output features
    pub fn key(&self) -> &'static str {
        match self {
            SemanticField::Lat => "lat",
            SemanticField::Lon => "lon",
            SemanticField::Name => "name",
            SemanticField::Type => "type",
            SemanticField::Location => "location",
            SemanticField::Cost => "cost",
            SemanticField::Status => "status",
            SemanticField::StartDate => "startDate",
            SemanticField::EndDate => "endDate",
            SemanticField::Contractor => "contractor",
            SemanticField::Description => "description",
        }
    }

    /// Header spellings recognized for this field
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            SemanticField::Lat => &["lat", "latitude", "y", "y_coord", "ycoord", "lat_deg"],
            SemanticField::Lon => {
                &["lon", "lng", "long", "longitude", "x", "x_coord", "xcoord", "lon_deg"]
            }
            SemanticField::Name => &["name", "project", "title", "facility", "asset"],
            SemanticField::Type => &["type", "category", "class", "project_type"],
            SemanticField::Location => {
                &["location", "district", "county", "city", "region", "state", "province"]
            }
            SemanticField::Cost => &["cost", "amount", "budget", "value", "capex", "estimate"],
            SemanticField::Status => &["status", "phase", "stage", "state", "progress"],
            SemanticField::StartDate => {
                &["start_date", "startdate", "start", "begin", "commenced", "project_start"]
            }
            SemanticField::EndDate => {
                &["end_date", "enddate", "end", "finish", "completed", "project_end"]
            }
            SemanticField::Contractor => {
                &["contractor", "vendor", "company", "firm", "builder", "developer"]
            }
            SemanticField::Description => {
                &["description", "desc", "summary", "scope", "details", "notes"]
            }
        }
    }

    /// Whether a header names this field
    pub fn matches(&self, column: &str) -> bool {
        let normalized = normalize_column_name(column);
        self.aliases().iter().any(|alias| normalize_column_name(alias) == normalized)
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SemanticField {
    type Err = InfragisError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_column_name(s);
        SemanticField::ALL
            .into_iter()
            .find(|field| normalize_column_name(field.key()) == wanted)
            .ok_or_else(|| InfragisError::UnknownField { name: s.to_string() })
    }
}

/// Trim, lowercase and drop every non-alphanumeric character
///
/// `"Start Date"`, `"start_date"` and `"START-DATE"` all become `"startdate"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Semantic field to source column. Unmapped fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: BTreeMap<SemanticField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SemanticField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: SemanticField, column: impl Into<String>) {
        self.columns.insert(field, column.into());
    }

    pub fn clear(&mut self, field: SemanticField) {
        self.columns.remove(&field);
    }

    /// Every field in declaration order with its column, if any
    pub fn iter(&self) -> impl Iterator<Item = (SemanticField, Option<&str>)> + '_ {
        SemanticField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    pub fn unmapped_fields(&self) -> Vec<SemanticField> {
        SemanticField::ALL.into_iter().filter(|field| self.get(*field).is_none()).collect()
    }

    /// Whether both coordinates are mapped
    pub fn has_coordinates(&self) -> bool {
        self.get(SemanticField::Lat).is_some() && self.get(SemanticField::Lon).is_some()
    }

    /// Apply `field=column` overrides; `field=` clears the field
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<()> {
        for entry in overrides {
            let entry = entry.as_ref();
            let (field, column) = entry.split_once('=').ok_or_else(|| InfragisError::ConfigInvalid {
                key: "map".to_string(),
                reason: format!("expected field=column, got '{}'", entry),
            })?;

            let field: SemanticField = field.parse()?;
            let column = column.trim();
            if column.is_empty() {
                self.clear(field);
            } else {
                self.set(field, column);
            }
        }
        Ok(())
    }
}

/// Guess the mapping from the columns of the first row
///
/// For each field the first column, in column order, whose normalized header
/// equals a normalized alias wins. One column may serve several fields.
pub fn auto_map_columns(rows: &[Row]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    let Some(first) = rows.first() else {
        return mapping;
    };

    let columns: Vec<&str> = first.columns().collect();
    for field in SemanticField::ALL {
        if let Some(column) = columns.iter().find(|column| field.matches(column)) {
            mapping.set(field, *column);
        }
    }

    tracing::debug!(
        columns = columns.len(),
        mapped = SemanticField::ALL.len() - mapping.unmapped_fields().len(),
        "Auto-mapped columns"
    );
    mapping
}
