//! GeoJSON features to infrastructure project records
//!
//! Used for GeoJSON and Shapefile imports. Each feature is placed at its
//! representative point and its properties are looked up under the
//! spellings commonly found in GIS exports. A bad feature is reported and
//! skipped; it never aborts the import.

use std::fmt;

use infragis_core::config::ImportDefaults;
use infragis_core::models::{Cell, Document, Feature, FeatureGeometry, ProjectRecord};
use infragis_geo::spatial::{is_valid_coordinate, representative_point};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::coerce::coerce_number;

const NAME_KEYS: &[&str] = &["name", "projectName", "NAME", "Project"];
const TYPE_KEYS: &[&str] = &["type", "projectType", "TYPE", "category"];
const LOCATION_KEYS: &[&str] = &["location", "LOCATION", "address"];
const STATUS_KEYS: &[&str] = &["status", "STATUS"];
const START_KEYS: &[&str] = &["startDate", "start_date", "START_DATE"];
const FINISH_KEYS: &[&str] = &["finishDate", "finish_date", "FINISH_DATE"];
const CONTRACTOR_KEYS: &[&str] = &["contractor", "CONTRACTOR", "company"];
const BUDGET_KEYS: &[&str] = &["budget", "BUDGET"];
const DESCRIPTION_KEYS: &[&str] = &["description", "DESCRIPTION", "notes"];

/// A feature that could not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureIssue {
    /// 1-based position in the document
    pub feature: usize,
    pub reason: String,
}

impl fmt::Display for FeatureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Feature {}: {}", self.feature, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectImport {
    pub projects: Vec<ProjectRecord>,
    pub errors: Vec<FeatureIssue>,
}

/// Non-empty text for a property value; numbers and booleans are rendered
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// First present, non-empty property among `keys`
fn first_text(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| properties.get(*key).and_then(value_text))
}

fn first_number(properties: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match properties.get(*key)? {
        Value::Number(n) => n.as_f64().filter(|n| *n != 0.0),
        Value::String(s) => coerce_number(&Cell::text(s.as_str())).filter(|n| *n != 0.0),
        _ => None,
    })
}

fn import_feature(
    feature: &Feature,
    position: usize,
    defaults: &ImportDefaults,
) -> std::result::Result<ProjectRecord, String> {
    let geometry = match &feature.geometry {
        None => return Err("Feature has no geometry".to_string()),
        Some(FeatureGeometry::Unrecognized(value)) => {
            let kind = value.get("type").and_then(Value::as_str).unwrap_or("unknown");
            return Err(format!("Unsupported geometry type: {}", kind));
        }
        Some(FeatureGeometry::Known(geometry)) => geometry,
    };

    let [longitude, latitude] =
        representative_point(geometry).ok_or_else(|| "Geometry has no coordinates".to_string())?;
    if !is_valid_coordinate(latitude, longitude) {
        return Err("Invalid coordinates".to_string());
    }

    let props = &feature.properties;
    let today = defaults.today.format("%Y-%m-%d").to_string();

    Ok(ProjectRecord {
        id: Uuid::new_v4(),
        project_name: first_text(props, NAME_KEYS)
            .unwrap_or_else(|| format!("Imported Project {}", position)),
        project_type: first_text(props, TYPE_KEYS).unwrap_or_else(|| defaults.project_type.clone()),
        location: first_text(props, LOCATION_KEYS).unwrap_or_else(|| "Unknown Location".to_string()),
        latitude,
        longitude,
        status: first_text(props, STATUS_KEYS).unwrap_or_else(|| defaults.status.clone()),
        start_date: first_text(props, START_KEYS).unwrap_or_else(|| today.clone()),
        finish_date: first_text(props, FINISH_KEYS).unwrap_or(today),
        contractor: first_text(props, CONTRACTOR_KEYS)
            .unwrap_or_else(|| "Unknown Contractor".to_string()),
        budget: first_number(props, BUDGET_KEYS).unwrap_or(0.0),
        description: first_text(props, DESCRIPTION_KEYS).unwrap_or_default(),
        geometry: Some(geometry.clone()),
    })
}

/// Turn every feature of a document into a project record
pub fn import_projects(document: &Document, defaults: &ImportDefaults) -> ProjectImport {
    let mut result = ProjectImport::default();

    for (index, feature) in document.features().iter().enumerate() {
        match import_feature(feature, index + 1, defaults) {
            Ok(project) => result.projects.push(project),
            Err(reason) => result.errors.push(FeatureIssue { feature: index + 1, reason }),
        }
    }

    if !result.errors.is_empty() {
        tracing::warn!(skipped = result.errors.len(), "Some features could not be imported");
    }
    tracing::info!(imported = result.projects.len(), "Imported projects");

    result
}
