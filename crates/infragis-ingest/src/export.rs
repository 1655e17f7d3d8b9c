//! CSV and GeoJSON exporters

use std::io::Write;

use infragis_core::models::{Document, Feature, FeatureCollection, Geometry, ProjectRecord};
use infragis_core::Result;
use serde_json::{Map, Value};

/// Columns of the CSV export, in order
pub const CSV_COLUMNS: [&str; 11] = [
    "name",
    "type",
    "location",
    "cost",
    "status",
    "startDate",
    "endDate",
    "contractor",
    "description",
    "lat",
    "lon",
];

fn property_cell(feature: &Feature, key: &str) -> String {
    match feature.property(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Write features as CSV with a header row
///
/// `lat` and `lon` come from point geometries and are blank for anything else.
pub fn features_to_csv<W: Write>(features: &[Feature], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;

    for feature in features {
        let (lat, lon) = match feature.known_geometry() {
            Some(Geometry::Point { coordinates }) => (coordinates.y.to_string(), coordinates.x.to_string()),
            _ => (String::new(), String::new()),
        };

        let mut record: Vec<String> =
            CSV_COLUMNS[..9].iter().map(|key| property_cell(feature, key)).collect();
        record.push(lat);
        record.push(lon);
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    tracing::debug!(rows = features.len(), "Wrote CSV export");
    Ok(())
}

/// Wrap features in a FeatureCollection document
pub fn features_to_collection(features: Vec<Feature>) -> Document {
    Document::FeatureCollection(FeatureCollection::new(features))
}

/// One feature per project: its source geometry, or a point at its
/// coordinates, with the remaining fields as properties
pub fn projects_to_collection(projects: &[ProjectRecord]) -> Result<Document> {
    let features = projects
        .iter()
        .map(|project| -> Result<Feature> {
            let mut properties = match serde_json::to_value(project)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            properties.remove("geometry");

            let mut feature = Feature::new(project.display_geometry(), properties);
            feature.id = Some(Value::String(project.id.to_string()));
            Ok(feature)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(features_to_collection(features))
}
