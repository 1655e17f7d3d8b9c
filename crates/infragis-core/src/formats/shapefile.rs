//! Shapefile format reader implementation
//!
//! Reads ESRI Shapefiles with the pure-Rust `shapefile` crate. The `.shp`,
//! `.shx` and `.dbf` components must sit next to each other. Shapes become
//! GeoJSON geometries and dBase attributes become feature properties.

use serde_json::{Map, Value};
use shapefile::dbase::FieldValue as DbaseFieldValue;
use shapefile::{PolygonRing, Shape};
use std::path::{Path, PathBuf};

use crate::error::{InfragisError, Result};
use crate::formats::FormatReader;
use crate::models::{Document, Feature, FeatureCollection, FeatureGeometry, Geometry, Position};

/// Shapefile format reader
pub struct ShapefileReader;

impl FormatReader for ShapefileReader {
    fn read(&self, path: &Path) -> Result<Document> {
        self.verify_components(path)?;

        let mut reader = shapefile::Reader::from_path(path).map_err(|e| format_error(format!(
            "Failed to open Shapefile: {}",
            e
        )))?;

        let mut features = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) =
                result.map_err(|e| format_error(format!("Failed to read feature: {}", e)))?;

            let geometry = convert_shape(&shape)?.map(FeatureGeometry::Known);
            let properties = convert_record(record);

            features.push(Feature {
                id: Some(Value::from(features.len())),
                geometry,
                properties,
                ..Feature::default()
            });
        }

        tracing::debug!(path = %path.display(), features = features.len(), "Read Shapefile");
        Ok(Document::FeatureCollection(FeatureCollection::new(features)))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }
}

impl ShapefileReader {
    /// Get the base path for a Shapefile (without extension)
    fn shapefile_base(&self, path: &Path) -> Result<PathBuf> {
        let is_shp = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("shp"))
            .unwrap_or(false);
        if !is_shp {
            return Err(InfragisError::InvalidPath {
                path: path.to_path_buf(),
                reason: "Not a Shapefile (.shp)".to_string(),
            });
        }
        Ok(path.with_extension(""))
    }

    /// Verify that all required Shapefile component files exist
    fn verify_components(&self, path: &Path) -> Result<()> {
        let base = self.shapefile_base(path)?;
        let missing: Vec<String> = ["shp", "shx", "dbf"]
            .iter()
            .filter(|ext| !base.with_extension(ext).exists())
            .map(|ext| format!(".{}", ext))
            .collect();

        if !missing.is_empty() {
            return Err(format_error(format!(
                "Missing required component files: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

fn format_error(message: String) -> InfragisError {
    InfragisError::FormatError { format: "Shapefile".to_string(), message }
}

/// Convert a shape to a geometry; `None` for null shapes
fn convert_shape(shape: &Shape) -> Result<Option<Geometry>> {
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Geometry::Point { coordinates: Position::new(p.x, p.y) },
        Shape::PointM(p) => Geometry::Point { coordinates: Position::new(p.x, p.y) },
        Shape::PointZ(p) => Geometry::Point { coordinates: Position::with_z(p.x, p.y, p.z) },
        Shape::Polyline(line) => lines_to_geometry(line.parts(), |p| Position::new(p.x, p.y)),
        Shape::PolylineM(line) => lines_to_geometry(line.parts(), |p| Position::new(p.x, p.y)),
        Shape::PolylineZ(line) => {
            lines_to_geometry(line.parts(), |p| Position::with_z(p.x, p.y, p.z))
        }
        Shape::Polygon(polygon) => rings_to_geometry(polygon.rings(), |p| Position::new(p.x, p.y)),
        Shape::PolygonM(polygon) => {
            rings_to_geometry(polygon.rings(), |p| Position::new(p.x, p.y))
        }
        Shape::PolygonZ(polygon) => {
            rings_to_geometry(polygon.rings(), |p| Position::with_z(p.x, p.y, p.z))
        }
        Shape::Multipoint(points) => Geometry::MultiPoint {
            coordinates: points.points().iter().map(|p| Position::new(p.x, p.y)).collect(),
        },
        Shape::MultipointM(points) => Geometry::MultiPoint {
            coordinates: points.points().iter().map(|p| Position::new(p.x, p.y)).collect(),
        },
        Shape::MultipointZ(points) => Geometry::MultiPoint {
            coordinates: points.points().iter().map(|p| Position::with_z(p.x, p.y, p.z)).collect(),
        },
        Shape::Multipatch(_) => {
            return Err(format_error("Multipatch geometry type is not supported".to_string()))
        }
    };
    Ok(Some(geometry))
}

/// A single part becomes a LineString, several parts a MultiLineString
fn lines_to_geometry<P>(parts: &[Vec<P>], to_position: impl Fn(&P) -> Position) -> Geometry {
    let mut lines: Vec<Vec<Position>> =
        parts.iter().map(|part| part.iter().map(&to_position).collect()).collect();

    if lines.len() == 1 {
        Geometry::LineString { coordinates: lines.remove(0) }
    } else {
        Geometry::MultiLineString { coordinates: lines }
    }
}

/// Group each outer ring with the inner rings that follow it
fn rings_to_geometry<P>(rings: &[PolygonRing<P>], to_position: impl Fn(&P) -> Position) -> Geometry {
    let mut polygons: Vec<Vec<Vec<Position>>> = Vec::new();

    for ring in rings {
        let positions: Vec<Position> = ring.points().iter().map(&to_position).collect();
        match ring {
            PolygonRing::Outer(_) => polygons.push(vec![positions]),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(polygon) => polygon.push(positions),
                // A hole before any outer ring: keep it as its own polygon
                None => polygons.push(vec![positions]),
            },
        }
    }

    if polygons.len() == 1 {
        Geometry::Polygon { coordinates: polygons.remove(0) }
    } else {
        Geometry::MultiPolygon { coordinates: polygons }
    }
}

/// Extract properties from a dBase record
fn convert_record(record: shapefile::dbase::Record) -> Map<String, Value> {
    record.into_iter().map(|(name, value)| (name, convert_dbase_value(&value))).collect()
}

fn number_or_null(n: f64) -> Value {
    serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Convert dBase field value to JSON value
fn convert_dbase_value(value: &DbaseFieldValue) -> Value {
    match value {
        DbaseFieldValue::Character(Some(s)) => Value::String(s.trim_end().to_string()),
        DbaseFieldValue::Numeric(Some(n)) => number_or_null(*n),
        DbaseFieldValue::Logical(Some(b)) => Value::Bool(*b),
        DbaseFieldValue::Date(Some(date)) => {
            Value::String(format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()))
        }
        DbaseFieldValue::Float(Some(f)) => number_or_null(f64::from(*f)),
        DbaseFieldValue::Integer(i) => Value::Number((*i).into()),
        DbaseFieldValue::Currency(c) => number_or_null(*c),
        DbaseFieldValue::DateTime(dt) => Value::String(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        DbaseFieldValue::Double(d) => number_or_null(*d),
        DbaseFieldValue::Memo(s) => Value::String(s.clone()),
        DbaseFieldValue::Character(None)
        | DbaseFieldValue::Numeric(None)
        | DbaseFieldValue::Logical(None)
        | DbaseFieldValue::Date(None)
        | DbaseFieldValue::Float(None) => Value::Null,
    }
}
