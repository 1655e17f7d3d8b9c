//! Canonical geometry types used across all infragis crates.
//!
//! These types mirror GeoJSON geometry objects one-to-one. Positions keep an
//! optional third ordinate so that elevation survives a read/write cycle.

use serde::{Deserialize, Deserializer, Serialize};

/// A single GeoJSON position.
///
/// `x` is the first ordinate (longitude for geographic data) and `y` the
/// second (latitude). Nothing about the range is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// The `[x, y]` pair, dropping elevation
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Position {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y] => Ok(Self::new(*x, *y)),
            [x, y, z, ..] => Ok(Self::with_z(*x, *y, *z)),
            _ => Err(format!("position needs at least 2 numbers, found {}", values.len())),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        match position.z {
            Some(z) => vec![position.x, position.y, z],
            None => vec![position.x, position.y],
        }
    }
}

/// GeoJSON-compatible geometry representation
///
/// Serializes with the GeoJSON `type` tag and correctly nested coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: Position::new(x, y) }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords.into_iter().map(Position::from).collect() }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon {
            coordinates: rings
                .into_iter()
                .map(|ring| ring.into_iter().map(Position::from).collect())
                .collect(),
        }
    }

    /// Visit every position of the geometry, at every nesting depth
    pub fn for_each_position_mut<F: FnMut(&mut Position)>(&mut self, mut f: F) {
        match self {
            Geometry::Point { coordinates } => f(coordinates),
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                coordinates.iter_mut().for_each(f)
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.iter_mut().flatten().for_each(f)
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter_mut().flatten().flatten().for_each(f)
            }
        }
    }

    /// Try to parse from a serde_json::Value (GeoJSON)
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Geometry slot of a feature.
///
/// Anything that is not one of the six supported geometry kinds (a
/// GeometryCollection, an unknown type string, non-numeric coordinates) is
/// kept verbatim as `Unrecognized` so it survives a round-trip, and every
/// traversal skips it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureGeometry {
    Known(Geometry),
    Unrecognized(serde_json::Value),
}

impl FeatureGeometry {
    pub fn from_value(value: serde_json::Value) -> Self {
        match Geometry::from_geojson(&value) {
            Some(geometry) => FeatureGeometry::Known(geometry),
            None => {
                tracing::debug!(
                    geometry_type = value.get("type").and_then(|t| t.as_str()).unwrap_or("?"),
                    "Keeping unrecognized geometry as-is"
                );
                FeatureGeometry::Unrecognized(value)
            }
        }
    }

    pub fn known(&self) -> Option<&Geometry> {
        match self {
            FeatureGeometry::Known(geometry) => Some(geometry),
            FeatureGeometry::Unrecognized(_) => None,
        }
    }

    pub fn known_mut(&mut self) -> Option<&mut Geometry> {
        match self {
            FeatureGeometry::Known(geometry) => Some(geometry),
            FeatureGeometry::Unrecognized(_) => None,
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        match self {
            FeatureGeometry::Known(geometry) => geometry.to_geojson(),
            FeatureGeometry::Unrecognized(value) => value.clone(),
        }
    }
}

impl From<Geometry> for FeatureGeometry {
    fn from(geometry: Geometry) -> Self {
        FeatureGeometry::Known(geometry)
    }
}

impl<'de> Deserialize<'de> for FeatureGeometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(FeatureGeometry::from_value(value))
    }
}
