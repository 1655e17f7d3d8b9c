//! Spatial helpers: representative points, coordinate validity and
//! great-circle distances.

use geo::{Distance, Haversine, Point};
use infragis_core::models::{Geometry, Position};

/// A single `[lon, lat]` standing in for a geometry on a map or in a table
///
/// Polygons and lines use the arithmetic mean of their first ring or line,
/// not an area-weighted centroid. `None` when there are no positions.
pub fn representative_point(geometry: &Geometry) -> Option<[f64; 2]> {
    match geometry {
        Geometry::Point { coordinates } => Some(coordinates.xy()),
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            mean_position(coordinates)
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            coordinates.first().and_then(|ring| mean_position(ring))
        }
        Geometry::MultiPolygon { coordinates } => coordinates
            .first()
            .and_then(|polygon| polygon.first())
            .and_then(|ring| mean_position(ring)),
    }
}

fn mean_position(positions: &[Position]) -> Option<[f64; 2]> {
    if positions.is_empty() {
        return None;
    }
    let n = positions.len() as f64;
    let (sum_x, sum_y) = positions.iter().fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
    Some([sum_x / n, sum_y / n])
}

/// Finite and inside geographic ranges
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// Haversine distance in meters between two `[lon, lat]` pairs
pub fn haversine_distance(from: [f64; 2], to: [f64; 2]) -> f64 {
    Haversine.distance(Point::new(from[0], from[1]), Point::new(to[0], to[1]))
}
