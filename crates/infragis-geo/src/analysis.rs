//! Coordinate diagnosis for imported GeoJSON
//!
//! Samples a handful of positions from a document and decides whether they
//! look like geographic degrees, projected units, or swapped axes. Sampling
//! is bounded: at most 5 positions per geometry and 20 positions overall, so
//! anomalies deep inside large documents can be missed.

use std::fmt;

use infragis_core::models::{Document, Geometry, Position};
use serde::Serialize;

use crate::spatial::haversine_distance;

/// Positions sampled from each geometry
pub const SAMPLES_PER_GEOMETRY: usize = 5;

/// Positions analyzed per document
pub const MAX_ANALYZED_SAMPLES: usize = 20;

const LARGE_VALUE: f64 = 1_000.0;
const VERY_LARGE_VALUE: f64 = 100_000.0;
const HUGE_VALUE: f64 = 1_000_000.0;

/// Inferred coordinate system of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// Decimal degrees
    Geographic,
    /// Values above 100 000, most likely meters
    ProjectedMeters,
    /// Mostly values above 1 000 in an unknown unit
    ProjectedUnknown,
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Geographic => write!(f, "geographic"),
            CoordinateSystem::ProjectedMeters => write!(f, "projected_meters"),
            CoordinateSystem::ProjectedUnknown => write!(f, "projected_unknown"),
        }
    }
}

/// Bounding box of the sampled positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Bounds of a set of positions, `None` when empty
    pub fn from_positions(positions: &[Position]) -> Option<Self> {
        let first = positions.first()?;
        let initial = Bounds { min_lng: first.x, max_lng: first.x, min_lat: first.y, max_lat: first.y };

        Some(positions.iter().skip(1).fold(initial, |b, p| Bounds {
            min_lng: b.min_lng.min(p.x),
            max_lng: b.max_lng.max(p.x),
            min_lat: b.min_lat.min(p.y),
            max_lat: b.max_lat.max(p.y),
        }))
    }

    /// Center as `[lng, lat]`
    pub fn center(&self) -> [f64; 2] {
        [(self.min_lng + self.max_lng) / 2.0, (self.min_lat + self.max_lat) / 2.0]
    }
}

/// A corrective transform the caller may offer to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Correction {
    Scale { factor: f64 },
    Swap,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correction::Scale { factor } => write!(f, "scale coordinates by {}", factor),
            Correction::Swap => write!(f, "swap longitude and latitude"),
        }
    }
}

/// Result of [`analyze_coordinates`]. Never persisted; it only drives a
/// one-time confirmation before the document is rewritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateDiagnosis {
    /// Features whose geometry was sampled
    pub feature_count: usize,
    /// Positions collected before the cap
    pub sample_count: usize,
    /// Positions actually analyzed (at most [`MAX_ANALYZED_SAMPLES`])
    pub analyzed_count: usize,
    pub lng_out_of_range: usize,
    pub lat_out_of_range: usize,
    pub possible_swapped: usize,
    pub large_values: usize,
    pub very_large_values: usize,
    pub max_abs_value: f64,
    pub coordinate_system: CoordinateSystem,
    pub scale_factor: f64,
    pub needs_swapping: bool,
    pub needs_scaling: bool,
    pub bounds: Option<Bounds>,
}

impl CoordinateDiagnosis {
    /// The correction to offer. Scaling wins over swapping when both fire.
    pub fn suggested_correction(&self) -> Option<Correction> {
        if self.needs_scaling {
            Some(Correction::Scale { factor: self.scale_factor })
        } else if self.needs_swapping {
            Some(Correction::Swap)
        } else {
            None
        }
    }

    /// Whether the sampled data sits more than `threshold_meters` away from a
    /// reference view center given as `[lng, lat]`
    pub fn is_far_from(&self, view_center: [f64; 2], threshold_meters: f64) -> bool {
        self.bounds
            .map(|bounds| haversine_distance(bounds.center(), view_center) > threshold_meters)
            .unwrap_or(false)
    }

    /// Human-readable findings
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.needs_scaling {
            warnings.push(format!(
                "Coordinates appear to be in a projected coordinate system ({}); max coordinate value {}",
                self.coordinate_system, self.max_abs_value
            ));
        }
        if self.needs_swapping {
            warnings.push(format!(
                "{} of {} sampled positions look like lat,lng instead of lng,lat",
                self.possible_swapped, self.sample_count
            ));
        }
        if !self.needs_scaling && self.lng_out_of_range + self.lat_out_of_range > 0 {
            warnings.push(format!(
                "{} longitude and {} latitude values are outside geographic ranges",
                self.lng_out_of_range, self.lat_out_of_range
            ));
        }

        warnings
    }
}

/// Positions sampled from one geometry
///
/// Point: its position. LineString/MultiPoint: the first 5. Polygon and
/// MultiLineString: the first 5 of the first ring or line. MultiPolygon: the
/// first 5 of the first ring of the first polygon.
pub fn sample_positions(geometry: &Geometry) -> &[Position] {
    fn head(positions: &[Position]) -> &[Position] {
        &positions[..positions.len().min(SAMPLES_PER_GEOMETRY)]
    }

    match geometry {
        Geometry::Point { coordinates } => std::slice::from_ref(coordinates),
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            head(coordinates)
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            coordinates.first().map(|ring| head(ring)).unwrap_or(&[])
        }
        Geometry::MultiPolygon { coordinates } => coordinates
            .first()
            .and_then(|polygon| polygon.first())
            .map(|ring| head(ring))
            .unwrap_or(&[]),
    }
}

/// Classify the coordinates of a document
pub fn analyze_coordinates(document: &Document) -> CoordinateDiagnosis {
    let mut samples: Vec<Position> = Vec::new();
    let mut feature_count = 0;

    for geometry in document.geometries() {
        samples.extend_from_slice(sample_positions(geometry));
        feature_count += 1;
    }

    let analyzed = &samples[..samples.len().min(MAX_ANALYZED_SAMPLES)];

    let mut lng_out_of_range = 0;
    let mut lat_out_of_range = 0;
    let mut possible_swapped = 0;
    let mut large_values = 0;
    let mut very_large_values = 0;
    let mut max_abs_value: f64 = 0.0;

    for position in analyzed {
        let (first, second) = (position.x, position.y);
        let (abs_first, abs_second) = (first.abs(), second.abs());
        max_abs_value = max_abs_value.max(abs_first).max(abs_second);

        if !(-180.0..=180.0).contains(&first) {
            lng_out_of_range += 1;
        }
        if !(-90.0..=90.0).contains(&second) {
            lat_out_of_range += 1;
        }

        if abs_first > LARGE_VALUE || abs_second > LARGE_VALUE {
            large_values += 1;
        }
        if abs_first > VERY_LARGE_VALUE || abs_second > VERY_LARGE_VALUE {
            very_large_values += 1;
        }

        // A valid longitude may exceed 90 but a latitude may not
        if abs_first <= 90.0 && abs_second <= 180.0 && abs_first > abs_second {
            possible_swapped += 1;
        }
    }

    // Majorities are taken over every collected sample, not only the analyzed ones
    let sample_count = samples.len();
    let (coordinate_system, scale_factor) = if very_large_values > 0 {
        let factor = if max_abs_value > HUGE_VALUE { 1e-5 } else { 1e-6 };
        (CoordinateSystem::ProjectedMeters, factor)
    } else if large_values * 2 > sample_count {
        (CoordinateSystem::ProjectedUnknown, 0.01)
    } else {
        (CoordinateSystem::Geographic, 1.0)
    };

    let diagnosis = CoordinateDiagnosis {
        feature_count,
        sample_count,
        analyzed_count: analyzed.len(),
        lng_out_of_range,
        lat_out_of_range,
        possible_swapped,
        large_values,
        very_large_values,
        max_abs_value,
        coordinate_system,
        scale_factor,
        needs_swapping: possible_swapped * 2 > sample_count,
        needs_scaling: coordinate_system != CoordinateSystem::Geographic,
        bounds: Bounds::from_positions(&samples),
    };

    tracing::debug!(
        samples = diagnosis.sample_count,
        analyzed = diagnosis.analyzed_count,
        system = %diagnosis.coordinate_system,
        needs_scaling = diagnosis.needs_scaling,
        needs_swapping = diagnosis.needs_swapping,
        "Analyzed coordinates"
    );

    diagnosis
}

/// Scale factor suggested when the user asks to rescale a layer by hand
pub fn manual_scale_hint(max_abs_value: f64) -> f64 {
    if max_abs_value > 10_000_000.0 {
        1e-7
    } else if max_abs_value > 1_000_000.0 {
        1e-6
    } else if max_abs_value > 100_000.0 {
        1e-5
    } else if max_abs_value > 1_000.0 {
        0.01
    } else {
        1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infragis_core::models::{Feature, FeatureCollection};
    use serde_json::{json, Map};

    fn points(coords: &[[f64; 2]]) -> Document {
        let features = coords
            .iter()
            .map(|c| Feature::new(Geometry::point(c[0], c[1]), Map::new()))
            .collect();
        Document::FeatureCollection(FeatureCollection::new(features))
    }

    #[test]
    fn test_geographic_document() {
        let document = points(&[[-93.6, 41.6], [115.2, -8.6], [2.35, 48.85]]);
        let diagnosis = analyze_coordinates(&document);

        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::Geographic);
        assert_eq!(diagnosis.scale_factor, 1.0);
        assert!(!diagnosis.needs_scaling);
        assert!(!diagnosis.needs_swapping);
        assert_eq!(diagnosis.suggested_correction(), None);
        assert!(diagnosis.warnings().is_empty());
    }

    #[test]
    fn test_projected_meters_small_scale() {
        let document = points(&[[500_000.0, 400_000.0], [450_000.0, 300_000.0]]);
        let diagnosis = analyze_coordinates(&document);

        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::ProjectedMeters);
        assert_eq!(diagnosis.scale_factor, 1e-6);
        assert!(diagnosis.needs_scaling);
        assert_eq!(diagnosis.very_large_values, 2);
        assert_eq!(diagnosis.lng_out_of_range, 2);
        assert_eq!(diagnosis.lat_out_of_range, 2);
    }

    #[test]
    fn test_projected_meters_large_scale() {
        let document = points(&[[500_000.0, 4_600_000.0]]);
        let diagnosis = analyze_coordinates(&document);

        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::ProjectedMeters);
        assert_eq!(diagnosis.scale_factor, 1e-5);
        assert_eq!(diagnosis.max_abs_value, 4_600_000.0);
        assert_eq!(diagnosis.suggested_correction(), Some(Correction::Scale { factor: 1e-5 }));
    }

    #[test]
    fn test_projected_unknown_needs_majority() {
        let majority = points(&[[5_000.0, 40.0], [6_000.0, 41.0], [10.0, 10.0]]);
        let diagnosis = analyze_coordinates(&majority);
        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::ProjectedUnknown);
        assert_eq!(diagnosis.scale_factor, 0.01);

        let half = points(&[[5_000.0, 40.0], [10.0, 10.0]]);
        let diagnosis = analyze_coordinates(&half);
        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::Geographic);
    }

    #[test]
    fn test_swap_signature() {
        // (80, 30): |first| <= 90, |second| <= 180 and |first| > |second|
        let document = points(&[[80.0, 30.0], [45.0, 12.0], [60.0, -20.0]]);
        let diagnosis = analyze_coordinates(&document);

        assert_eq!(diagnosis.possible_swapped, 3);
        assert!(diagnosis.needs_swapping);
        assert!(!diagnosis.needs_scaling);
        assert_eq!(diagnosis.suggested_correction(), Some(Correction::Swap));
    }

    #[test]
    fn test_swap_signature_not_counted() {
        // |first| > 90, and |first| < |second|
        let document = points(&[[120.0, 45.0], [45.0, 120.0]]);
        let diagnosis = analyze_coordinates(&document);
        assert_eq!(diagnosis.possible_swapped, 0);
        assert!(!diagnosis.needs_swapping);
    }

    #[test]
    fn test_scaling_takes_precedence_over_swap() {
        let diagnosis = CoordinateDiagnosis {
            needs_scaling: true,
            needs_swapping: true,
            scale_factor: 0.01,
            ..analyze_coordinates(&points(&[]))
        };
        assert_eq!(diagnosis.suggested_correction(), Some(Correction::Scale { factor: 0.01 }));
    }

    #[test]
    fn test_empty_collection() {
        let diagnosis = analyze_coordinates(&points(&[]));

        assert_eq!(diagnosis.feature_count, 0);
        assert_eq!(diagnosis.sample_count, 0);
        assert_eq!(diagnosis.max_abs_value, 0.0);
        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::Geographic);
        assert!(!diagnosis.needs_swapping);
        assert_eq!(diagnosis.bounds, None);
    }

    #[test]
    fn test_null_and_unknown_geometries_are_skipped() {
        let document = Document::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {}},
                {"type": "Feature", "geometry": {"type": "GeometryCollection", "geometries": []}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10.0, 50.0]}, "properties": {}}
            ]
        }))
        .unwrap();

        let diagnosis = analyze_coordinates(&document);
        assert_eq!(diagnosis.feature_count, 1);
        assert_eq!(diagnosis.sample_count, 1);
    }

    #[test]
    fn test_sampling_per_geometry_type() {
        let ring: Vec<[f64; 2]> = (0..8).map(|i| [i as f64, i as f64]).collect();

        assert_eq!(sample_positions(&Geometry::line_string(ring.clone())).len(), 5);
        assert_eq!(sample_positions(&Geometry::polygon(vec![ring.clone(), ring.clone()])).len(), 5);
        assert_eq!(sample_positions(&Geometry::polygon(vec![])).len(), 0);

        let multi = Geometry::MultiPolygon {
            coordinates: vec![vec![ring[..3].iter().copied().map(Position::from).collect()]],
        };
        assert_eq!(sample_positions(&multi).len(), 3);
        assert_eq!(sample_positions(&Geometry::MultiPolygon { coordinates: vec![vec![]] }).len(), 0);
    }

    #[test]
    fn test_only_first_twenty_samples_analyzed() {
        // 25 geographic points followed by projected ones that must be ignored
        let mut coords: Vec<[f64; 2]> = (0..25).map(|i| [i as f64, 1.0]).collect();
        coords.extend((0..10).map(|_| [500_000.0, 4_000_000.0]));
        let diagnosis = analyze_coordinates(&points(&coords));

        assert_eq!(diagnosis.sample_count, 35);
        assert_eq!(diagnosis.analyzed_count, 20);
        assert_eq!(diagnosis.very_large_values, 0);
        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::Geographic);
        // Bounds cover every collected sample
        assert_eq!(diagnosis.bounds.unwrap().max_lat, 4_000_000.0);
    }

    #[test]
    fn test_swap_majority_counts_every_collected_sample() {
        let mut coords: Vec<[f64; 2]> = (0..15).map(|_| [80.0, 30.0]).collect();
        coords.extend((0..25).map(|_| [10.0, 50.0]));
        let diagnosis = analyze_coordinates(&points(&coords));

        assert_eq!(diagnosis.sample_count, 40);
        assert_eq!(diagnosis.analyzed_count, 20);
        assert_eq!(diagnosis.possible_swapped, 15);
        // 15 is a majority of the 20 analyzed but not of the 40 collected
        assert!(!diagnosis.needs_swapping);
        assert_eq!(diagnosis.suggested_correction(), None);
    }

    #[test]
    fn test_large_value_majority_counts_every_collected_sample() {
        let mut coords: Vec<[f64; 2]> = (0..15).map(|_| [5_000.0, 40.0]).collect();
        coords.extend((0..25).map(|_| [10.0, 50.0]));
        let diagnosis = analyze_coordinates(&points(&coords));

        assert_eq!(diagnosis.large_values, 15);
        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::Geographic);
        assert!(!diagnosis.needs_scaling);

        let coords: Vec<[f64; 2]> = (0..40).map(|_| [5_000.0, 40.0]).collect();
        let diagnosis = analyze_coordinates(&points(&coords));
        // Only 20 analyzed, which is never more than half of 40
        assert_eq!(diagnosis.large_values, 20);
        assert_eq!(diagnosis.coordinate_system, CoordinateSystem::Geographic);
    }

    #[test]
    fn test_bounds_and_far_check() {
        let document = points(&[[-93.0, 41.0], [-94.0, 42.0]]);
        let diagnosis = analyze_coordinates(&document);

        let bounds = diagnosis.bounds.unwrap();
        assert_eq!(bounds.min_lng, -94.0);
        assert_eq!(bounds.max_lat, 42.0);
        assert_eq!(bounds.center(), [-93.5, 41.5]);

        assert!(!diagnosis.is_far_from([-93.6, 41.6], 1_000_000.0));
        assert!(diagnosis.is_far_from([2.35, 48.85], 1_000_000.0));
    }

    #[test]
    fn test_manual_scale_hint() {
        assert_eq!(manual_scale_hint(50_000_000.0), 1e-7);
        assert_eq!(manual_scale_hint(2_000_000.0), 1e-6);
        assert_eq!(manual_scale_hint(500_000.0), 1e-5);
        assert_eq!(manual_scale_hint(5_000.0), 0.01);
        assert_eq!(manual_scale_hint(50.0), 1e-6);
    }
}
