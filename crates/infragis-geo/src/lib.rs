//! InfraGIS Geo - coordinate diagnosis, corrections and spatial helpers
//!
//! This crate inspects imported GeoJSON for projected or swapped coordinates,
//! rewrites them in place, and computes representative points and distances.

pub mod analysis;
pub mod spatial;
pub mod transform;

pub use analysis::{analyze_coordinates, manual_scale_hint, Bounds, CoordinateDiagnosis, CoordinateSystem, Correction};
pub use spatial::{is_valid_coordinate, representative_point};
pub use transform::{apply_correction, scale_coordinates, swap_coordinates};
