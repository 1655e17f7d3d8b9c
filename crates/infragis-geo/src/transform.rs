//! In-place coordinate corrections
//!
//! Both transforms walk every position at every nesting depth of every
//! recognized geometry. Features without geometry and unrecognized
//! geometries are left untouched.

use infragis_core::models::Document;

use crate::analysis::Correction;

/// Multiply x and y of every position by `factor`; `z` is kept as is
pub fn scale_coordinates(document: &mut Document, factor: f64) {
    let mut touched = 0usize;
    for geometry in document.geometries_mut() {
        geometry.for_each_position_mut(|position| {
            position.x *= factor;
            position.y *= factor;
            touched += 1;
        });
    }
    tracing::info!(factor, positions = touched, "Scaled coordinates");
}

/// Exchange x and y of every position
pub fn swap_coordinates(document: &mut Document) {
    let mut touched = 0usize;
    for geometry in document.geometries_mut() {
        geometry.for_each_position_mut(|position| {
            std::mem::swap(&mut position.x, &mut position.y);
            touched += 1;
        });
    }
    tracing::info!(positions = touched, "Swapped longitude and latitude");
}

/// Apply a suggested or user-chosen correction
pub fn apply_correction(document: &mut Document, correction: Correction) {
    match correction {
        Correction::Scale { factor } => scale_coordinates(document, factor),
        Correction::Swap => swap_coordinates(document),
    }
}
