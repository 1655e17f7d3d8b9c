pub mod document;
pub mod geometry;
pub mod project;
pub mod table;

pub use document::{Document, Feature, FeatureCollection, FeatureTag};
pub use geometry::{FeatureGeometry, Geometry, Position};
pub use project::ProjectRecord;
pub use table::{Cell, Row, Table};
