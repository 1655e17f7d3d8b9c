//! InfraGIS Ingest - tabular schema mapping, project import and exports
//!
//! Rows from CSV or spreadsheet tables are mapped onto a fixed set of
//! infrastructure fields and turned into point features. GeoJSON and
//! Shapefile documents can be imported as project records.

pub mod coerce;
pub mod columns;
pub mod export;
pub mod projects;
pub mod records;

pub use coerce::{coerce_number, parse_date};
pub use columns::{auto_map_columns, normalize_column_name, ColumnMapping, SemanticField};
pub use export::{features_to_collection, features_to_csv, projects_to_collection};
pub use projects::{import_projects, FeatureIssue, ProjectImport};
pub use records::{ingest_rows, mapped_row_to_feature, IngestReport};
