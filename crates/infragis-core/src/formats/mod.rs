//! Format abstraction layer for spatial inputs
//!
//! Each spatial format implements the `FormatReader` trait and produces a
//! GeoJSON [`Document`]. The `FormatRegistry` dispatches on file extension.
//! Tabular inputs are read separately through [`read_tabular`].

use std::path::Path;

use crate::error::{InfragisError, Result};
use crate::models::{Document, Table};

pub mod csv;
pub mod geojson;
pub mod shapefile;
pub mod spreadsheet;

/// Read a tabular file
///
/// Workbooks are recognized by extension and read from their first sheet.
/// `.tsv` files are always tab-delimited; anything else is delimited text
/// using `delimiter`.
pub fn read_tabular(path: &Path, delimiter: char) -> Result<Table> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    if spreadsheet::SPREADSHEET_EXTENSIONS.iter().any(|ext| ext.eq_ignore_ascii_case(extension)) {
        spreadsheet::read_workbook(path)
    } else if extension.eq_ignore_ascii_case("tsv") {
        csv::read_table(path, '\t')
    } else {
        csv::read_table(path, delimiter)
    }
}

/// Format reader trait that all spatial format implementations must implement
pub trait FormatReader: Send + Sync {
    /// Read a document from the given path
    fn read(&self, path: &Path) -> Result<Document>;

    /// Get supported file extensions (e.g., ["shp", "geojson"])
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name (e.g., "Shapefile", "GeoJSON")
    fn format_name(&self) -> &str;
}

/// Central registry for format readers
pub struct FormatRegistry {
    readers: Vec<Box<dyn FormatReader>>,
}

impl FormatRegistry {
    /// Create a new empty format registry
    pub fn new() -> Self {
        Self { readers: Vec::new() }
    }

    /// Registry with every built-in spatial reader
    pub fn with_builtin_readers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(geojson::GeoJsonReader));
        registry.register(Box::new(shapefile::ShapefileReader));
        registry
    }

    /// Register a format reader
    pub fn register(&mut self, reader: Box<dyn FormatReader>) {
        self.readers.push(reader);
    }

    /// Detect format and return appropriate reader
    pub fn detect_format(&self, path: &Path) -> Result<&dyn FormatReader> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| InfragisError::UnsupportedFormat {
                extension: "none".to_string(),
                supported: self.supported_formats(),
            })?;

        self.readers
            .iter()
            .find(|r| {
                r.supported_extensions().iter().any(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .map(|r| r.as_ref())
            .ok_or_else(|| InfragisError::UnsupportedFormat {
                extension: extension.to_string(),
                supported: self.supported_formats(),
            })
    }

    /// Detect the format and read the document
    pub fn read(&self, path: &Path) -> Result<Document> {
        let reader = self.detect_format(path)?;
        tracing::debug!(path = %path.display(), format = reader.format_name(), "Reading document");
        reader.read(path)
    }

    /// Get list of all supported format extensions
    pub fn supported_formats(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|r| r.supported_extensions())
            .map(|s| s.to_string())
            .collect()
    }

    /// Get all registered readers
    pub fn readers(&self) -> &[Box<dyn FormatReader>] {
        &self.readers
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
