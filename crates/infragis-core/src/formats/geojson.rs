//! GeoJSON format reader implementation

use std::fs;
use std::path::Path;

use crate::error::{InfragisError, Result};
use crate::formats::FormatReader;
use crate::models::Document;

/// GeoJSON format reader
pub struct GeoJsonReader;

impl FormatReader for GeoJsonReader {
    fn read(&self, path: &Path) -> Result<Document> {
        let content = fs::read_to_string(path).map_err(InfragisError::Io)?;
        let document = Document::from_json_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            features = document.features().len(),
            "Parsed GeoJSON document"
        );
        Ok(document)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}
