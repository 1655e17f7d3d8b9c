use infragis_geo::{CoordinateDiagnosis, Correction};
use infragis_ingest::FeatureIssue;
use serde::Serialize;
use tabled::Tabled;

/// Output for analyze command
#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub file: String,
    pub diagnosis: CoordinateDiagnosis,
    pub suggested_correction: Option<Correction>,
    pub far_from_view: bool,
    pub warnings: Vec<String>,
}

/// Output for normalize command
#[derive(Debug, Serialize)]
pub struct NormalizeOutput {
    pub input: String,
    pub output: String,
    pub applied: Vec<Correction>,
    pub suggested_correction: Option<Correction>,
    pub feature_count: usize,
}

/// One row of the column mapping
#[derive(Debug, Serialize, Tabled)]
pub struct MappingEntry {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Column", display_with = "display_column")]
    pub column: Option<String>,
}

fn display_column(column: &Option<String>) -> String {
    column.clone().unwrap_or_else(|| "-".to_string())
}

/// Output for columns command
#[derive(Debug, Serialize)]
pub struct ColumnsOutput {
    pub file: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub mapping: Vec<MappingEntry>,
    pub unmapped: Vec<String>,
}

/// Output for import command
#[derive(Debug, Serialize)]
pub struct ImportOutput {
    pub output: String,
    pub feature_count: usize,
    pub dropped_rows: Vec<usize>,
    pub warnings: Vec<String>,
}

/// Output for projects command
#[derive(Debug, Serialize)]
pub struct ProjectsOutput {
    pub output: String,
    pub imported: usize,
    pub errors: Vec<FeatureIssue>,
}

/// Output for export-csv command
#[derive(Debug, Serialize)]
pub struct ExportCsvOutput {
    pub output: String,
    pub rows: usize,
}

/// One configuration value and its origin
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
