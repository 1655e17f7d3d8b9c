use clap::{Args, Parser, Subcommand};
use infragis_core::config::{parse_correction_policy, parse_delimiter, CorrectionPolicy};
use std::path::PathBuf;

/// InfraGIS - infrastructure project data ingestion
#[derive(Parser, Debug)]
#[command(name = "infragis")]
#[command(about = "Ingest, repair and export infrastructure project data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./infragis.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// How suggested coordinate corrections are handled (prompt, always, never)
    #[arg(long, global = true, value_name = "POLICY", value_parser = parse_correction_policy)]
    pub correction_policy: Option<CorrectionPolicy>,

    /// CSV field delimiter (a single character, or "tab")
    #[arg(long, global = true, value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diagnose the coordinates of a GeoJSON or Shapefile
    Analyze(AnalyzeArgs),

    /// Rescale or swap coordinates and write the corrected GeoJSON
    Normalize(NormalizeArgs),

    /// Show how the columns of a CSV file or spreadsheet map onto project fields
    Columns(ColumnsArgs),

    /// Convert CSV or spreadsheet rows into a GeoJSON FeatureCollection of points
    Import(ImportArgs),

    /// Import GeoJSON or Shapefile features as project records
    Projects(ProjectsArgs),

    /// Export GeoJSON features as CSV
    ExportCsv(ExportCsvArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// GeoJSON (.geojson, .json) or Shapefile (.shp)
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// GeoJSON (.geojson, .json) or Shapefile (.shp)
    pub file: PathBuf,

    /// Output GeoJSON path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Multiply every coordinate by this factor
    #[arg(long, value_name = "FACTOR", conflicts_with = "rescale")]
    pub scale: Option<f64>,

    /// Rescale using a factor suggested from the largest coordinate value
    #[arg(long)]
    pub rescale: bool,

    /// Swap longitude and latitude
    #[arg(long)]
    pub swap: bool,

    /// Apply the suggested correction without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// CSV, TSV or spreadsheet (.xlsx, .xls, .ods) with a header row
    pub file: PathBuf,

    /// Override a mapping entry (field=column, or field= to clear it)
    #[arg(long = "map", value_name = "FIELD=COLUMN")]
    pub overrides: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV, TSV or spreadsheet (.xlsx, .xls, .ods) with a header row
    pub file: PathBuf,

    /// Output GeoJSON path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Override a mapping entry (field=column, or field= to clear it)
    #[arg(long = "map", value_name = "FIELD=COLUMN")]
    pub overrides: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// GeoJSON (.geojson, .json) or Shapefile (.shp)
    pub file: PathBuf,

    /// Output GeoJSON path
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportCsvArgs {
    /// GeoJSON (.geojson, .json) or Shapefile (.shp)
    pub file: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    pub output: PathBuf,
}
