//! Command implementations

mod analyze;
mod columns;
mod config;
mod export_csv;
mod import;
mod normalize;
mod projects;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::progress::{create_spinner, finish_clear};
use anyhow::{Context, Result};
use infragis_core::config::CliConfigOverrides;
use infragis_core::formats::FormatRegistry;
use infragis_core::models::Document;
use std::fs;
use std::path::Path;

/// Execute a CLI command
pub fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let overrides = CliConfigOverrides {
        correction_policy: cli.correction_policy,
        csv_delimiter: cli.delimiter,
    };
    let config = load_config(cli.config.as_deref(), overrides)?;

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config, output),
        Commands::Normalize(args) => normalize::execute(args, &config, output),
        Commands::Columns(args) => columns::execute(args, &config, output),
        Commands::Import(args) => import::execute(args, &config, output),
        Commands::Projects(args) => projects::execute(args, &config, output),
        Commands::ExportCsv(args) => export_csv::execute(args, output),
        Commands::Config => config::execute(&config, output),
    }
}

/// Read a GeoJSON or Shapefile through the format registry
pub(crate) fn read_document(path: &Path, output: &OutputWriter) -> Result<Document> {
    let spinner = create_spinner(&format!("Reading {}", path.display()), output.is_json());
    let registry = FormatRegistry::with_builtin_readers();
    let result = registry.read(path).with_context(|| format!("Failed to read {}", path.display()));
    finish_clear(&spinner);
    result
}

/// Write a document as pretty-printed GeoJSON
pub(crate) fn write_document(path: &Path, document: &Document) -> Result<()> {
    let text = document.to_json_string_pretty()?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), features = document.features().len(), "Wrote GeoJSON");
    Ok(())
}
