//! Import command implementation

use crate::cli::ImportArgs;
use crate::commands::write_document;
use crate::errors::no_usable_rows;
use crate::output::OutputWriter;
use crate::output_types::ImportOutput;
use crate::progress::{create_spinner, finish_success};
use anyhow::{Context, Result};
use infragis_core::config::LayeredConfig;
use infragis_core::formats::read_tabular;
use infragis_geo::analyze_coordinates;
use infragis_ingest::{auto_map_columns, features_to_collection, ingest_rows, SemanticField};

pub fn execute(args: ImportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let spinner = create_spinner(&format!("Reading {}", args.file.display()), output.is_json());
    let table = read_tabular(&args.file, config.csv_delimiter.value)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    finish_success(&spinner, &format!("Read {} rows", table.rows.len()));

    let mut mapping = auto_map_columns(&table.rows);
    mapping.apply_overrides(&args.overrides)?;

    let report = ingest_rows(&table.rows, &mapping);
    if report.features.is_empty() {
        return Err(no_usable_rows(
            table.rows.len(),
            mapping.get(SemanticField::Lat),
            mapping.get(SemanticField::Lon),
        )
        .into());
    }

    let mut warnings = Vec::new();
    if report.error_count() > 0 {
        warnings.push(format!(
            "{} rows had errors (missing or invalid coordinates)",
            report.error_count()
        ));
    }

    let feature_count = report.features.len();
    let document = features_to_collection(report.features);
    warnings.extend(analyze_coordinates(&document).warnings());
    write_document(&args.output, &document)?;

    if output.is_json() {
        return output.result(ImportOutput {
            output: args.output.display().to_string(),
            feature_count,
            dropped_rows: report.dropped_rows,
            warnings,
        });
    }

    for warning in &warnings {
        output.warning(warning);
    }
    output.success(format!("Wrote {} features to {}", feature_count, args.output.display()));
    Ok(())
}
