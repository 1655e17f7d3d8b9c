//! Columns command implementation

use crate::cli::ColumnsArgs;
use crate::output::OutputWriter;
use crate::output_types::{ColumnsOutput, MappingEntry};
use anyhow::{Context, Result};
use infragis_core::config::LayeredConfig;
use infragis_core::formats::read_tabular;
use infragis_ingest::{auto_map_columns, ColumnMapping};

pub fn execute(args: ColumnsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let table = read_tabular(&args.file, config.csv_delimiter.value)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut mapping = auto_map_columns(&table.rows);
    mapping.apply_overrides(&args.overrides)?;

    let unmapped: Vec<String> =
        mapping.unmapped_fields().iter().map(|field| field.to_string()).collect();

    if output.is_json() {
        return output.result(ColumnsOutput {
            file: args.file.display().to_string(),
            columns: table.columns,
            row_count: table.rows.len(),
            mapping: mapping_entries(&mapping),
            unmapped,
        });
    }

    output.section(format!("Column mapping for {}", args.file.display()));
    output.kv("Rows", table.rows.len());
    output.table(mapping_entries(&mapping))?;

    if !mapping.has_coordinates() {
        output.warning("Latitude and longitude must both be mapped before rows can be imported");
    }
    if !unmapped.is_empty() {
        output.info(format!("Unmapped fields: {}", unmapped.join(", ")));
    }

    Ok(())
}

fn mapping_entries(mapping: &ColumnMapping) -> Vec<MappingEntry> {
    mapping
        .iter()
        .map(|(field, column)| MappingEntry {
            field: field.to_string(),
            column: column.map(str::to_string),
        })
        .collect()
}
