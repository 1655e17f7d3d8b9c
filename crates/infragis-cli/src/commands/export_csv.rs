//! Export-csv command implementation

use crate::cli::ExportCsvArgs;
use crate::commands::read_document;
use crate::output::OutputWriter;
use crate::output_types::ExportCsvOutput;
use anyhow::{Context, Result};
use infragis_ingest::features_to_csv;
use std::fs::File;
use std::io::BufWriter;

pub fn execute(args: ExportCsvArgs, output: &OutputWriter) -> Result<()> {
    let document = read_document(&args.file, output)?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    features_to_csv(document.features(), BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let rows = document.features().len();
    if output.is_json() {
        return output.result(ExportCsvOutput { output: args.output.display().to_string(), rows });
    }

    output.success(format!("Exported {} rows to {}", rows, args.output.display()));
    Ok(())
}
