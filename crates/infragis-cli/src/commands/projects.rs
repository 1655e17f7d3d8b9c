//! Projects command implementation

use crate::cli::ProjectsArgs;
use crate::commands::{read_document, write_document};
use crate::errors::no_projects_imported;
use crate::output::OutputWriter;
use crate::output_types::ProjectsOutput;
use anyhow::Result;
use infragis_core::config::LayeredConfig;
use infragis_ingest::{import_projects, projects_to_collection};

pub fn execute(args: ProjectsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let document = read_document(&args.file, output)?;
    let defaults = config.import_defaults(chrono::Local::now().date_naive());

    let import = import_projects(&document, &defaults);
    if import.projects.is_empty() {
        return Err(no_projects_imported(document.features().len()).into());
    }

    write_document(&args.output, &projects_to_collection(&import.projects)?)?;

    if output.is_json() {
        return output.result(ProjectsOutput {
            output: args.output.display().to_string(),
            imported: import.projects.len(),
            errors: import.errors,
        });
    }

    if !import.errors.is_empty() {
        output.warning(format!("{} features could not be imported", import.errors.len()));
        for issue in import.errors.iter().take(5) {
            output.warning(issue);
        }
        if import.errors.len() > 5 {
            output.warning(format!("... and {} more", import.errors.len() - 5));
        }
    }
    output.success(format!(
        "Imported {} projects into {}",
        import.projects.len(),
        args.output.display()
    ));
    Ok(())
}
