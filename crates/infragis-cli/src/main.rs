//! InfraGIS CLI - Command-line interface
//!
//! Thin adapter over the ingest and geo crates: reads files, runs the
//! pipeline and reports results as tables or JSON.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod interactive;
mod output;
mod output_types;
mod progress;

use clap::Parser;
use cli::Cli;
use errors::CliError;
use output::OutputWriter;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    match commands::execute(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CliError>() {
                Some(cli_error) if !output.is_json() => cli_error.display(),
                _ => output.error(format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
