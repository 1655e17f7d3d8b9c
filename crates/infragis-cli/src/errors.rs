use console::style;
use std::fmt;

/// Error with remediation hints, shown in full in human output
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: None, suggestions: Vec::new() }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}

/// No row had usable coordinates
pub fn no_usable_rows(row_count: usize, lat: Option<&str>, lon: Option<&str>) -> CliError {
    let describe = |column: Option<&str>| column.map(|c| format!("'{}'", c)).unwrap_or_else(|| "unmapped".to_string());

    CliError::new("No rows with valid coordinates")
        .with_context(format!(
            "{} rows read; latitude column: {}, longitude column: {}",
            row_count,
            describe(lat),
            describe(lon)
        ))
        .with_suggestion("Check the detected mapping with: infragis columns <file>")
        .with_suggestion("Point the coordinates at the right columns: --map lat=<column> --map lon=<column>")
}

/// No feature could be turned into a project
pub fn no_projects_imported(feature_count: usize) -> CliError {
    CliError::new("No projects were imported")
        .with_context(format!("{} features read, none with a usable geometry", feature_count))
        .with_suggestion("Run 'infragis analyze <file>' to look for projected or swapped coordinates")
        .with_suggestion("Fix them with 'infragis normalize <file> -o <out.geojson>' and import the result")
}
