//! Exit-code mapping (spec.md §7). Component: `boxes-cli` error boundary.
//!
//! Grounded on `examples/original_source/src/boxes.c`'s `exit(EXIT_FAILURE)`
//! call sites and the canonical 9/10 I/O codes from `cmdline.c`/`tools.c`,
//! expressed here as one typed enum instead of scattered `exit()` calls.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Bad option or bad option value (spec.md §7 "Usage").
    #[error("{0}")]
    Usage(String),
    /// Cannot open the input file (exit code 9).
    #[error("{path}: {source}")]
    OpenInput { path: PathBuf, #[source] source: std::io::Error },
    /// Cannot open the output file (exit code 10).
    #[error("{path}: {source}")]
    OpenOutput { path: PathBuf, #[source] source: std::io::Error },
    /// Any other I/O failure reading/writing an already-open stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Config syntax/validation errors; none of the designs in the file
    /// survived parsing (spec.md §7 "Config"). Each already formats as
    /// `file: line: message`.
    #[error("no valid box design found:\n{0}")]
    Config(String),
    /// User named a design that doesn't exist (spec.md §7 "Design selection").
    #[error("{0}")]
    DesignSelection(String),
    /// Autodetection found no design that explains the input (spec.md §7).
    #[error("Box design autodetection failed. Use -d option.")]
    Autodetect,
    /// A programmer-error invariant violation, surfaced rather than panicking.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::OpenInput { .. } => 9,
            CliError::OpenOutput { .. } => 10,
            _ => 1,
        }
    }

    /// Build a `Config` error from the list of per-design parse failures
    /// (spec.md §7 "Config": `file: line: message`, one per line).
    pub fn config(errors: Vec<boxes_design::ConfigError>) -> Self {
        CliError::Config(errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))
    }
}

impl From<boxes_design::DesignError> for CliError {
    fn from(e: boxes_design::DesignError) -> Self {
        CliError::Internal(e.to_string())
    }
}

impl From<boxes_input::InputError> for CliError {
    fn from(e: boxes_input::InputError) -> Self {
        CliError::Internal(e.to_string())
    }
}

impl From<boxes_generate::GenerateError> for CliError {
    fn from(e: boxes_generate::GenerateError) -> Self {
        CliError::Internal(e.to_string())
    }
}

impl From<boxes_remove::RemoveError> for CliError {
    fn from(e: boxes_remove::RemoveError) -> Self {
        CliError::Internal(e.to_string())
    }
}

impl From<boxes_design::CatalogError> for CliError {
    fn from(e: boxes_design::CatalogError) -> Self {
        CliError::Usage(e.to_string())
    }
}
