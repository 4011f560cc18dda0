//! Error handling for rebar.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while scaffolding a concrete5 object.
///
/// The exporter performs no local recovery: every variant is surfaced to the
/// immediate caller, and already written files are left in place.
#[derive(Error, Debug)]
pub enum RebarError {
    /// The directory that will contain the destination cannot be written to.
    /// Raised before any file is touched.
    #[error("Path [{path}] is not writable.")]
    PathNotWritable { path: String },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors that occur while loading or parsing a recipe file
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors in preparing a template for export
    #[error("Template error: {0}.")]
    TemplateError(String),
}

impl From<walkdir::Error> for RebarError {
    fn from(err: walkdir::Error) -> Self {
        RebarError::IoError(err.into())
    }
}

/// Convenience type alias for Results with [`RebarError`] as the error type.
pub type RebarResult<T> = Result<T, RebarError>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: RebarError) {
    eprintln!("{err}");
    std::process::exit(1);
}
