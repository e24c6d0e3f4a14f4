//! Error handling for jinjautils.
//! Defines the error type returned by every session operation and the log level
//! each failure is reported at.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while binding, loading, rendering or writing templates.
///
/// No operation of the session panics; every failure is returned as one of these
/// variants and reported once to the session's log sink.
#[derive(Error, Debug)]
pub enum Error {
    /// The template directory is empty or does not exist.
    #[error("Template directory '{path}' does not exist.")]
    TemplateDirectoryError { path: String },

    /// The template directory path exists but is not a directory.
    #[error("Template directory '{path}' is not a directory.")]
    NotADirectoryError { path: String },

    /// The requested template could not be found.
    #[error("Requested template '{name}' not found in template directory.")]
    TemplateNotFoundError { name: String },

    /// `render` was called before a template was loaded.
    #[error("No template loaded, aborting render.")]
    NoTemplateLoadedError,

    /// `write` was called before a successful render.
    #[error("Render not called or failed, aborting write.")]
    NotRenderedError,

    /// The output directory or output file name was not given.
    #[error("Invalid output directory/file specified.")]
    MissingOutputError,

    /// The output directory does not exist or is not a directory.
    #[error("Invalid output directory specified: '{path}'.")]
    OutputDirectoryError { path: String },

    /// No base file name could be extracted from the output file name.
    #[error("Invalid output file name specified: '{name}'.")]
    OutputFileNameError { name: String },

    /// The pre-existing output file could not be backed up. The target was not touched.
    #[error("Failed to back up '{}': {source}.", .path.display())]
    BackupError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A variables file or assignment could not be parsed.
    #[error("Variables error: {reason}.")]
    ContextError { reason: String },

    /// The template read variables that were not supplied.
    #[error("Undefined variable(s) {}: {source}.", .names.join(", "))]
    UndefinedVariableError {
        names: Vec<String>,
        #[source]
        source: minijinja::Error,
    },

    /// Template compilation or rendering failed.
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Filesystem operations failed.
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),
}

impl Error {
    /// The level this error is reported at.
    ///
    /// Not-found and not-rendered conditions are warnings, everything else is an error.
    pub fn level(&self) -> log::Level {
        match self {
            Error::TemplateNotFoundError { .. } | Error::NotRenderedError => log::Level::Warn,
            _ => log::Level::Error,
        }
    }

    /// Returns true when a template referenced a variable that was not supplied.
    pub fn is_undefined_reference(&self) -> bool {
        match self {
            Error::UndefinedVariableError { .. } => true,
            Error::MinijinjaError(err) => err.kind() == minijinja::ErrorKind::UndefinedError,
            _ => false,
        }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
