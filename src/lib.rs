//! jinjautils is a convenience layer over MiniJinja.
//! It discovers templates in a directory, loads one by name or path, renders it with
//! caller-supplied variables and writes the result to disk, backing up any file it
//! would overwrite.

/// Command-line interface module for the jinjautils binary
pub mod cli;

/// Session options and variables files (JSON or YAML)
pub mod config;

/// Common constants: sentinel strings, log context, backup suffix
pub mod constants;

/// Error types and handling for jinjautils
pub mod error;

/// Template directory validation, discovery and template resolution
pub mod loader;

/// Log sinks: console output and the `log` facade
pub mod logger;

/// MiniJinja environment construction and template handles
pub mod renderer;

/// The stateful load, render and write workflow
pub mod session;

/// Output validation, backups and file writing
pub mod writer;

pub use renderer::LoadedTemplate;
pub use session::TemplateSession;
pub use writer::OutputRequest;
