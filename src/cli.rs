//! Command-line interface implementation for jinjautils.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for jinjautils.
#[derive(Parser, Debug)]
#[command(author, version, about = "jinjautils: render a template and write it to disk", long_about = None)]
pub struct Args {
    /// Template name inside --template-dir, or a path to a template file
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Directory the rendered file is written to
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Name of the rendered file; leading directories are ignored
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: String,

    /// Directory to load templates from
    #[arg(short, long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// JSON or YAML file with template variables
    #[arg(long, value_name = "FILE")]
    pub vars: Option<PathBuf>,

    /// Set a single variable; the value is parsed as JSON when possible
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Overwrite an existing output file without backing it up
    #[arg(long)]
    pub no_backup: bool,

    /// Keep the first newline after a block tag
    #[arg(long)]
    pub no_trim_blocks: bool,

    /// Keep whitespace before a block tag
    #[arg(long)]
    pub no_lstrip_blocks: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
