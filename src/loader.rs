//! Template discovery and loading for jinjautils.
//! Validates template directories, lists the templates they contain and resolves
//! a template name or file path into a compiled template.
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::renderer::{LoadedTemplate, MiniJinjaRenderer};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Represents where a requested template comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum TemplateSource {
    /// A standalone template file on disk
    FileSystem(PathBuf),
    /// A template name resolved against the bound template directory
    Name(String),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::FileSystem(path) => write!(f, "file path: '{}'", path.display()),
            TemplateSource::Name(name) => write!(f, "template directory: '{name}'"),
        }
    }
}

impl TemplateSource {
    /// Classifies a template identifier.
    ///
    /// An identifier naming an existing regular file is a standalone file, anything
    /// else is a template name.
    pub fn from_string(s: &str) -> Self {
        let path = Path::new(s);
        if path.is_file() {
            Self::FileSystem(path.to_path_buf())
        } else {
            Self::Name(s.to_string())
        }
    }
}

/// Checks that `path` names an existing directory.
///
/// # Errors
/// * `Error::TemplateDirectoryError` if the path is empty or does not exist
/// * `Error::NotADirectoryError` if the path exists but is not a directory
pub fn validate_template_dir<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || !path.exists() {
        return Err(Error::TemplateDirectoryError { path: path.display().to_string() });
    }
    if !path.is_dir() {
        return Err(Error::NotADirectoryError { path: path.display().to_string() });
    }

    Ok(path.to_path_buf())
}

/// Lists the regular files directly inside `dir`, in enumeration order.
///
/// Subdirectories are not descended into and entries whose names are not valid
/// UTF-8 are skipped. Symlinks are listed when they point at a regular file.
pub fn discover_templates<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        // Follows symlinks, so links to files count and links to directories do not.
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => templates.push(name.to_string()),
            None => debug!("Skipping non UTF-8 file name: {}", entry.path().display()),
        }
    }

    Ok(templates)
}

/// Compiles a standalone template file in a one-off environment rooted at its
/// parent directory. The returned template is named after the file's base name.
pub fn load_template_file<P: AsRef<Path>>(
    path: P,
    config: &SessionConfig,
) -> Result<LoadedTemplate> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::TemplateNotFoundError { name: path.display().to_string() })?;
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    debug!("Creating one-off environment in {}", root.display());
    MiniJinjaRenderer::new(root, config).get_template(name)
}
