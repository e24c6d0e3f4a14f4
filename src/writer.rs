//! Output target validation, backup and writing of rendered templates.

use crate::constants::BACKUP_SUFFIX;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where and how a rendered template should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRequest {
    /// Existing directory the file is written into
    pub directory: Option<PathBuf>,
    /// File name; any leading path components are discarded
    pub file_name: Option<String>,
    /// Back up an existing file before it is overwritten
    pub backup: bool,
}

impl Default for OutputRequest {
    fn default() -> Self {
        Self { directory: None, file_name: None, backup: true }
    }
}

impl OutputRequest {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(directory: P, file_name: S) -> Self {
        Self {
            directory: Some(directory.into()),
            file_name: Some(file_name.into()),
            backup: true,
        }
    }

    pub fn backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }
}

/// Checks that `directory` exists and is a directory.
pub fn validate_output_dir<P: AsRef<Path>>(directory: P) -> Result<PathBuf> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(Error::OutputDirectoryError { path: directory.display().to_string() });
    }

    Ok(directory.to_path_buf())
}

/// Reduces an output file name to its base name.
///
/// # Example
/// ```
/// use jinjautils::writer::output_file_name;
/// assert_eq!(output_file_name("/my/foo/file.test").unwrap(), "file.test");
/// ```
pub fn output_file_name(file_name: &str) -> Result<String> {
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::OutputFileNameError { name: file_name.to_string() })
}

/// Returns the first unused backup path for `target`.
///
/// `name` is backed up to `name.bak`, then `name.1.bak`, `name.2.bak` and so on, so
/// an earlier backup is never overwritten.
pub fn backup_path(target: &Path) -> PathBuf {
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let mut candidate = target.with_file_name(format!("{name}.{BACKUP_SUFFIX}"));
    let mut generation = 1u32;
    while candidate.exists() {
        candidate = target.with_file_name(format!("{name}.{generation}.{BACKUP_SUFFIX}"));
        generation += 1;
    }
    candidate
}

/// Copies `target` to a fresh backup path and returns that path.
///
/// # Errors
/// * `Error::BackupError` if the copy fails. `target` is left as it was.
pub fn backup_file(target: &Path) -> Result<PathBuf> {
    let destination = backup_path(target);
    fs::copy(target, &destination)
        .map_err(|source| Error::BackupError { path: target.to_path_buf(), source })?;

    Ok(destination)
}

/// Writes `content` to `target`, creating or truncating it.
pub fn write_file<P: AsRef<Path>>(content: &str, target: P) -> Result<()> {
    fs::write(target, content).map_err(Error::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("file.out").unwrap(), "file.out");
        assert_eq!(output_file_name("dir/sub/path/file.out").unwrap(), "file.out");
        assert!(matches!(output_file_name(""), Err(Error::OutputFileNameError { .. })));
        assert!(matches!(output_file_name("/"), Err(Error::OutputFileNameError { .. })));
        assert!(matches!(output_file_name("a/.."), Err(Error::OutputFileNameError { .. })));
    }

    #[test]
    fn test_backup_path_generations() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("file.test");

        assert_eq!(backup_path(&target), dir.path().join("file.test.bak"));
        fs::write(dir.path().join("file.test.bak"), "").unwrap();
        assert_eq!(backup_path(&target), dir.path().join("file.test.1.bak"));
        fs::write(dir.path().join("file.test.1.bak"), "").unwrap();
        assert_eq!(backup_path(&target), dir.path().join("file.test.2.bak"));
    }

    #[test]
    fn test_backup_failure_leaves_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing.txt");
        assert!(matches!(backup_file(&target), Err(Error::BackupError { .. })));
        assert!(!target.exists());
    }

    #[test]
    fn test_output_request_defaults() {
        let request = OutputRequest::new("/tmp", "f.txt");
        assert!(request.backup);
        assert!(!request.backup(false).backup);
        assert_eq!(OutputRequest::default().directory, None);
    }
}
