use std::fs;
use std::path::Path;
use tracing::{debug, error};

use crate::config::{IMAGE_EXTENSIONS, LABEL_EXTENSION};

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug)]
pub enum FileOpError {
    CopyFailed(String),
    RemoveFailed(String),
    UpdateFailed(String),
    DestinationExists(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOpError::CopyFailed(msg) => write!(f, "Copy failed: {}", msg),
            FileOpError::RemoveFailed(msg) => write!(f, "Remove failed: {}", msg),
            FileOpError::UpdateFailed(msg) => write!(f, "Update failed: {}", msg),
            FileOpError::DestinationExists(msg) => {
                write!(f, "Destination already exists: {}", msg)
            }
            FileOpError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileOpError {}

impl From<std::io::Error> for FileOpError {
    fn from(error: std::io::Error) -> Self {
        FileOpError::IoError(error)
    }
}

/// Category a recognized dataset file belongs to, derived from its
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Label,
}

impl FileCategory {
    /// Name of the top-level directory this category is split under.
    pub fn as_dir_name(&self) -> &str {
        match self {
            FileCategory::Image => "images",
            FileCategory::Label => "labels",
        }
    }

    /// Classify a path by its extension, or `None` for unrecognized files.
    /// The extension is lower-cased before comparison.
    pub fn from_path(path: &Path) -> Option<FileCategory> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileCategory::Image)
        } else if ext == LABEL_EXTENSION {
            Some(FileCategory::Label)
        } else {
            None
        }
    }
}

/// Check whether a path carries one of the recognized dataset extensions.
pub fn is_recognized(path: &Path) -> bool {
    FileCategory::from_path(path).is_some()
}

/// Outcome of a bulk per-file operation. Failures are collected here in
/// addition to being logged, so callers can inspect what went wrong
/// without parsing the log stream.
#[derive(Debug, Default)]
pub struct OpReport {
    pub completed: usize,
    pub failures: Vec<FileOpError>,
}

impl OpReport {
    /// Fold a collection of per-file results into a report.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = FileOpResult<()>>,
    {
        let mut report = OpReport::default();
        for result in results {
            report.record(result);
        }
        report
    }

    pub fn record(&mut self, result: FileOpResult<()>) {
        match result {
            Ok(()) => self.completed += 1,
            Err(e) => self.failures.push(e),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Move a file from source to destination using copy + remove pattern
/// for cross-drive compatibility.
///
/// # Arguments
/// * `src` - Source file path
/// * `dest` - Destination file path
///
/// # Returns
/// * `Ok(())` if successful
/// * `Err(FileOpError)` if copy or remove failed
pub fn move_file(src: &Path, dest: &Path) -> FileOpResult<()> {
    debug!("Moving file from {:?} to {:?}", src, dest);

    if let Err(e) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        return Err(FileOpError::CopyFailed(format!(
            "Failed to copy from {:?} to {:?}: {}",
            src, dest, e
        )));
    }

    // Remove the original file after successful copy
    if let Err(e) = fs::remove_file(src) {
        error!("Failed to remove original file {:?} after copy: {}", src, e);
        // Roll back the copy so the file is not duplicated
        let _ = fs::remove_file(dest);
        return Err(FileOpError::RemoveFailed(format!(
            "Failed to remove original file {:?}: {}",
            src, e
        )));
    }

    Ok(())
}
