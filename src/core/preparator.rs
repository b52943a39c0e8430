use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use super::clean;
use super::file_ops::OpReport;
use super::flatten;
use super::labels;
use super::manifest;
use super::split;

/// Reorganizes one dataset directory in place: flattens the subtree,
/// removes junk, splits into train/val, normalizes labels and writes the
/// manifest. The filesystem itself is the source of truth between stages;
/// no state outlives an operation.
pub struct DatasetPreparator {
    base_dir: PathBuf,
}

impl DatasetPreparator {
    /// Create the preparator, creating `base_dir` (including parents) if
    /// absent. Root creation is the one failure that propagates: no
    /// further work is meaningful without it.
    pub fn new(base_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        info!("Preparing dataset at {:?}", base_dir);
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Move all files from subdirectories into the base directory.
    pub fn flatten_all_files(&self) -> OpReport {
        flatten::flatten_all_files(&self.base_dir)
    }

    /// Delete files that are not recognized images or labels.
    pub fn remove_unwanted_files(&self) -> OpReport {
        clean::remove_unwanted_files(&self.base_dir)
    }

    /// Delete empty subfolders, deepest first.
    pub fn remove_empty_dirs(&self) -> OpReport {
        clean::remove_empty_dirs(&self.base_dir)
    }

    /// Split images and labels into train/val folders under `images/` and
    /// `labels/`.
    pub fn split_dataset(&self, train_ratio: f64) -> io::Result<OpReport> {
        split::split_dataset(&self.base_dir, train_ratio)
    }

    /// Reset the class index of every label line to the canonical value.
    pub fn update_all_labels(&self) -> OpReport {
        labels::update_all_labels(&self.base_dir)
    }

    /// Write `dataset.yaml` pointing at the train/val images with the
    /// given class names.
    pub fn create_manifest(&self, class_names: &[String]) {
        manifest::create_manifest(&self.base_dir, class_names)
    }
}
