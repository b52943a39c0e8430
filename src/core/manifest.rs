use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::MANIFEST_FILENAME;

/// Declarative dataset descriptor consumed by the training pipeline.
/// Field order here is the key order written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub train: String,
    pub val: String,
    pub nc: usize,
    pub names: Vec<String>,
}

impl DatasetManifest {
    /// Build the manifest for a dataset rooted at `base_dir`.
    pub fn new(base_dir: &Path, class_names: &[String]) -> Self {
        Self {
            train: base_dir.join("images").join("train").display().to_string(),
            val: base_dir.join("images").join("val").display().to_string(),
            nc: class_names.len(),
            names: class_names.to_vec(),
        }
    }
}

/// Serialize the manifest to `dataset.yaml` at the dataset root, fully
/// overwriting any previous manifest. Failures are logged, never raised.
pub fn create_manifest(base_dir: &Path, class_names: &[String]) {
    let manifest = DatasetManifest::new(base_dir, class_names);
    let path = base_dir.join(MANIFEST_FILENAME);

    let yaml = match serde_yaml::to_string(&manifest) {
        Ok(yaml) => yaml,
        Err(e) => {
            error!("Failed to serialize manifest: {}", e);
            return;
        }
    };
    match fs::write(&path, yaml) {
        Ok(()) => info!("Created: {:?}", path),
        Err(e) => error!("Failed to create {:?}: {}", path, e),
    }
}
