use std::fs;
use std::path::{Path, PathBuf};
use rayon::prelude::*;
use tracing::{error, info};
use walkdir::WalkDir;

use super::file_ops::{self, FileCategory, FileOpError, FileOpResult, OpReport};

/// Move every file found anywhere under `base_dir` directly into
/// `base_dir`, leaving the subtree empty of files. Files already at the
/// root stay where they are.
///
/// Collision policy: an incoming image replaces an existing destination
/// file; any other incoming file loses to the existing destination and is
/// reported as a failure. When two same-named images are flattened
/// concurrently, which one survives is non-deterministic; exactly one does.
///
/// Moves are dispatched across the worker pool one file per task; a failed
/// task never aborts its siblings.
pub fn flatten_all_files(base_dir: &Path) -> OpReport {
    info!("Flattening all files under {:?}", base_dir);

    let files: Vec<PathBuf> = WalkDir::new(base_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!("Failed to walk {:?}: {}", base_dir, e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.parent() != Some(base_dir))
        .collect();

    let results: Vec<FileOpResult<()>> = files
        .par_iter()
        .map(|src| move_into_root(src, base_dir))
        .collect();

    let report = OpReport::from_results(results);
    info!(
        "Flattened {} files ({} failures)",
        report.completed,
        report.failures.len()
    );
    report
}

fn move_into_root(src: &Path, base_dir: &Path) -> FileOpResult<()> {
    let file_name = src.file_name().ok_or_else(|| {
        FileOpError::CopyFailed(format!("No filename component in {:?}", src))
    })?;
    let dest = base_dir.join(file_name);

    if dest.exists() {
        if FileCategory::from_path(src) == Some(FileCategory::Image) {
            // Last-writer-wins for images
            fs::remove_file(&dest).map_err(|e| {
                error!("Failed to remove colliding image {:?}: {}", dest, e);
                FileOpError::RemoveFailed(format!(
                    "Failed to remove colliding image {:?}: {}",
                    dest, e
                ))
            })?;
        } else {
            error!("Refusing to overwrite {:?} with {:?}", dest, src);
            return Err(FileOpError::DestinationExists(format!(
                "{:?} blocks move of {:?}",
                dest, src
            )));
        }
    }

    file_ops::move_file(src, &dest)
}
