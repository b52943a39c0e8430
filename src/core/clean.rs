use std::fs;
use std::path::Path;
use tracing::{error, info};
use walkdir::WalkDir;

use super::file_ops::{is_recognized, FileOpError, OpReport};

/// Delete every file under `base_dir` whose extension is not in the
/// recognized allow-list. The sweep is recursive and per-file failures do
/// not halt it.
pub fn remove_unwanted_files(base_dir: &Path) -> OpReport {
    info!("Removing unwanted files under {:?}", base_dir);

    let mut report = OpReport::default();
    for entry in WalkDir::new(base_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_recognized(path) {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => {
                info!("Removed {:?}", path);
                report.record(Ok(()));
            }
            Err(e) => {
                error!("Error removing {:?}: {}", path, e);
                report.record(Err(FileOpError::RemoveFailed(format!(
                    "Failed to remove {:?}: {}",
                    path, e
                ))));
            }
        }
    }
    report
}

/// Delete every empty directory under `base_dir`, deepest first, so that a
/// parent emptied by removing its last child is itself removed within the
/// same invocation. The root itself is never removed.
pub fn remove_empty_dirs(base_dir: &Path) -> OpReport {
    info!("Removing empty directories under {:?}", base_dir);

    let mut report = OpReport::default();
    // contents_first yields children before their parent
    for entry in WalkDir::new(base_dir)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        let is_empty = match fs::read_dir(path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) => {
                error!("Failed to read directory {:?}: {}", path, e);
                report.record(Err(FileOpError::IoError(e)));
                continue;
            }
        };
        if !is_empty {
            continue;
        }
        match fs::remove_dir(path) {
            Ok(()) => {
                info!("Removed empty directory: {:?}", path);
                report.record(Ok(()));
            }
            Err(e) => {
                error!("Failed to remove {:?}: {}", path, e);
                report.record(Err(FileOpError::RemoveFailed(format!(
                    "Failed to remove directory {:?}: {}",
                    path, e
                ))));
            }
        }
    }
    report
}
