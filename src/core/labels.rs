use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use rayon::prelude::*;
use tracing::{error, info};
use walkdir::WalkDir;

use crate::config::CANONICAL_CLASS_INDEX;
use super::file_ops::{FileCategory, FileOpError, FileOpResult, OpReport};

/// Rewrite every label file under `base_dir` (recursively) so that the
/// first token of each non-blank line is the canonical class index. Files
/// are processed independently across the worker pool; one bad file never
/// stops the rest. Reapplying to an already-normalized file is a no-op.
pub fn update_all_labels(base_dir: &Path) -> OpReport {
    info!("Updating label files under {:?}", base_dir);

    let files: Vec<PathBuf> = WalkDir::new(base_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| FileCategory::from_path(p) == Some(FileCategory::Label))
        .collect();

    let results: Vec<FileOpResult<()>> = files
        .par_iter()
        .map(|path| {
            normalize_label_file(path).map_err(|e| {
                error!("Failed to update {:?}: {}", path, e);
                e
            })
        })
        .collect();

    let report = OpReport::from_results(results);
    info!(
        "Updated {} label files ({} failures)",
        report.completed,
        report.failures.len()
    );
    report
}

/// Reset the class index of every line, drop blank lines, rejoin the
/// remaining tokens with single spaces.
fn normalize_label_content(content: &str) -> String {
    let mut updated = String::with_capacity(content.len());
    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next().is_none() {
            continue;
        }
        updated.push_str(CANONICAL_CLASS_INDEX);
        for token in tokens {
            updated.push(' ');
            updated.push_str(token);
        }
        updated.push('\n');
    }
    updated
}

/// Read-modify-write on a single open handle, truncating any stale tail.
fn normalize_label_file(path: &Path) -> FileOpResult<()> {
    let mut file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| {
            FileOpError::UpdateFailed(format!("Failed to open {:?}: {}", path, e))
        })?;

    let mut content = String::new();
    file.read_to_string(&mut content).map_err(|e| {
        FileOpError::UpdateFailed(format!("Failed to read {:?}: {}", path, e))
    })?;

    let updated = normalize_label_content(&content);

    file.seek(SeekFrom::Start(0)).map_err(|e| {
        FileOpError::UpdateFailed(format!("Failed to rewind {:?}: {}", path, e))
    })?;
    file.write_all(updated.as_bytes()).map_err(|e| {
        FileOpError::UpdateFailed(format!("Failed to write {:?}: {}", path, e))
    })?;
    file.set_len(updated.len() as u64).map_err(|e| {
        FileOpError::UpdateFailed(format!("Failed to truncate {:?}: {}", path, e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_token_becomes_canonical_index() {
        let input = "3 0.5 0.5 0.1 0.1\n7 0.2 0.3 0.4 0.5\n";
        let expected = "0 0.5 0.5 0.1 0.1\n0 0.2 0.3 0.4 0.5\n";
        assert_eq!(normalize_label_content(input), expected);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let input = "1 0.5 0.5 0.1 0.1\n\n   \n2 0.2 0.2 0.2 0.2\n";
        let expected = "0 0.5 0.5 0.1 0.1\n0 0.2 0.2 0.2 0.2\n";
        assert_eq!(normalize_label_content(input), expected);
    }

    #[test]
    fn test_tokens_are_rejoined_with_single_spaces() {
        let input = "5   0.5\t0.5  0.1 0.1\n";
        assert_eq!(normalize_label_content(input), "0 0.5 0.5 0.1 0.1\n");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let input = "9 0.1 0.2 0.3 0.4\n\n8 0.5 0.6 0.7 0.8\n";
        let once = normalize_label_content(input);
        let twice = normalize_label_content(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_truncates_stale_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.txt");
        // Normalized output is shorter than the input, so a stale tail
        // would survive without truncation
        fs::write(&path, "12 0.5 0.5 0.1 0.1\n\n\n13 0.2 0.2 0.2 0.2\n").unwrap();

        normalize_label_file(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "0 0.5 0.5 0.1 0.1\n0 0.2 0.2 0.2 0.2\n"
        );
    }

    #[test]
    fn test_update_walks_recursively_and_skips_images() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("labels/train")).unwrap();
        fs::write(root.join("top.txt"), "4 0.1 0.1 0.2 0.2\n").unwrap();
        fs::write(root.join("labels/train/deep.txt"), "6 0.3 0.3 0.4 0.4\n").unwrap();
        fs::write(root.join("photo.jpg"), "not a label").unwrap();

        let report = update_all_labels(root);

        assert_eq!(report.completed, 2);
        assert!(report.is_clean());
        assert_eq!(
            fs::read_to_string(root.join("top.txt")).unwrap(),
            "0 0.1 0.1 0.2 0.2\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("labels/train/deep.txt")).unwrap(),
            "0 0.3 0.3 0.4 0.4\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("photo.jpg")).unwrap(),
            "not a label"
        );
    }

    #[test]
    fn test_rerunning_on_file_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.txt");
        fs::write(&path, "2 0.5 0.5 0.1 0.1\n").unwrap();

        normalize_label_file(&path).unwrap();
        let first = fs::read(&path).unwrap();
        normalize_label_file(&path).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
