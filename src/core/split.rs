use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use rand::Rng;
use rayon::prelude::*;
use tracing::info;

use super::file_ops::{self, FileCategory, FileOpError, FileOpResult, OpReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Val,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
        }
    }
}

const SPLITS: [DatasetSplit; 2] = [DatasetSplit::Train, DatasetSplit::Val];
const CATEGORIES: [FileCategory; 2] = [FileCategory::Image, FileCategory::Label];

/// One uniform draw: train with probability `train_ratio`, val otherwise.
fn choose_split(train_ratio: f64) -> DatasetSplit {
    if rand::thread_rng().gen::<f64>() < train_ratio {
        DatasetSplit::Train
    } else {
        DatasetSplit::Val
    }
}

/// Partition the recognized files directly under `base_dir` into
/// `images/{train,val}` and `labels/{train,val}`.
///
/// The draw is keyed on the file stem, so an image and the label sharing
/// its stem always land in the same split. The realized train fraction
/// converges to `train_ratio` over many samples; it is not exact per run.
///
/// Creating the split directories is the only fatal failure; per-file move
/// failures are logged and collected without aborting the batch.
pub fn split_dataset(base_dir: &Path, train_ratio: f64) -> io::Result<OpReport> {
    info!(
        "Splitting dataset under {:?} with train ratio {}",
        base_dir, train_ratio
    );
    create_split_dirs(base_dir)?;

    let mut groups: HashMap<OsString, Vec<(PathBuf, FileCategory)>> = HashMap::new();
    for entry in fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let category = match FileCategory::from_path(&path) {
            Some(category) => category,
            None => continue,
        };
        let stem = match path.file_stem() {
            Some(stem) => stem.to_os_string(),
            None => continue,
        };
        groups.entry(stem).or_default().push((path, category));
    }

    let groups: Vec<Vec<(PathBuf, FileCategory)>> = groups.into_values().collect();
    let results: Vec<FileOpResult<()>> = groups
        .par_iter()
        .flat_map_iter(|files| {
            let split = choose_split(train_ratio);
            files
                .iter()
                .map(move |(path, category)| assign_to_split(base_dir, path, *category, split))
        })
        .collect();

    let report = OpReport::from_results(results);
    info!(
        "Split {} files ({} failures)",
        report.completed,
        report.failures.len()
    );
    Ok(report)
}

fn create_split_dirs(base_dir: &Path) -> io::Result<()> {
    for category in CATEGORIES {
        for split in SPLITS {
            fs::create_dir_all(base_dir.join(category.as_dir_name()).join(split.as_str()))?;
        }
    }
    Ok(())
}

fn assign_to_split(
    base_dir: &Path,
    path: &Path,
    category: FileCategory,
    split: DatasetSplit,
) -> FileOpResult<()> {
    let file_name = path.file_name().ok_or_else(|| {
        FileOpError::CopyFailed(format!("No filename component in {:?}", path))
    })?;
    let dest = base_dir
        .join(category.as_dir_name())
        .join(split.as_str())
        .join(file_name);
    file_ops::move_file(path, &dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    fn locate(base: &Path, category: FileCategory, name: &str) -> Option<DatasetSplit> {
        SPLITS.into_iter().find(|split| {
            base.join(category.as_dir_name())
                .join(split.as_str())
                .join(name)
                .exists()
        })
    }

    #[test]
    fn test_split_names() {
        assert_eq!(DatasetSplit::Train.as_str(), "train");
        assert_eq!(DatasetSplit::Val.as_str(), "val");
    }

    #[test]
    fn test_every_recognized_file_lands_in_exactly_one_split() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 0..20 {
            touch(&root.join(format!("frame_{i}.jpg")), "img");
            touch(&root.join(format!("frame_{i}.txt")), "0 0.5 0.5 0.1 0.1\n");
        }

        let report = split_dataset(root, 0.8).unwrap();
        assert_eq!(report.completed, 40);
        assert!(report.is_clean());

        for i in 0..20 {
            let image = format!("frame_{i}.jpg");
            let label = format!("frame_{i}.txt");
            assert!(!root.join(&image).exists());
            assert!(!root.join(&label).exists());

            let image_split = locate(root, FileCategory::Image, &image);
            let label_split = locate(root, FileCategory::Label, &label);
            assert!(image_split.is_some());
            // Paired files share the stem, so they share the split
            assert_eq!(image_split, label_split);
        }
    }

    #[test]
    fn test_unrecognized_files_are_left_at_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("notes.md"), "");
        touch(&root.join("frame.png"), "");

        split_dataset(root, 0.5).unwrap();

        assert!(root.join("notes.md").exists());
        assert!(!root.join("frame.png").exists());
    }

    #[test]
    fn test_split_dirs_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        split_dataset(root, 0.8).unwrap();

        for category in ["images", "labels"] {
            for split in ["train", "val"] {
                assert!(root.join(category).join(split).is_dir());
            }
        }
    }

    #[test]
    fn test_train_fraction_converges_to_ratio() {
        let draws = 10_000;
        let train = (0..draws)
            .filter(|_| choose_split(0.8) == DatasetSplit::Train)
            .count();
        let fraction = train as f64 / draws as f64;
        assert!(
            (fraction - 0.8).abs() < 0.02,
            "train fraction {} too far from 0.8",
            fraction
        );
    }
}
