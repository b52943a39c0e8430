//! Project-wide constants shared by every pipeline stage.
//!
//! Extension comparisons are performed against the lower-cased file
//! extension everywhere, so the allow-lists below are lower-case.

/// Extensions classified as images. Lower-case, without the leading dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Extension classified as a label file. Lower-case, without the leading dot.
pub const LABEL_EXTENSION: &str = "txt";

/// Class index written as the first token of every normalized label line.
pub const CANONICAL_CLASS_INDEX: &str = "0";

/// Manifest filename written at the dataset root.
pub const MANIFEST_FILENAME: &str = "dataset.yaml";

/// Train ratio used when the caller does not supply one.
pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;
