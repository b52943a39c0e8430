use std::path::PathBuf;
use std::process;
use clap::Parser;
use tracing::{error, info, warn};

mod config;
mod core;
mod log_formatter;
mod logging;

use crate::core::{DatasetPreparator, OpReport};

#[derive(Parser)]
#[command(name = "prepare-yolo-dataset")]
#[command(about = "Flatten, clean and split a local dataset into a YOLO training layout")]
struct Args {
    /// Dataset directory to prepare (created if missing)
    #[arg(short, long, default_value = "dataset")]
    dataset_dir: PathBuf,

    /// Training set ratio, strictly between 0.0 and 1.0
    #[arg(long, default_value_t = config::DEFAULT_TRAIN_RATIO)]
    train_ratio: f64,

    /// Class names written to the manifest, comma separated
    #[arg(long, value_delimiter = ',')]
    class_names: Vec<String>,

    /// Only rewrite label files, leave the directory layout untouched
    #[arg(long)]
    labels_only: bool,
}

fn main() {
    let args = Args::parse();

    if args.train_ratio <= 0.0 || args.train_ratio >= 1.0 {
        eprintln!("Error: train_ratio must be strictly between 0.0 and 1.0");
        process::exit(1);
    }

    logging::setup_logging();

    let preparator = match DatasetPreparator::new(&args.dataset_dir) {
        Ok(preparator) => preparator,
        Err(e) => {
            error!(
                "Failed to create dataset directory {:?}: {}",
                args.dataset_dir, e
            );
            process::exit(1);
        }
    };

    if args.labels_only {
        log_report("label update", &preparator.update_all_labels());
        info!("Label update finished");
        return;
    }

    log_report("flatten", &preparator.flatten_all_files());
    log_report("file cleanup", &preparator.remove_unwanted_files());
    log_report("empty directory sweep", &preparator.remove_empty_dirs());
    log_report("label update", &preparator.update_all_labels());
    match preparator.split_dataset(args.train_ratio) {
        Ok(report) => log_report("split", &report),
        Err(e) => {
            error!("Failed to create split directories: {}", e);
            process::exit(1);
        }
    }
    preparator.create_manifest(&args.class_names);

    info!("Dataset preparation finished");
}

fn log_report(operation: &str, report: &OpReport) {
    if report.is_clean() {
        info!("{}: {} entries processed", operation, report.completed);
    } else {
        warn!(
            "{}: {} entries processed, {} failures",
            operation,
            report.completed,
            report.failures.len()
        );
    }
}
