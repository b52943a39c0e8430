use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::log_formatter::BracketedFormatter;

/// Install the global subscriber: bracketed format, a timestamped log file
/// under `logs/` plus stdout. Called once at process start; returns the
/// log file path.
pub fn setup_logging() -> PathBuf {
    let log_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("logs");
    fs::create_dir_all(&log_dir).expect("Failed to create logs directory");

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("prepare_dataset_{}.log", timestamp);
    let log_path = log_dir.join(&log_filename);

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .expect("Failed to create log file");

    let file_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false); // Disable ANSI colors in file

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    info!("Starting YOLO dataset preparation");
    info!("Log file created at: {:?}", log_path);

    log_path
}
