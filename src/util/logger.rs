use std::path::Path;

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "travel-agency-backend";

/// Keeps the non-blocking file writers alive; drop it only at shutdown.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    /// Console + daily-rolling plain and JSON files, each split into general and error-only.
    ///
    /// Reads `LOG_DIR` (default `logs`), `RUST_LOG`, `FILE_LOG_LEVEL` and `ERROR_FILE_LOG_LEVEL`.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        let guards = Self::setup_logging(Path::new(&log_dir))?;
        Ok(Logger { guards })
    }

    /// Fallback when the log directory is unusable.
    pub fn console_only() {
        let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(console_filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init();
    }

    fn setup_logging(log_dir: &Path) -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
        let error_dir = log_dir.join("error");
        std::fs::create_dir_all(log_dir.join("json"))?;
        std::fs::create_dir_all(error_dir.join("json"))?;

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,travel_agency_backend=debug"));
        let file_log_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let error_file_log_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let (general, general_guard) = non_blocking(rolling::daily(log_dir, format!("{}.log", LOG_FILE_PREFIX)));
        let (errors, errors_guard) = non_blocking(rolling::daily(&error_dir, format!("{}-error.log", LOG_FILE_PREFIX)));
        let (general_json, general_json_guard) =
            non_blocking(rolling::daily(log_dir.join("json"), format!("{}.json", LOG_FILE_PREFIX)));
        let (errors_json, errors_json_guard) =
            non_blocking(rolling::daily(error_dir.join("json"), format!("{}-error.json", LOG_FILE_PREFIX)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(console_filter),
            )
            .with(
                fmt::layer()
                    .with_writer(general)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level)),
            )
            .with(
                fmt::layer()
                    .with_writer(errors)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&error_file_log_level)),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(general_json)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level)),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(errors_json)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&error_file_log_level)),
            )
            .try_init()?;

        Ok(vec![general_guard, errors_guard, general_json_guard, errors_json_guard])
    }
}
