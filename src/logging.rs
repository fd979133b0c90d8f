use std::fs::File;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Environment variable naming a log file; overrides `logging.file`.
pub const LOG_FILE_ENV: &str = "STATEFLOW_LOG";

/// Initialize tracing for the demo runner.
///
/// `RUST_LOG` wins over `logging.filter`. Output goes to the file named by
/// `STATEFLOW_LOG` or `logging.file`, otherwise (or if that file cannot be
/// created) to stderr so stdout stays reserved for rendered frames.
///
/// Log files get a `.{timestamp}.{pid}` suffix so concurrent runs do not
/// clobber each other.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let file_path = std::env::var(LOG_FILE_ENV)
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| config.file.clone());

    // An unusable log file falls back to stderr.
    let file_layer = file_path.and_then(|path| open_log_file(&path)).map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
    });
    let stderr_layer = file_layer.is_none().then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}

fn open_log_file(base: &Path) -> Option<File> {
    let unique_path = unique_log_path(base);
    match File::create(&unique_path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!(
                "Warning: Failed to create log file {}: {}; logging to stderr",
                unique_path, err
            );
            None
        }
    }
}

fn unique_log_path(base: &Path) -> String {
    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}.{}.{}", base.display(), timestamp, pid)
}
