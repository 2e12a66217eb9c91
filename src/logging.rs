use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Environment variable naming a log file. When unset, logs go to stderr.
pub const LOG_FILE_ENV: &str = "FEATURE_RUNTIME_LOG";

/// Initialize tracing for the binary.
///
/// `RUST_LOG` takes precedence over `config.filter`. When `FEATURE_RUNTIME_LOG`
/// is set, output goes to `{path}.{timestamp}.{pid}` instead of stderr so that
/// several processes can log side by side.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    if let Ok(base) = std::env::var(LOG_FILE_ENV) {
        let path = unique_log_path(&base, std::process::id(), unix_timestamp());
        match std::fs::File::create(&path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .with_timer(UtcTime::rfc_3339());

                return tracing_subscriber::registry()
                    .with(filter)
                    .with(file_layer)
                    .try_init()
                    .is_ok();
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file {}: {}", path.display(), e);
            }
        }
    }

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn unique_log_path(base: &str, pid: u32, timestamp: u64) -> PathBuf {
    PathBuf::from(format!("{}.{}.{}", base, timestamp, pid))
}
