use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_DIR_ENV: &str = "SPHERE_LOG_DIR";
const DEFAULT_FILTER: &str = "sphere=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("create log directory failed")]
    CreateLogDir {
        #[source]
        source: std::io::Error,
    },
    #[error("initialize tracing subscriber failed")]
    InitSubscriber {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Keeps the non-blocking writer flushing until dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Installs the file subscriber. `filter` applies when `RUST_LOG` is unset.
pub fn init(filter: Option<&str>) -> Result<LoggingGuard, LoggingError> {
    let log_dir = ensure_log_dir()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sphere.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| LoggingError::InitSubscriber {
            source: Box::new(e),
        })?;

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Ok(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}

fn ensure_log_dir() -> Result<PathBuf, LoggingError> {
    let configured = std::env::var_os(LOG_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(sphere::kernel::services::adapters::get_log_dir);

    if let Some(dir) = configured {
        if std::fs::create_dir_all(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = std::env::temp_dir().join("sphere").join("logs");
    std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateLogDir { source })?;
    Ok(dir)
}
