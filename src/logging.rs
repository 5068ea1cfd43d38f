//! Logging configuration for ThreadRAG

use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;

/// Initialize logging from the `[logging]` section
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    init_logging_with_level(&config.level, config.log_dir.as_deref())
}

/// Initialize logging with an explicit level and optional log directory
pub fn init_logging_with_level(level: &str, log_dir: Option<&std::path::Path>) -> Result<()> {
    let env_filter = EnvFilter::try_new(format!("{level},threadrag={level}"))
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info,threadrag=debug"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    // File layer only when a log directory is configured
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "threadrag.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // Keep the worker alive for the rest of the process
            std::mem::forget(guard);

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::ThreadRagError::Custom(format!("Logging already initialized: {e}")))?;

    tracing::debug!("Logging initialized with level: {}", level);
    if let Some(dir) = log_dir {
        tracing::info!(
            "Log files will be saved to: {}/threadrag.log.YYYY-MM-DD",
            dir.display()
        );
    }

    Ok(())
}

/// Initialize simple logging for testing
pub fn init_simple_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
