//! Logging setup: console on stderr plus an optional plain-text log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{CrawlError, Result};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the default level (`info`, or `debug` when
/// `verbose`). The returned guard flushes the file writer on drop and must
/// live as long as the crawl.
pub fn init_logging(file: Option<&Path>, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,catalog_crawl={level}"))
    });

    let console_layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| CrawlError::Config(format!("invalid log file {}", path.display())))?;
            std::fs::create_dir_all(dir)?;

            let (writer, guard) = non_blocking(rolling::never(dir, name));
            let layer = fmt::Layer::new()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CrawlError::Config(format!("logging already initialised: {e}")))?;

    Ok(guard)
}
