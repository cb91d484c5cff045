//! Tracing subscriber setup.
//!
//! Filtering follows `RUST_LOG` (default `info`).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Standard error, for services.
    Stderr,
    /// Daily-rolling `hexakin.log.YYYY-MM-DD` files in a directory, for
    /// terminal front-ends whose screen must stay clean.
    DailyFile(&'a Path),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered lines are flushed.
pub fn init_logging(target: LogTarget<'_>) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = match target {
        LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogTarget::DailyFile(dir) => {
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "hexakin.log"))
        }
    };
    let ansi = matches!(target, LogTarget::Stderr);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .try_init()?;

    Ok(guard)
}
