//! Log setup. The terminal belongs to the UI, so logs go to a daily-rolled
//! file under `<data_dir>/logs`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogSettings;

/// Install the global subscriber. Keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init(settings: &LogSettings, data_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(
        data_dir.join("logs"),
        &settings.file_name,
    ));

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
