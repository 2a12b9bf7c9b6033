use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::GridError;

/// Sends all log output to `path`, the terminal belongs to the table.
///
/// The filter is read from `RUST_LOG` and defaults to `info,tvgrid=debug`.
pub fn init_logging(path: &Path) -> Result<(), GridError> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tvgrid=debug")),
        )
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}
