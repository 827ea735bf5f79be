use std::sync::Mutex;

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const LOG_FILE: &str = "playtabs.log";

/// Logs go to a file in the data directory; the terminal belongs to the UI.
pub fn initialize_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    let log_path = config.data_dir.join(LOG_FILE);
    let log_file = std::fs::File::create(log_path)?;

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
