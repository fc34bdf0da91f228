pub mod settings;

pub use settings::{Config, DeliveryMode};

use crate::error::VideoError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
/// A `.env` file is read first if present. Missing `CHANNEL_ID` or
/// `YOUTUBE_API_KEY` is an error; the binary refuses to start on it.
pub fn load_config() -> Result<Arc<Config>, VideoError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = Config::from_env()?;
    config.validate_and_log()?;

    Ok(Arc::new(config))
}
