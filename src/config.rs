use anyhow::{Context, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub metadata_base_url: String,
    pub timeout_secs: u64,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    let metadata_base_url =
        std::env::var("METADATA_BASE_URL").context("METADATA_BASE_URL is not set")?;
    let timeout_secs = match std::env::var("METADATA_TIMEOUT_SECS") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("METADATA_TIMEOUT_SECS is not a number: {value}"))?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    Ok(Config {
        metadata_base_url,
        timeout_secs,
    })
}
