use anyhow::{ensure, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub refresh_interval: Duration,
    pub port: u16,
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let refresh_interval_seconds: u64 = var("REFRESH_INTERVAL_SECONDS")
            .unwrap_or_else(|| "300".to_string())
            .parse()
            .context("REFRESH_INTERVAL_SECONDS must be a valid number")?;
        ensure!(
            refresh_interval_seconds > 0,
            "REFRESH_INTERVAL_SECONDS must be greater than zero"
        );

        Ok(Self {
            data_dir: var("FLEET_DATA_DIR")
                .unwrap_or_else(|| "data".to_string())
                .into(),
            refresh_interval: Duration::from_secs(refresh_interval_seconds),
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        })
    }
}
