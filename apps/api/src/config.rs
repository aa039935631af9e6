use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub storage_dir: PathBuf,
    pub autosave_enabled: bool,
    pub autosave_delay: Duration,
    pub pdf_renderer_bin: String,
    pub max_profile_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage_dir: std::env::var("STORAGE_DIR")
                .unwrap_or_else(|_| ".quickcv".to_string())
                .into(),
            autosave_enabled: parse_env("AUTOSAVE_ENABLED", true)?,
            autosave_delay: Duration::from_millis(parse_env("AUTOSAVE_DELAY_MS", 2000)?),
            pdf_renderer_bin: std::env::var("PDF_RENDERER_BIN")
                .unwrap_or_else(|_| "wkhtmltopdf".to_string()),
            max_profile_image_bytes: parse_env("MAX_PROFILE_IMAGE_BYTES", 5 * 1024 * 1024)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
