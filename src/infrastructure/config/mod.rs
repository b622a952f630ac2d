//! Layered service configuration.
//!
//! Built-in defaults, then `ArimaIntake.toml` (or the file named by
//! `ARIMA_INTAKE_CONFIG`), then `ARIMA_INTAKE_*` environment variables with `__`
//! separating nested keys, e.g. `ARIMA_INTAKE_ADMIN__PASSWORD`.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::domain::error::{AppError, Result};

pub const CONFIG_PATH_ENV: &str = "ARIMA_INTAKE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "ArimaIntake.toml";
pub const ENV_PREFIX: &str = "ARIMA_INTAKE_";
pub const DEFAULT_STYLESHEET_URL: &str = "https://cdn.tailwindcss.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    pub upload_dir: PathBuf,
    pub image_dir: PathBuf,
    #[validate(length(min = 1))]
    pub allowed_extensions: Vec<String>,
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,
    /// CDN script for page styling. Empty disables the tag.
    pub stylesheet_url: Option<String>,
    /// Capped at one year.
    #[validate(range(min = 1, max = 525_600))]
    pub session_ttl_minutes: i64,
    pub log_filter: String,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminConfig {
    #[validate(length(min = 1))]
    pub username: String,
    /// Plain password, hashed at startup. Ignored when `password_hash` is set.
    pub password: Option<String>,
    pub password_hash: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            image_dir: PathBuf::from("images"),
            allowed_extensions: vec!["csv".to_string()],
            max_upload_bytes: 16 * 1024 * 1024,
            stylesheet_url: Some(DEFAULT_STYLESHEET_URL.to_string()),
            session_ttl_minutes: 120,
            log_filter: "info".to_string(),
            admin: AdminConfig::default(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: Some(DEFAULT_ADMIN_PASSWORD.to_string()),
            password_hash: None,
        }
    }
}

impl AppConfig {
    /// Loads from the default file location and the process environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::from_figment(
            Figment::from(Serialized::defaults(AppConfig::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: AppConfig = figment.extract()?;
        config.normalize();
        config.check()?;
        Ok(config)
    }

    pub fn stylesheet_url(&self) -> Option<&str> {
        self.stylesheet_url.as_deref()
    }

    /// Value for the file input's `accept` attribute, e.g. `.csv`.
    pub fn accept_filter(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin.password_hash.is_none()
            && self.admin.password.as_deref() == Some(DEFAULT_ADMIN_PASSWORD)
    }

    fn normalize(&mut self) {
        self.allowed_extensions = self
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self.stylesheet_url = self
            .stylesheet_url
            .take()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
    }

    fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        self.admin
            .validate()
            .map_err(|e| AppError::ConfigError(format!("admin: {}", e)))?;

        if self.admin.password_hash.is_none() && self.admin.password.is_none() {
            return Err(AppError::ConfigError(
                "admin.password or admin.password_hash must be set".to_string(),
            ));
        }

        if let Some(raw) = self.stylesheet_url() {
            let url = url::Url::parse(raw)
                .map_err(|e| AppError::ConfigError(format!("stylesheet_url: {}", e)))?;
            if url.scheme() != "https" && url.scheme() != "http" {
                return Err(AppError::ConfigError(format!(
                    "stylesheet_url must be http(s), got {}",
                    url.scheme()
                )));
            }
        }

        Ok(())
    }
}
