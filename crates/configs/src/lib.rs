//! # configs
//!
//! Layered configuration for the confession wall binary.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults (a local, single-profile wall on `127.0.0.1:8080`)
//! 2. an optional `confession-wall.toml` in the working directory
//! 3. `CW__*` environment variables, e.g. `CW__SERVER__PORT=9000`
//!
//! A `.env` file is loaded into the environment before step 3.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub attachments: AttachmentConfig,
    pub history: HistoryConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per store key (the wall's "profile").
    pub data_dir: PathBuf,
    /// Directory where selected files wait until the post is submitted.
    pub upload_dir: PathBuf,
    /// Total bytes the store may hold. Unlimited when unset.
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentConfig {
    pub max_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    /// Argon2 PHC string. Without it the admin login always fails.
    #[serde(default)]
    pub password_hash: Option<SecretString>,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    /// Loads `.env`, then defaults, the optional config file and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
        }

        let settings = Self::defaults()?
            .add_source(File::with_name("confession-wall").required(false))
            .add_source(
                Environment::with_prefix("CW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    /// Defaults overlaid with a single, mandatory config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::from(path).required(true))
            .build()?;

        Self::finish(settings)
    }

    /// Defaults only.
    pub fn defaults_only() -> Result<Self, ConfigError> {
        Self::finish(Self::defaults()?.build()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("server.static_dir", "./static")?
            .set_default("storage.data_dir", "./data/store")?
            .set_default("storage.upload_dir", "./data/uploads")?
            .set_default("attachments.max_bytes", 50_i64 * 1024 * 1024)?
            .set_default("history.capacity", 100_i64)?
            .set_default("admin.session_ttl_minutes", 30_i64)?)
    }

    fn finish(settings: config::Config) -> Result<Self, ConfigError> {
        let cfg: AppConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.attachments.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "attachments.max_bytes must be positive".into(),
            ));
        }
        if self.storage.quota_bytes == Some(0) {
            return Err(ConfigError::Invalid(
                "storage.quota_bytes must be positive when set".into(),
            ));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be positive".into(),
            ));
        }
        if self.admin.session_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "admin.session_ttl_minutes must be positive".into(),
            ));
        }
        Ok(())
    }
}
