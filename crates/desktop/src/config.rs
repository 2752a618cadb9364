//! Desktop configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `INVOICER_DATABASE_URL` | `<data dir>/invoicer/data.db` |
//! | `INVOICER_LOCALE` | `en-US` |
//! | `INVOICER_LOG_FORMAT` | `json` |

use std::path::PathBuf;

use anyhow::{Context, anyhow};

use invoicer_infra::DatabaseConfig;
use invoicer_observability::LogFormat;

use crate::format::CurrencyFormat;

pub const DATABASE_URL_VAR: &str = "INVOICER_DATABASE_URL";
pub const LOCALE_VAR: &str = "INVOICER_LOCALE";
pub const LOG_FORMAT_VAR: &str = "INVOICER_LOG_FORMAT";

pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    pub database: DatabaseConfig,
    pub locale: String,
    pub currency: CurrencyFormat,
    pub log_format: LogFormat,
}

impl DesktopConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup(DATABASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(url) => DatabaseConfig::new(url),
            None => default_database(),
        };

        let locale = lookup(LOCALE_VAR).unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let currency = CurrencyFormat::for_locale(&locale)
            .ok_or_else(|| anyhow!("unsupported locale {locale:?} in {LOCALE_VAR}"))?;

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {LOG_FORMAT_VAR}"))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            database,
            locale,
            currency,
            log_format,
        })
    }

    /// Create the parent directory of a file-backed database.
    pub fn prepare_storage(&self) -> anyhow::Result<()> {
        if self.database.is_in_memory() {
            return Ok(());
        }
        let path = self
            .database
            .url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create database directory at {parent:?}"))?;
            }
        }
        Ok(())
    }
}

/// `<OS data dir>/invoicer/data.db`, or `data.db` in the working directory
/// when the platform has no data directory.
fn default_database() -> DatabaseConfig {
    match default_database_path() {
        Some(path) => DatabaseConfig::file(path),
        None => {
            tracing::warn!("no OS data directory; using ./data.db");
            DatabaseConfig::default()
        }
    }
}

fn default_database_path() -> Option<PathBuf> {
    let mut dir = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    })?;
    dir.push("invoicer");
    dir.push("data.db");
    Some(dir)
}
