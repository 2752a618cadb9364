//! Database configuration.

use std::path::Path;

/// Connection target for the invoice database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://data.db` or `sqlite::memory:`.
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub const DEFAULT_URL: &'static str = "sqlite://data.db";

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Database stored in the file at `path` (created on first connect).
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::new(format!("sqlite://{}", path.as_ref().to_string_lossy()))
    }

    /// Private in-memory database. A single connection, since every SQLite
    /// connection to `:memory:` opens a distinct database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
            max_connections: 4,
        }
    }
}
