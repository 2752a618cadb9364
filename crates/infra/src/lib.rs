//! Infrastructure layer: database configuration, schema and repositories.
//!
//! Entities in the domain crates know nothing about storage; this crate maps
//! them onto a local single-file SQLite database through repository traits.

pub mod config;
pub mod db;
pub mod repository;

pub use config::DatabaseConfig;
pub use repository::{
    InMemoryStore, InvoiceRepository, ProductRepository, SqliteStore, StoreError, StoreResult,
};
