//! SQLite connection and schema.
//!
//! Three tables back the domain: `products`, `invoices` and `invoice_items`.
//! Decimal values are stored as canonical text so they round-trip exactly;
//! timestamps are RFC 3339 text in UTC.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::repository::StoreResult;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        unit_price  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id          TEXT PRIMARY KEY,
        created_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice_items (
        id          TEXT PRIMARY KEY,
        invoice_id  TEXT NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
        position    INTEGER NOT NULL,
        product_id  TEXT NOT NULL,
        quantity    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS invoice_items_by_invoice
        ON invoice_items (invoice_id, position)
    "#,
];

/// Open a connection pool, creating the database file if needed.
pub async fn connect(config: &DatabaseConfig) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections.max(1));
    if config.is_in_memory() {
        // Closing the only connection would drop the database.
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(url = %config.url, "database connected");
    Ok(pool)
}

/// Create the tables if they do not exist. Safe to run on every start.
pub async fn migrate(pool: &SqlitePool) -> StoreResult<()> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    Ok(())
}

/// `connect` followed by `migrate`.
pub async fn open(config: &DatabaseConfig) -> StoreResult<SqlitePool> {
    let pool = connect(config).await?;
    migrate(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn migrate_creates_three_tables_and_is_idempotent() {
        let pool = open(&DatabaseConfig::in_memory()).await.unwrap();
        migrate(&pool).await.unwrap();

        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let tables: Vec<String> = rows.iter().map(|r| r.get::<String, _>("name")).collect();

        assert_eq!(tables, vec!["invoice_items", "invoices", "products"]);
    }
}
