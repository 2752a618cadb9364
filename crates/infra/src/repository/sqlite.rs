//! SQLite-backed repositories.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

use invoicer_core::{InvoiceId, InvoiceItemId, Money, ProductId, Quantity};
use invoicer_invoicing::{Invoice, InvoiceItem};
use invoicer_products::Product;

use super::{InvoiceRepository, ProductRepository, StoreError, StoreResult};
use crate::config::DatabaseConfig;

/// Product and invoice repository over a SQLite pool.
///
/// `SqlitePool` is cheap to clone and `Send + Sync`, so the store can be
/// shared freely.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool. The schema must already exist (`db::migrate`).
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and migrate.
    pub async fn open(config: &DatabaseConfig) -> StoreResult<Self> {
        Ok(Self::new(crate::db::open(config).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqliteStore {
    async fn save_product(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, unit_price)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                unit_price = excluded.unit_price
            "#,
        )
        .bind(product.id_typed().to_string())
        .bind(product.name())
        .bind(product.unit_price().to_string())
        .execute(&self.pool)
        .await?;

        tracing::debug!(product_id = %product.id_typed(), "product saved");
        Ok(())
    }

    async fn load_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, unit_price FROM products WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, unit_price FROM products ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(product_from_row).collect()
    }
}

#[async_trait::async_trait]
impl InvoiceRepository for SqliteStore {
    async fn save_invoice(&self, invoice: &Invoice) -> StoreResult<()> {
        let invoice_id = invoice.id_typed().to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (id, created_at)
            VALUES (?1, ?2)
            ON CONFLICT (id) DO UPDATE SET created_at = excluded.created_at
            "#,
        )
        .bind(&invoice_id)
        .bind(encode_timestamp(invoice.created_at()))
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(&invoice_id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in invoice.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (id, invoice_id, position, product_id, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(item.id_typed().to_string())
            .bind(&invoice_id)
            .bind(position as i64)
            .bind(item.product_id().to_string())
            .bind(item.quantity().to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(%invoice_id, items = invoice.len(), "invoice saved");
        Ok(())
    }

    async fn load_invoice(&self, id: InvoiceId) -> StoreResult<Option<Invoice>> {
        let header = sqlx::query("SELECT id, created_at FROM invoices WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(header) = header else {
            return Ok(None);
        };
        let mut invoice = invoice_from_row(&header)?;

        let rows = sqlx::query(
            r#"
            SELECT id, invoice_id, product_id, quantity
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        for row in &rows {
            invoice.push_item(item_from_row(row)?);
        }

        Ok(Some(invoice))
    }

    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        let headers = sqlx::query("SELECT id, created_at FROM invoices ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        let mut invoices = headers
            .iter()
            .map(invoice_from_row)
            .collect::<StoreResult<Vec<_>>>()?;

        let rows = sqlx::query(
            r#"
            SELECT id, invoice_id, product_id, quantity
            FROM invoice_items
            ORDER BY invoice_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let positions: HashMap<InvoiceId, usize> = invoices
            .iter()
            .enumerate()
            .map(|(i, inv)| (inv.id_typed(), i))
            .collect();

        for row in &rows {
            let item = item_from_row(row)?;
            match positions.get(&item.invoice_id()) {
                Some(&i) => invoices[i].push_item(item),
                None => {
                    return Err(StoreError::corrupt(
                        "invoice_items.invoice_id",
                        format!("line {} has no invoice", item.id_typed()),
                    ));
                }
            }
        }

        Ok(invoices)
    }
}

fn encode_timestamp(ts: DateTime<Utc>) -> String {
    // Fixed-width so that text ordering matches time ordering.
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_timestamp(column: &'static str, raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(column, e))
}

fn text(row: &SqliteRow, column: &'static str) -> StoreResult<String> {
    Ok(row.try_get::<String, _>(column)?)
}

fn parse<T>(row: &SqliteRow, column: &'static str, qualified: &'static str) -> StoreResult<T>
where
    T: FromStr,
    T::Err: ToString,
{
    text(row, column)?
        .parse::<T>()
        .map_err(|e| StoreError::corrupt(qualified, e))
}

fn product_from_row(row: &SqliteRow) -> StoreResult<Product> {
    let id: ProductId = parse(row, "id", "products.id")?;
    let name = text(row, "name")?;
    let unit_price: Money = parse(row, "unit_price", "products.unit_price")?;

    Ok(Product::new(id, name, unit_price)?)
}

fn invoice_from_row(row: &SqliteRow) -> StoreResult<Invoice> {
    let id: InvoiceId = parse(row, "id", "invoices.id")?;
    let created_at = decode_timestamp("invoices.created_at", &text(row, "created_at")?)?;

    Ok(Invoice::new(id, created_at))
}

fn item_from_row(row: &SqliteRow) -> StoreResult<InvoiceItem> {
    let id: InvoiceItemId = parse(row, "id", "invoice_items.id")?;
    let invoice_id: InvoiceId = parse(row, "invoice_id", "invoice_items.invoice_id")?;
    let product_id: ProductId = parse(row, "product_id", "invoice_items.product_id")?;
    let quantity: Quantity = parse(row, "quantity", "invoice_items.quantity")?;

    Ok(InvoiceItem::with_id(id, invoice_id, product_id, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use invoicer_products::Catalog;
    use rust_decimal_macros::dec;

    async fn store() -> SqliteStore {
        SqliteStore::open(&DatabaseConfig::in_memory()).await.unwrap()
    }

    fn apples() -> Product {
        Product::new(ProductId::new(), "Apples", Money::new(dec!(2.50))).unwrap()
    }

    #[tokio::test]
    async fn product_round_trip_keeps_exact_price() {
        let store = store().await;
        let product = apples();
        store.save_product(&product).await.unwrap();

        let loaded = store.load_product(product.id_typed()).await.unwrap().unwrap();
        assert_eq!(loaded, product);
        assert_eq!(loaded.unit_price().to_string(), "2.50");
    }

    #[tokio::test]
    async fn save_product_upserts() {
        let store = store().await;
        let mut product = apples();
        store.save_product(&product).await.unwrap();

        product.set_unit_price(Money::new(dec!(2.75))).unwrap();
        store.save_product(&product).await.unwrap();

        let all = store.list_products().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].unit_price(), Money::new(dec!(2.75)));
    }

    #[tokio::test]
    async fn missing_rows_load_as_none() {
        let store = store().await;
        assert!(store.load_product(ProductId::new()).await.unwrap().is_none());
        assert!(store.load_invoice(InvoiceId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invoice_round_trip_preserves_lines_and_total() {
        let store = store().await;
        let product = apples();
        store.save_product(&product).await.unwrap();

        let mut invoice = Invoice::new(InvoiceId::new(), Utc::now());
        invoice.add_line(product.id_typed(), Quantity::from(3));
        invoice.add_line(product.id_typed(), Quantity::new(dec!(1.5)));
        invoice.add_line(product.id_typed(), Quantity::from(-1));
        store.save_invoice(&invoice).await.unwrap();

        let loaded = store.load_invoice(invoice.id_typed()).await.unwrap().unwrap();
        assert_eq!(loaded, invoice);

        let catalog: Catalog = store.load_catalog().await.unwrap();
        assert_eq!(loaded.total(&catalog).unwrap(), Money::new(dec!(8.75)));
    }

    #[tokio::test]
    async fn resaving_replaces_lines() {
        let store = store().await;
        let product = apples();
        let mut invoice = Invoice::new(InvoiceId::new(), Utc::now());
        let first = invoice.add_line(product.id_typed(), Quantity::from(1)).id_typed();
        invoice.add_line(product.id_typed(), Quantity::from(2));
        store.save_invoice(&invoice).await.unwrap();

        invoice.remove_item(first).unwrap();
        store.save_invoice(&invoice).await.unwrap();

        let loaded = store.load_invoice(invoice.id_typed()).await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.items()[0].quantity(), Quantity::from(2));
    }

    #[tokio::test]
    async fn list_invoices_in_creation_order_with_their_lines() {
        let store = store().await;
        let product = apples();
        let now = Utc::now();

        let mut later = Invoice::new(InvoiceId::new(), now + Duration::milliseconds(1));
        later.add_line(product.id_typed(), Quantity::from(1));
        let mut earlier = Invoice::new(InvoiceId::new(), now);
        earlier.add_line(product.id_typed(), Quantity::from(2));
        earlier.add_line(product.id_typed(), Quantity::from(3));

        store.save_invoice(&later).await.unwrap();
        store.save_invoice(&earlier).await.unwrap();

        let listed = store.list_invoices().await.unwrap();
        assert_eq!(listed, vec![earlier, later]);
    }

    #[tokio::test]
    async fn corrupt_price_is_reported() {
        let store = store().await;
        sqlx::query("INSERT INTO products (id, name, unit_price) VALUES (?1, 'Bad', 'abc')")
            .bind(ProductId::new().to_string())
            .execute(store.pool())
            .await
            .unwrap();

        match store.list_products().await.unwrap_err() {
            StoreError::Corrupt { column, .. } => assert_eq!(column, "products.unit_price"),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn negative_stored_price_is_a_domain_error() {
        let store = store().await;
        sqlx::query("INSERT INTO products (id, name, unit_price) VALUES (?1, 'Bad', '-1')")
            .bind(ProductId::new().to_string())
            .execute(store.pool())
            .await
            .unwrap();

        assert!(matches!(
            store.list_products().await.unwrap_err(),
            StoreError::Domain(_)
        ));
    }
}
