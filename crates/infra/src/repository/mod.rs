//! Repository seams between the domain and storage.

pub mod in_memory;
pub mod sqlite;

use thiserror::Error;

use invoicer_core::{DomainError, InvoiceId, ProductId};
use invoicer_invoicing::Invoice;
use invoicer_products::{Catalog, Product};

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error.
///
/// These are **infrastructure errors**. A row that decodes but breaks a domain
/// rule surfaces as `Domain`; a value that cannot be decoded at all is `Corrupt`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt value in column {column}: {detail}")]
    Corrupt {
        column: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn corrupt(column: &'static str, detail: impl ToString) -> Self {
        Self::Corrupt {
            column,
            detail: detail.to_string(),
        }
    }
}

/// Persistence for catalog products.
#[async_trait::async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert or replace a product.
    async fn save_product(&self, product: &Product) -> StoreResult<()>;

    async fn load_product(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// All products, ordered by name.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// Build an in-memory catalog from every stored product.
    async fn load_catalog(&self) -> StoreResult<Catalog> {
        Ok(Catalog::try_from_products(self.list_products().await?)?)
    }
}

/// Persistence for invoices and their lines.
#[async_trait::async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert or replace an invoice together with its lines, atomically.
    async fn save_invoice(&self, invoice: &Invoice) -> StoreResult<()>;

    async fn load_invoice(&self, id: InvoiceId) -> StoreResult<Option<Invoice>>;

    /// All invoices in creation order, lines in invoice order.
    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>>;
}
