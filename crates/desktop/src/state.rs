//! Shared application state behind the Tauri commands.
//!
//! Every operation holds the session lock until it returns, store writes
//! included, so operations run one at a time like events on a single UI
//! thread and the database never sees an older snapshot after a newer one.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use invoicer_core::{DomainError, InvoiceId, InvoiceItemId, Money, ProductId, Quantity};
use invoicer_infra::{InvoiceRepository, ProductRepository, SqliteStore, StoreError};
use invoicer_products::Product;

use crate::session::InvoiceSession;
use crate::types::{InvoiceSummary, InvoiceView, ProductView};

/// Error returned to the frontend (serialized as its message).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Serialize for CommandError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Application state shared across Tauri commands.
pub struct AppState {
    session: Mutex<InvoiceSession>,
    store: SqliteStore,
}

impl AppState {
    pub fn new(session: InvoiceSession, store: SqliteStore) -> Self {
        Self {
            session: Mutex::new(session),
            store,
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub async fn current_invoice(&self) -> CommandResult<InvoiceView> {
        let session = self.session.lock().await;
        Ok(session.view()?)
    }

    /// Discard the displayed invoice and start an empty one.
    pub async fn new_invoice(&self) -> CommandResult<InvoiceView> {
        let mut session = self.session.lock().await;
        session.start_new_invoice();
        Ok(session.view()?)
    }

    pub async fn list_invoices(&self) -> CommandResult<Vec<InvoiceSummary>> {
        let session = self.session.lock().await;
        Ok(session.invoices()?)
    }

    /// Show another invoice (e.g. one restored from storage).
    pub async fn open_invoice(&self, invoice_id: &str) -> CommandResult<InvoiceView> {
        let invoice_id: InvoiceId = invoice_id.parse()?;

        let mut session = self.session.lock().await;
        session.switch_to(invoice_id)?;
        Ok(session.view()?)
    }

    pub async fn add_item(&self, product_id: &str, quantity: &str) -> CommandResult<InvoiceView> {
        let product_id: ProductId = product_id.parse()?;
        let quantity: Quantity = quantity.parse()?;

        let mut session = self.session.lock().await;
        let item_id = session.add_item(product_id, quantity)?;
        tracing::info!(%item_id, %product_id, %quantity, "line added");
        Ok(session.view()?)
    }

    pub async fn remove_item(&self, item_id: &str) -> CommandResult<InvoiceView> {
        let item_id: InvoiceItemId = item_id.parse()?;

        let mut session = self.session.lock().await;
        session.remove_item(item_id)?;
        Ok(session.view()?)
    }

    pub async fn set_quantity(&self, item_id: &str, quantity: &str) -> CommandResult<InvoiceView> {
        let item_id: InvoiceItemId = item_id.parse()?;
        let quantity: Quantity = quantity.parse()?;

        let mut session = self.session.lock().await;
        session.set_quantity(item_id, quantity)?;
        Ok(session.view()?)
    }

    /// Current total as localized currency text.
    pub async fn refresh_total(&self) -> CommandResult<String> {
        let session = self.session.lock().await;
        Ok(session.refresh_total()?)
    }

    pub async fn list_products(&self) -> CommandResult<Vec<ProductView>> {
        let session = self.session.lock().await;
        Ok(session.products())
    }

    /// Create a catalog product and persist it.
    pub async fn add_product(&self, name: String, unit_price: &str) -> CommandResult<ProductView> {
        let unit_price: Money = unit_price.parse()?;
        let product = Product::new(ProductId::new(), name, unit_price)?;

        let mut session = self.session.lock().await;
        self.store.save_product(&product).await?;
        let view = session.product_view(&product);
        session.add_product(product)?;
        Ok(view)
    }

    /// Change a unit price; open invoices show it on their next read.
    pub async fn update_price(&self, product_id: &str, unit_price: &str) -> CommandResult<ProductView> {
        let product_id: ProductId = product_id.parse()?;
        let unit_price: Money = unit_price.parse()?;

        let mut session = self.session.lock().await;
        let mut product = session
            .catalog()
            .get(&product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
        product.set_unit_price(unit_price)?;

        self.store.save_product(&product).await?;
        session.update_price(product_id, unit_price)?;
        tracing::info!(%product_id, %unit_price, "price updated");
        Ok(session.product_view(&product))
    }

    /// Persist the current invoice and its lines.
    pub async fn save_invoice(&self) -> CommandResult<InvoiceView> {
        let session = self.session.lock().await;
        self.store.save_invoice(session.current()?).await?;
        Ok(session.view()?)
    }
}
