//! Shared types for both backend and frontend (WASM-compatible).
//!
//! These are the shapes the window binds to. They must not depend on
//! backend-only dependencies like `tokio` or `sqlx`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invoicer_core::{InvoiceId, InvoiceItemId, Money, ProductId, Quantity};

/// One row of the invoice item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemRow {
    pub item_id: InvoiceItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: Quantity,
    /// Unit price as currency text.
    pub price: String,
    /// Line total as currency text.
    pub total: String,
}

/// The current invoice as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub invoice_id: InvoiceId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<InvoiceItemRow>,
    pub total_amount: Money,
    /// Total as currency text, e.g. `$15.00`.
    pub total: String,
}

/// Catalog entry as displayed in the product picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub price: String,
}

/// One entry of the invoice list (saved or created this session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub invoice_id: InvoiceId,
    pub created_at: DateTime<Utc>,
    pub item_count: usize,
    pub total: String,
    /// Whether this is the invoice the window shows.
    pub current: bool,
}
