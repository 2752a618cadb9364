//! Invoicing domain module.
//!
//! Invoices, their lines and the manager that owns them, implemented as
//! deterministic domain logic (no IO or storage). Line prices are
//! resolved through a [`invoicer_products::ProductCatalog`] when totals are read.

pub mod invoice;
pub mod invoice_item;
pub mod manager;

pub use invoice::Invoice;
pub use invoice_item::InvoiceItem;
pub use manager::InvoiceManager;
