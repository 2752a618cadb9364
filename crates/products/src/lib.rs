//! Products domain module.
//!
//! This crate contains the catalog side of invoicing: products with a unit
//! price, and the lookup seam invoice lines resolve prices through. Pure
//! domain logic (no IO, no storage).

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, ProductCatalog};
pub use product::Product;
