//! `invoicer-core`: domain building blocks shared by the invoicing crates.
//!
//! This crate contains **pure domain** primitives (no storage, no UI).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{InvoiceId, InvoiceItemId, ProductId};
pub use money::{Money, Quantity};
pub use value_object::ValueObject;
