//! `invoicer-desktop`
//!
//! **Responsibility:** the invoice window.
//!
//! This crate provides:
//! - An editing session that always has a current invoice
//! - Localized currency text for totals and prices
//! - Tauri commands over the session and the local SQLite store
//! - A Leptos frontend (WASM) that renders the window
//!
//! The window keeps no state of its own; everything it shows comes from the
//! session via commands.

pub mod format;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod state;

#[cfg(all(feature = "tauri", not(target_arch = "wasm32")))]
pub mod commands;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use format::{CurrencyFormat, SymbolPosition};
pub use types::{InvoiceItemRow, InvoiceSummary, InvoiceView, ProductView};

#[cfg(not(target_arch = "wasm32"))]
pub use config::DesktopConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use session::InvoiceSession;
#[cfg(not(target_arch = "wasm32"))]
pub use state::{AppState, CommandError};
