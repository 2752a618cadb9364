//! Leptos frontend for the Tauri desktop app.

pub mod api;
pub mod app;

use wasm_bindgen::prelude::*;

/// WASM entry point for the frontend.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(app::App);
}
