//! Tauri commands for frontend integration.

use tauri::State;

use crate::state::{AppState, CommandResult};
use crate::types::{InvoiceSummary, InvoiceView, ProductView};

#[tauri::command]
pub async fn current_invoice(state: State<'_, AppState>) -> CommandResult<InvoiceView> {
    state.current_invoice().await
}

#[tauri::command]
pub async fn new_invoice(state: State<'_, AppState>) -> CommandResult<InvoiceView> {
    state.new_invoice().await
}

#[tauri::command]
pub async fn list_invoices(state: State<'_, AppState>) -> CommandResult<Vec<InvoiceSummary>> {
    state.list_invoices().await
}

#[tauri::command]
pub async fn open_invoice(invoice_id: String, state: State<'_, AppState>) -> CommandResult<InvoiceView> {
    state.open_invoice(&invoice_id).await
}

#[tauri::command]
pub async fn add_item(
    product_id: String,
    quantity: String,
    state: State<'_, AppState>,
) -> CommandResult<InvoiceView> {
    state.add_item(&product_id, &quantity).await
}

#[tauri::command]
pub async fn remove_item(item_id: String, state: State<'_, AppState>) -> CommandResult<InvoiceView> {
    state.remove_item(&item_id).await
}

#[tauri::command]
pub async fn set_quantity(
    item_id: String,
    quantity: String,
    state: State<'_, AppState>,
) -> CommandResult<InvoiceView> {
    state.set_quantity(&item_id, &quantity).await
}

#[tauri::command]
pub async fn refresh_total(state: State<'_, AppState>) -> CommandResult<String> {
    state.refresh_total().await
}

#[tauri::command]
pub async fn list_products(state: State<'_, AppState>) -> CommandResult<Vec<ProductView>> {
    state.list_products().await
}

#[tauri::command]
pub async fn add_product(
    name: String,
    unit_price: String,
    state: State<'_, AppState>,
) -> CommandResult<ProductView> {
    state.add_product(name, &unit_price).await
}

#[tauri::command]
pub async fn update_price(
    product_id: String,
    unit_price: String,
    state: State<'_, AppState>,
) -> CommandResult<ProductView> {
    state.update_price(&product_id, &unit_price).await
}

#[tauri::command]
pub async fn save_invoice(state: State<'_, AppState>) -> CommandResult<InvoiceView> {
    state.save_invoice().await
}
