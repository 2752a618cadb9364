//! API bindings using Tauri's invoke system via JavaScript.
//!
//! Argument keys are camelCase; Tauri maps them onto the snake_case
//! parameters of the commands.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use crate::types::{InvoiceSummary, InvoiceView, ProductView};

/// Call `window.__TAURI__.core.invoke(cmd, args)` and decode the result.
async fn invoke_tauri<T>(cmd: &str, args: JsValue) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    let window = window().ok_or_else(|| "No window object".to_string())?;

    let tauri_obj = js_sys::Reflect::get(&window, &JsValue::from_str("__TAURI__"))
        .map_err(|e| format!("Failed to get __TAURI__: {:?}", e))?;

    let core = js_sys::Reflect::get(&tauri_obj, &JsValue::from_str("core"))
        .map_err(|e| format!("Failed to get core: {:?}", e))?;

    let invoke_fn = js_sys::Reflect::get(&core, &JsValue::from_str("invoke"))
        .map_err(|e| format!("Failed to get invoke: {:?}", e))?;

    let invoke_function = js_sys::Function::from(invoke_fn);
    let promise = invoke_function
        .call2(&core, &JsValue::from_str(cmd), &args)
        .map_err(|e| format!("Failed to call invoke: {:?}", e))?;

    // Rejections carry the command error as a plain string.
    let result = JsFuture::from(js_sys::Promise::from(promise))
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))?;

    serde_wasm_bindgen::from_value(result)
        .map_err(|e| format!("Failed to deserialize result: {:?}", e))
}

fn to_args(value: serde_json::Value) -> Result<JsValue, String> {
    serde_wasm_bindgen::to_value(&value).map_err(|e| format!("Failed to serialize args: {:?}", e))
}

fn no_args() -> JsValue {
    js_sys::Object::new().into()
}

pub async fn current_invoice() -> Result<InvoiceView, String> {
    invoke_tauri("current_invoice", no_args()).await
}

/// Start a new, empty invoice; the previous one is no longer shown.
pub async fn new_invoice() -> Result<InvoiceView, String> {
    invoke_tauri("new_invoice", no_args()).await
}

/// Saved invoices and those created in this session, oldest first.
pub async fn list_invoices() -> Result<Vec<InvoiceSummary>, String> {
    invoke_tauri("list_invoices", no_args()).await
}

pub async fn open_invoice(invoice_id: String) -> Result<InvoiceView, String> {
    let args = to_args(serde_json::json!({ "invoiceId": invoice_id }))?;
    invoke_tauri("open_invoice", args).await
}

pub async fn add_item(product_id: String, quantity: String) -> Result<InvoiceView, String> {
    let args = to_args(serde_json::json!({
        "productId": product_id,
        "quantity": quantity
    }))?;
    invoke_tauri("add_item", args).await
}

pub async fn remove_item(item_id: String) -> Result<InvoiceView, String> {
    let args = to_args(serde_json::json!({ "itemId": item_id }))?;
    invoke_tauri("remove_item", args).await
}

pub async fn set_quantity(item_id: String, quantity: String) -> Result<InvoiceView, String> {
    let args = to_args(serde_json::json!({
        "itemId": item_id,
        "quantity": quantity
    }))?;
    invoke_tauri("set_quantity", args).await
}

/// Current total as currency text.
pub async fn refresh_total() -> Result<String, String> {
    invoke_tauri("refresh_total", no_args()).await
}

pub async fn list_products() -> Result<Vec<ProductView>, String> {
    invoke_tauri("list_products", no_args()).await
}

pub async fn add_product(name: String, unit_price: String) -> Result<ProductView, String> {
    let args = to_args(serde_json::json!({
        "name": name,
        "unitPrice": unit_price
    }))?;
    invoke_tauri("add_product", args).await
}

pub async fn update_price(product_id: String, unit_price: String) -> Result<ProductView, String> {
    let args = to_args(serde_json::json!({
        "productId": product_id,
        "unitPrice": unit_price
    }))?;
    invoke_tauri("update_price", args).await
}

pub async fn save_invoice() -> Result<InvoiceView, String> {
    invoke_tauri("save_invoice", no_args()).await
}
