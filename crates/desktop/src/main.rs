//! Tauri application entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(feature = "tauri")]
use invoicer_desktop::AppState;
#[cfg(feature = "tauri")]
use invoicer_desktop::commands::*;

#[cfg(feature = "tauri")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use invoicer_desktop::{DesktopConfig, InvoiceSession};
    use invoicer_infra::SqliteStore;

    let config = DesktopConfig::from_env()?;
    invoicer_observability::init(config.log_format);

    config.prepare_storage()?;
    let store = SqliteStore::open(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    tracing::info!(database = %config.database.url, locale = %config.locale, "database ready");

    let session = InvoiceSession::load(&store, config.currency.clone()).await?;

    tauri::async_runtime::set(tokio::runtime::Handle::current());

    tauri::Builder::default()
        .manage(AppState::new(session, store))
        .invoke_handler(tauri::generate_handler![
            current_invoice,
            new_invoice,
            list_invoices,
            open_invoice,
            add_item,
            remove_item,
            set_quantity,
            refresh_total,
            list_products,
            add_product,
            update_price,
            save_invoice,
        ])
        .run(tauri::generate_context!())
        .context("error while running tauri application")?;

    Ok(())
}

#[cfg(not(feature = "tauri"))]
fn main() {
    eprintln!("This binary requires the 'tauri' feature to be enabled.");
    eprintln!("Build with: cargo build --features tauri");
    std::process::exit(1);
}
