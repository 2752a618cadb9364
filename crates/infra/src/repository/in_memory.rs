use std::collections::HashMap;
use std::sync::RwLock;

use invoicer_core::{InvoiceId, ProductId};
use invoicer_invoicing::Invoice;
use invoicer_products::Product;

use super::{InvoiceRepository, ProductRepository, StoreError, StoreResult};

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<ProductId, Product>>,
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryStore {
    async fn save_product(&self, product: &Product) -> StoreResult<()> {
        let mut map = self.products.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(product.id_typed(), product.clone());
        Ok(())
    }

    async fn load_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let map = self.products.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let map = self.products.read().map_err(|_| StoreError::Poisoned)?;
        let mut products: Vec<Product> = map.values().cloned().collect();
        products.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.id_typed().as_uuid().cmp(b.id_typed().as_uuid()))
        });
        Ok(products)
    }
}

#[async_trait::async_trait]
impl InvoiceRepository for InMemoryStore {
    async fn save_invoice(&self, invoice: &Invoice) -> StoreResult<()> {
        let mut map = self.invoices.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(invoice.id_typed(), invoice.clone());
        Ok(())
    }

    async fn load_invoice(&self, id: InvoiceId) -> StoreResult<Option<Invoice>> {
        let map = self.invoices.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn list_invoices(&self) -> StoreResult<Vec<Invoice>> {
        let map = self.invoices.read().map_err(|_| StoreError::Poisoned)?;
        let mut invoices: Vec<Invoice> = map.values().cloned().collect();
        invoices.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id_typed().as_uuid().cmp(b.id_typed().as_uuid()))
        });
        Ok(invoices)
    }
}
