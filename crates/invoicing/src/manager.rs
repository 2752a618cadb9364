//! Invoice registry for the running process.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use invoicer_core::{DomainError, DomainResult, InvoiceId, InvoiceItemId, Money};
use invoicer_products::ProductCatalog;

use crate::invoice::Invoice;
use crate::invoice_item::InvoiceItem;

/// Owns every invoice created during the session, in creation order.
///
/// This is the single source of truth for invoices: callers create invoices
/// through the manager and refer to them by id afterwards.
#[derive(Debug, Default)]
pub struct InvoiceManager {
    invoices: Vec<Invoice>,
    index: HashMap<InvoiceId, usize>,
}

impl InvoiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty invoice stamped with the current time.
    pub fn create_invoice(&mut self) -> &mut Invoice {
        self.create_invoice_at(Utc::now())
    }

    /// Create an empty invoice stamped with `created_at`.
    pub fn create_invoice_at(&mut self, created_at: DateTime<Utc>) -> &mut Invoice {
        let invoice = Invoice::new(InvoiceId::new(), created_at);
        tracing::debug!(invoice_id = %invoice.id_typed(), "invoice created");
        self.push(invoice)
    }

    /// Register an existing invoice (e.g. one loaded from storage).
    pub fn insert(&mut self, invoice: Invoice) -> DomainResult<&mut Invoice> {
        let id = invoice.id_typed();
        if self.index.contains_key(&id) {
            return Err(DomainError::conflict(format!("invoice {id} already registered")));
        }
        Ok(self.push(invoice))
    }

    fn push(&mut self, invoice: Invoice) -> &mut Invoice {
        let pos = self.invoices.len();
        self.index.insert(invoice.id_typed(), pos);
        self.invoices.push(invoice);
        &mut self.invoices[pos]
    }

    /// Append `item` to the invoice with `invoice_id`.
    ///
    /// The item is not validated; only the invoice must be known.
    pub fn add_item_to_invoice(&mut self, invoice_id: InvoiceId, item: InvoiceItem) -> DomainResult<()> {
        let invoice = self.require_mut(invoice_id)?;
        let item_id = item.id_typed();
        invoice.push_item(item);
        tracing::debug!(%invoice_id, %item_id, "item added to invoice");
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        invoice_id: InvoiceId,
        item_id: InvoiceItemId,
    ) -> DomainResult<InvoiceItem> {
        self.require_mut(invoice_id)?.remove_item(item_id)
    }

    pub fn invoice_total<C: ProductCatalog + ?Sized>(
        &self,
        invoice_id: InvoiceId,
        catalog: &C,
    ) -> DomainResult<Money> {
        self.get(invoice_id)
            .ok_or_else(|| not_found(invoice_id))?
            .total(catalog)
    }

    pub fn get(&self, invoice_id: InvoiceId) -> Option<&Invoice> {
        self.index.get(&invoice_id).map(|&i| &self.invoices[i])
    }

    pub fn get_mut(&mut self, invoice_id: InvoiceId) -> Option<&mut Invoice> {
        match self.index.get(&invoice_id) {
            Some(&i) => Some(&mut self.invoices[i]),
            None => None,
        }
    }

    fn require_mut(&mut self, invoice_id: InvoiceId) -> DomainResult<&mut Invoice> {
        self.get_mut(invoice_id).ok_or_else(|| not_found(invoice_id))
    }

    /// All invoices in creation order.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}

fn not_found(invoice_id: InvoiceId) -> DomainError {
    DomainError::not_found(format!("invoice {invoice_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_core::{ProductId, Quantity};
    use invoicer_products::{Catalog, Product};
    use rust_decimal_macros::dec;

    fn apples() -> (Catalog, ProductId) {
        let product = Product::new(ProductId::new(), "Apples", Money::new(dec!(2.50))).unwrap();
        let id = product.id_typed();
        let mut catalog = Catalog::new();
        catalog.insert(product).unwrap();
        (catalog, id)
    }

    #[test]
    fn create_invoice_grows_collection_by_one() {
        let mut manager = InvoiceManager::new();
        assert!(manager.is_empty());

        let before = Utc::now();
        let invoice = manager.create_invoice();
        assert!(invoice.is_empty());
        assert!(invoice.created_at() >= before);
        assert_eq!(invoice.total(&Catalog::new()).unwrap(), Money::ZERO);

        assert_eq!(manager.len(), 1);
        manager.create_invoice();
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn invoices_are_listed_in_creation_order() {
        let mut manager = InvoiceManager::new();
        let first = manager.create_invoice().id_typed();
        let second = manager.create_invoice().id_typed();

        let ids: Vec<_> = manager.invoices().iter().map(Invoice::id_typed).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn add_item_appends_in_order() {
        let (catalog, product) = apples();
        let mut manager = InvoiceManager::new();
        let invoice_id = manager.create_invoice().id_typed();

        let a = InvoiceItem::new(invoice_id, product, Quantity::from(3));
        let b = InvoiceItem::new(invoice_id, product, Quantity::from(3));
        let (a_id, b_id) = (a.id_typed(), b.id_typed());

        manager.add_item_to_invoice(invoice_id, a).unwrap();
        manager.add_item_to_invoice(invoice_id, b).unwrap();

        let invoice = manager.get(invoice_id).unwrap();
        let ids: Vec<_> = invoice.items().iter().map(InvoiceItem::id_typed).collect();
        assert_eq!(ids, vec![a_id, b_id]);
        assert_eq!(
            manager.invoice_total(invoice_id, &catalog).unwrap(),
            Money::new(dec!(15.00))
        );
    }

    #[test]
    fn add_item_to_unknown_invoice_is_not_found() {
        let (_, product) = apples();
        let mut manager = InvoiceManager::new();
        let stray = InvoiceId::new();

        let err = manager
            .add_item_to_invoice(stray, InvoiceItem::new(stray, product, Quantity::from(1)))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut manager = InvoiceManager::new();
        let invoice = Invoice::new(InvoiceId::new(), Utc::now());

        manager.insert(invoice.clone()).unwrap();
        assert!(matches!(manager.insert(invoice), Err(DomainError::Conflict(_))));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn remove_item_through_manager() {
        let (catalog, product) = apples();
        let mut manager = InvoiceManager::new();
        let invoice_id = manager.create_invoice().id_typed();
        let item = InvoiceItem::new(invoice_id, product, Quantity::from(1));
        let item_id = item.id_typed();
        manager.add_item_to_invoice(invoice_id, item).unwrap();

        manager.remove_item(invoice_id, item_id).unwrap();
        assert_eq!(manager.invoice_total(invoice_id, &catalog).unwrap(), Money::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: appending never drops or reorders existing lines.
            #[test]
            fn appends_preserve_order(quantities in prop::collection::vec(-10i64..10i64, 0..30)) {
                let (_, product) = apples();
                let mut manager = InvoiceManager::new();
                let invoice_id = manager.create_invoice().id_typed();

                let mut expected = Vec::new();
                for q in quantities {
                    let item = InvoiceItem::new(invoice_id, product, Quantity::from(q));
                    expected.push(item.id_typed());
                    manager.add_item_to_invoice(invoice_id, item).unwrap();
                }

                let ids: Vec<_> = manager
                    .get(invoice_id)
                    .unwrap()
                    .items()
                    .iter()
                    .map(InvoiceItem::id_typed)
                    .collect();
                prop_assert_eq!(ids, expected);
            }
        }
    }
}
