use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invoicer_core::{
    DomainError, DomainResult, Entity, InvoiceId, InvoiceItemId, Money, ProductId, Quantity,
};
use invoicer_products::ProductCatalog;

use crate::invoice_item::InvoiceItem;

/// Invoice: a dated, ordered list of lines.
///
/// The invoice owns its lines. The total is not stored; `total` recomputes it
/// from the lines and the catalog on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InvoiceRecord")]
pub struct Invoice {
    id: InvoiceId,
    created_at: DateTime<Utc>,
    items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn new(id: InvoiceId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            items: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> InvoiceId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, item_id: InvoiceItemId) -> Option<&InvoiceItem> {
        self.items.iter().find(|i| i.id_typed() == item_id)
    }

    pub fn item_mut(&mut self, item_id: InvoiceItemId) -> Option<&mut InvoiceItem> {
        self.items.iter_mut().find(|i| i.id_typed() == item_id)
    }

    /// Append a line at the end. The line is re-attached to this invoice.
    pub fn push_item(&mut self, mut item: InvoiceItem) {
        item.attach_to(self.id);
        self.items.push(item);
    }

    /// Build and append a new line for `product_id`.
    pub fn add_line(&mut self, product_id: ProductId, quantity: Quantity) -> &InvoiceItem {
        self.push_item(InvoiceItem::new(self.id, product_id, quantity));
        &self.items[self.items.len() - 1]
    }

    /// Remove a line; the remaining lines keep their order.
    pub fn remove_item(&mut self, item_id: InvoiceItemId) -> DomainResult<InvoiceItem> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id_typed() == item_id)
            .ok_or_else(|| DomainError::not_found(format!("invoice item {item_id}")))?;
        Ok(self.items.remove(pos))
    }

    /// Sum of line totals at current catalog prices (`0` when empty).
    pub fn total<C: ProductCatalog + ?Sized>(&self, catalog: &C) -> DomainResult<Money> {
        self.items.iter().try_fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.total(catalog)?)
                .ok_or_else(|| DomainError::invariant("invoice total overflow"))
        })
    }
}

/// Wire shape of an invoice; lines are re-attached on the way in.
#[derive(Deserialize)]
struct InvoiceRecord {
    id: InvoiceId,
    created_at: DateTime<Utc>,
    items: Vec<InvoiceItem>,
}

impl From<InvoiceRecord> for Invoice {
    fn from(record: InvoiceRecord) -> Self {
        let mut invoice = Invoice::new(record.id, record.created_at);
        for item in record.items {
            invoice.push_item(item);
        }
        invoice
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
