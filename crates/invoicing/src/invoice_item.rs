use serde::{Deserialize, Serialize};

use invoicer_core::{
    DomainError, DomainResult, Entity, InvoiceId, InvoiceItemId, Money, ProductId, Quantity,
};
use invoicer_products::ProductCatalog;

/// One line of an invoice: a product reference and a quantity.
///
/// The line does not store a price. `price` and `total` read the referenced
/// product's current unit price from the catalog on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    id: InvoiceItemId,
    invoice_id: InvoiceId,
    product_id: ProductId,
    quantity: Quantity,
}

impl InvoiceItem {
    pub fn new(invoice_id: InvoiceId, product_id: ProductId, quantity: Quantity) -> Self {
        Self::with_id(InvoiceItemId::new(), invoice_id, product_id, quantity)
    }

    /// Rebuild a line with a known identifier (e.g. loaded from storage).
    pub fn with_id(
        id: InvoiceItemId,
        invoice_id: InvoiceId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            invoice_id,
            product_id,
            quantity,
        }
    }

    pub fn id_typed(&self) -> InvoiceItemId {
        self.id
    }

    pub fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Quantities are not validated; zero and negative values are kept as-is.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    pub(crate) fn attach_to(&mut self, invoice_id: InvoiceId) {
        self.invoice_id = invoice_id;
    }

    /// Current unit price of the referenced product.
    pub fn price<C: ProductCatalog + ?Sized>(&self, catalog: &C) -> DomainResult<Money> {
        catalog
            .find(&self.product_id)
            .map(|p| p.unit_price())
            .ok_or_else(|| DomainError::not_found(format!("product {}", self.product_id)))
    }

    /// `quantity × price`, using the price at read time.
    pub fn total<C: ProductCatalog + ?Sized>(&self, catalog: &C) -> DomainResult<Money> {
        self.price(catalog)?
            .checked_mul(self.quantity)
            .ok_or_else(|| DomainError::invariant("invoice line amount overflow"))
    }
}

impl Entity for InvoiceItem {
    type Id = InvoiceItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
