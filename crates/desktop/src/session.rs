//! Invoice editing session (view-model behind the window).
//!
//! The window holds no invoice state of its own. Every handler receives the
//! session, which always has a current invoice: one is created on
//! construction, so there is no "no invoice yet" state.

use invoicer_core::{
    DomainError, DomainResult, InvoiceId, InvoiceItemId, Money, ProductId, Quantity,
};
use invoicer_invoicing::{Invoice, InvoiceItem, InvoiceManager};
use invoicer_infra::{InvoiceRepository, ProductRepository};
use invoicer_products::{Catalog, Product, ProductCatalog};

use crate::format::CurrencyFormat;
use crate::types::{InvoiceItemRow, InvoiceSummary, InvoiceView, ProductView};

#[derive(Debug)]
pub struct InvoiceSession {
    manager: InvoiceManager,
    catalog: Catalog,
    current: InvoiceId,
    currency: CurrencyFormat,
}

impl InvoiceSession {
    pub fn new(catalog: Catalog, currency: CurrencyFormat) -> Self {
        Self::with_manager(InvoiceManager::new(), catalog, currency)
    }

    /// Resume with an existing manager; a fresh invoice becomes current.
    pub fn with_manager(mut manager: InvoiceManager, catalog: Catalog, currency: CurrencyFormat) -> Self {
        let current = manager.create_invoice().id_typed();
        Self {
            manager,
            catalog,
            current,
            currency,
        }
    }

    /// Restore the stored catalog and invoices, then start a fresh invoice.
    ///
    /// Saved invoices are registered in the manager in creation order and can
    /// be reopened with [`switch_to`](Self::switch_to).
    pub async fn load<R>(repo: &R, currency: CurrencyFormat) -> anyhow::Result<Self>
    where
        R: ProductRepository + InvoiceRepository + ?Sized,
    {
        let catalog = repo.load_catalog().await?;
        let mut manager = InvoiceManager::new();
        for invoice in repo.list_invoices().await? {
            manager.insert(invoice)?;
        }
        tracing::info!(
            products = catalog.len(),
            invoices = manager.len(),
            "session restored"
        );
        Ok(Self::with_manager(manager, catalog, currency))
    }

    pub fn current(&self) -> DomainResult<&Invoice> {
        self.manager
            .get(self.current)
            .ok_or_else(|| DomainError::not_found(format!("invoice {}", self.current)))
    }

    pub fn current_id(&self) -> InvoiceId {
        self.current
    }

    pub fn manager(&self) -> &InvoiceManager {
        &self.manager
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Replace the current invoice with a new, empty one.
    ///
    /// The previous invoice stays in the manager but is no longer displayed.
    /// Nothing is saved.
    pub fn start_new_invoice(&mut self) -> InvoiceId {
        let previous = self.current;
        self.current = self.manager.create_invoice().id_typed();
        tracing::info!(%previous, current = %self.current, "started new invoice");
        self.current
    }

    /// Make another invoice of the manager current.
    pub fn switch_to(&mut self, invoice_id: InvoiceId) -> DomainResult<()> {
        if self.manager.get(invoice_id).is_none() {
            return Err(DomainError::not_found(format!("invoice {invoice_id}")));
        }
        self.current = invoice_id;
        Ok(())
    }

    /// Add a product to the catalog.
    pub fn add_product(&mut self, product: Product) -> DomainResult<()> {
        self.catalog.insert(product)
    }

    pub fn update_price(&mut self, product_id: ProductId, unit_price: Money) -> DomainResult<()> {
        self.catalog.update_price(&product_id, unit_price)
    }

    /// Append a line for `product_id` to the current invoice.
    pub fn add_item(&mut self, product_id: ProductId, quantity: Quantity) -> DomainResult<InvoiceItemId> {
        if self.catalog.find(&product_id).is_none() {
            return Err(DomainError::not_found(format!("product {product_id}")));
        }
        let item = InvoiceItem::new(self.current, product_id, quantity);
        let item_id = item.id_typed();
        self.manager.add_item_to_invoice(self.current, item)?;
        Ok(item_id)
    }

    pub fn remove_item(&mut self, item_id: InvoiceItemId) -> DomainResult<()> {
        self.manager.remove_item(self.current, item_id)?;
        Ok(())
    }

    pub fn set_quantity(&mut self, item_id: InvoiceItemId, quantity: Quantity) -> DomainResult<()> {
        let invoice = self
            .manager
            .get_mut(self.current)
            .ok_or_else(|| DomainError::not_found(format!("invoice {}", self.current)))?;
        let item = invoice
            .item_mut(item_id)
            .ok_or_else(|| DomainError::not_found(format!("invoice item {item_id}")))?;
        item.set_quantity(quantity);
        Ok(())
    }

    pub fn total(&self) -> DomainResult<Money> {
        self.current()?.total(&self.catalog)
    }

    /// Current invoice total as localized currency text.
    pub fn refresh_total(&self) -> DomainResult<String> {
        Ok(self.currency.format(self.total()?))
    }

    /// Everything the window displays for the current invoice.
    pub fn view(&self) -> DomainResult<InvoiceView> {
        let invoice = self.current()?;
        let items = invoice
            .items()
            .iter()
            .map(|item| self.row(item))
            .collect::<DomainResult<Vec<_>>>()?;
        let total_amount = invoice.total(&self.catalog)?;

        Ok(InvoiceView {
            invoice_id: invoice.id_typed(),
            created_at: invoice.created_at(),
            items,
            total_amount,
            total: self.currency.format(total_amount),
        })
    }

    /// Every invoice of the manager, oldest first.
    pub fn invoices(&self) -> DomainResult<Vec<InvoiceSummary>> {
        self.manager
            .invoices()
            .iter()
            .map(|invoice| {
                Ok(InvoiceSummary {
                    invoice_id: invoice.id_typed(),
                    created_at: invoice.created_at(),
                    item_count: invoice.len(),
                    total: self.currency.format(invoice.total(&self.catalog)?),
                    current: invoice.id_typed() == self.current,
                })
            })
            .collect()
    }

    pub fn products(&self) -> Vec<ProductView> {
        self.catalog
            .list()
            .iter()
            .map(|p| self.product_view(p))
            .collect()
    }

    pub fn product_view(&self, product: &Product) -> ProductView {
        ProductView {
            id: product.id_typed(),
            name: product.name().to_string(),
            unit_price: product.unit_price(),
            price: self.currency.format(product.unit_price()),
        }
    }

    fn row(&self, item: &InvoiceItem) -> DomainResult<InvoiceItemRow> {
        let product_id = item.product_id();
        let product = self
            .catalog
            .find(&product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;

        Ok(InvoiceItemRow {
            item_id: item.id_typed(),
            product_id,
            product_name: product.name().to_string(),
            quantity: item.quantity(),
            price: self.currency.format(item.price(&self.catalog)?),
            total: self.currency.format(item.total(&self.catalog)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoicer_infra::{DatabaseConfig, InMemoryStore, SqliteStore};
    use rust_decimal_macros::dec;

    fn session_with_apples() -> (InvoiceSession, ProductId) {
        let apples = Product::new(ProductId::new(), "Apples", Money::new(dec!(2.50))).unwrap();
        let id = apples.id_typed();
        let catalog: Catalog = [apples].into_iter().collect();
        (InvoiceSession::new(catalog, CurrencyFormat::en_us()), id)
    }

    #[test]
    fn new_session_has_an_empty_current_invoice() {
        let (session, _) = session_with_apples();
        assert!(session.current().unwrap().is_empty());
        assert_eq!(session.manager().len(), 1);
        assert_eq!(session.refresh_total().unwrap(), "$0.00");
    }

    #[test]
    fn two_lines_display_fifteen_dollars() {
        let (mut session, apples) = session_with_apples();
        session.add_item(apples, Quantity::from(3)).unwrap();
        session.add_item(apples, Quantity::from(3)).unwrap();

        assert_eq!(session.total().unwrap(), Money::new(dec!(15.00)));
        assert_eq!(session.refresh_total().unwrap(), "$15.00");

        let view = session.view().unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].product_name, "Apples");
        assert_eq!(view.items[0].price, "$2.50");
        assert_eq!(view.items[0].total, "$7.50");
        assert_eq!(view.total, "$15.00");
    }

    #[test]
    fn starting_a_new_invoice_resets_display() {
        let (mut session, apples) = session_with_apples();
        let first = session.current_id();
        session.add_item(apples, Quantity::from(3)).unwrap();

        let second = session.start_new_invoice();

        assert_ne!(first, second);
        assert!(session.current().unwrap().is_empty());
        assert_eq!(session.refresh_total().unwrap(), "$0.00");
        assert!(session.view().unwrap().items.is_empty());
        // The previous invoice is kept by the manager, untouched.
        assert_eq!(session.manager().len(), 2);
        assert_eq!(session.manager().get(first).unwrap().len(), 1);
    }

    #[test]
    fn unknown_product_cannot_be_added() {
        let (mut session, _) = session_with_apples();
        let err = session.add_item(ProductId::new(), Quantity::from(1)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(session.current().unwrap().is_empty());
    }

    #[test]
    fn price_change_is_reflected_in_open_invoice() {
        let (mut session, apples) = session_with_apples();
        session.add_item(apples, Quantity::from(2)).unwrap();

        session.update_price(apples, Money::new(dec!(3.00))).unwrap();
        assert_eq!(session.refresh_total().unwrap(), "$6.00");
    }

    #[test]
    fn quantity_edit_and_removal() {
        let (mut session, apples) = session_with_apples();
        let a = session.add_item(apples, Quantity::from(1)).unwrap();
        let b = session.add_item(apples, Quantity::from(1)).unwrap();

        session.set_quantity(a, Quantity::from(4)).unwrap();
        assert_eq!(session.refresh_total().unwrap(), "$12.50");

        session.remove_item(b).unwrap();
        assert_eq!(session.refresh_total().unwrap(), "$10.00");

        assert!(matches!(
            session.set_quantity(b, Quantity::from(1)),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn switch_between_invoices() {
        let (mut session, apples) = session_with_apples();
        let first = session.current_id();
        session.add_item(apples, Quantity::from(2)).unwrap();
        session.start_new_invoice();

        session.switch_to(first).unwrap();
        assert_eq!(session.current_id(), first);
        assert_eq!(session.refresh_total().unwrap(), "$5.00");

        let err = session.switch_to(InvoiceId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(session.current().unwrap().id_typed(), first);
    }

    #[test]
    fn invoice_summaries_mark_the_current_one() {
        let (mut session, apples) = session_with_apples();
        let first = session.current_id();
        session.add_item(apples, Quantity::from(4)).unwrap();
        session.start_new_invoice();

        let summaries = session.invoices().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].invoice_id, first);
        assert_eq!(summaries[0].item_count, 1);
        assert_eq!(summaries[0].total, "$10.00");
        assert!(!summaries[0].current);
        assert!(summaries[1].current);
        assert_eq!(summaries[1].total, "$0.00");
    }

    #[test]
    fn products_are_formatted_for_the_picker() {
        let (session, apples) = session_with_apples();
        let products = session.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, apples);
        assert_eq!(products[0].price, "$2.50");
    }

    #[tokio::test]
    async fn load_builds_catalog_from_repository() {
        let store = InMemoryStore::new();
        let pears = Product::new(ProductId::new(), "Pears", Money::new(dec!(1.20))).unwrap();
        let id = pears.id_typed();
        store.save_product(&pears).await.unwrap();

        let mut session = InvoiceSession::load(&store, CurrencyFormat::en_gb()).await.unwrap();
        assert_eq!(session.catalog().len(), 1);
        session.add_item(id, Quantity::from(5)).unwrap();
        assert_eq!(session.refresh_total().unwrap(), "£6.00");
    }

    #[tokio::test]
    async fn saved_invoices_are_restored_on_load() {
        let store = SqliteStore::open(&DatabaseConfig::in_memory()).await.unwrap();
        let apples = Product::new(ProductId::new(), "Apples", Money::new(dec!(2.50))).unwrap();
        let apples_id = apples.id_typed();
        store.save_product(&apples).await.unwrap();

        let mut session = InvoiceSession::load(&store, CurrencyFormat::en_us()).await.unwrap();
        session.add_item(apples_id, Quantity::from(3)).unwrap();
        let saved_id = session.current_id();
        store.save_invoice(session.current().unwrap()).await.unwrap();

        let mut restarted = InvoiceSession::load(&store, CurrencyFormat::en_us()).await.unwrap();
        assert_eq!(restarted.manager().len(), 2);
        assert!(restarted.manager().get(saved_id).is_some());
        assert_ne!(restarted.current_id(), saved_id);
        assert!(restarted.current().unwrap().is_empty());

        restarted.switch_to(saved_id).unwrap();
        assert_eq!(restarted.refresh_total().unwrap(), "$7.50");
        assert_eq!(restarted.view().unwrap().items[0].product_name, "Apples");
    }

    #[test]
    fn french_session_formats_in_euros() {
        let apples = Product::new(ProductId::new(), "Pommes", Money::new(dec!(2.50))).unwrap();
        let id = apples.id_typed();
        let mut session = InvoiceSession::new([apples].into_iter().collect(), CurrencyFormat::fr_fr());
        session.add_item(id, Quantity::from(6)).unwrap();
        assert_eq!(session.refresh_total().unwrap(), "15,00\u{a0}€");
    }
}
