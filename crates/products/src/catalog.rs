//! Product catalog: shared, read-mostly product data.

use std::collections::HashMap;

use invoicer_core::{DomainError, DomainResult, Money, ProductId};

use crate::product::Product;

/// Read access to products by identifier.
///
/// Invoice lines resolve their price through this trait at read time.
pub trait ProductCatalog {
    fn find(&self, id: &ProductId) -> Option<&Product>;
}

impl<C> ProductCatalog for &C
where
    C: ProductCatalog + ?Sized,
{
    fn find(&self, id: &ProductId) -> Option<&Product> {
        (**self).find(id)
    }
}

/// In-memory catalog preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product. Identifiers are unique within a catalog.
    pub fn insert(&mut self, product: Product) -> DomainResult<()> {
        let id = product.id_typed();
        if self.index.contains_key(&id) {
            return Err(DomainError::conflict(format!("product {id} already in catalog")));
        }
        self.index.insert(id, self.products.len());
        self.products.push(product);
        Ok(())
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    pub fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.products[i]),
            None => None,
        }
    }

    pub fn update_price(&mut self, id: &ProductId, unit_price: Money) -> DomainResult<()> {
        let product = self
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))?;
        product.set_unit_price(unit_price)
    }

    /// Build a catalog, failing with `Conflict` on the first duplicate id.
    pub fn try_from_products<I>(products: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = Product>,
    {
        let mut catalog = Catalog::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for Catalog {
    fn find(&self, id: &ProductId) -> Option<&Product> {
        self.get(id)
    }
}

impl FromIterator<Product> for Catalog {
    /// Later duplicates of an id are dropped (and logged).
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for product in iter {
            let id = product.id_typed();
            if let Err(err) = catalog.insert(product) {
                tracing::warn!(product_id = %id, error = %err, "duplicate product dropped from catalog");
            }
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(name: &str, price: Money) -> Product {
        Product::new(ProductId::new(), name, price).unwrap()
    }

    #[test]
    fn insert_and_find() {
        let apples = product("Apples", Money::new(dec!(2.50)));
        let id = apples.id_typed();

        let mut catalog = Catalog::new();
        catalog.insert(apples).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find(&id).map(Product::name), Some("Apples"));
        assert!(catalog.find(&ProductId::new()).is_none());
    }

    #[test]
    fn duplicate_id_is_a_conflict() {
        let apples = product("Apples", Money::ZERO);
        let mut catalog = Catalog::new();
        catalog.insert(apples.clone()).unwrap();

        assert!(matches!(catalog.insert(apples), Err(DomainError::Conflict(_))));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn list_keeps_insertion_order() {
        let catalog: Catalog = ["Pears", "Apples", "Figs"]
            .into_iter()
            .map(|n| product(n, Money::ZERO))
            .collect();

        let names: Vec<_> = catalog.list().iter().map(Product::name).collect();
        assert_eq!(names, ["Pears", "Apples", "Figs"]);
    }

    #[test]
    fn collecting_keeps_the_first_of_duplicate_ids() {
        let first = product("Apples", Money::new(dec!(1)));
        let mut second = first.clone();
        second.rename("Green apples").unwrap();

        let catalog: Catalog = [first.clone(), second.clone()].into_iter().collect();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find(&first.id_typed()).map(Product::name), Some("Apples"));

        let err = Catalog::try_from_products([first, second]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn update_price_on_unknown_product_is_not_found() {
        let mut catalog = Catalog::new();
        let err = catalog
            .update_price(&ProductId::new(), Money::ZERO)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn update_price_validates() {
        let figs = product("Figs", Money::new(dec!(4)));
        let id = figs.id_typed();
        let mut catalog = Catalog::new();
        catalog.insert(figs).unwrap();

        catalog.update_price(&id, Money::new(dec!(4.40))).unwrap();
        assert_eq!(catalog.get(&id).unwrap().unit_price(), Money::new(dec!(4.40)));
        assert!(catalog.update_price(&id, Money::new(dec!(-4))).is_err());
    }
}
