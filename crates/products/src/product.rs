use serde::{Deserialize, Serialize};

use invoicer_core::{DomainError, DomainResult, Entity, Money, ProductId};

/// Catalog entry: a named item sold at a unit price.
///
/// Invoice lines hold only the `ProductId`; the price is read from the catalog
/// every time a line total is computed, so `set_unit_price` affects existing
/// lines too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Money,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Money) -> DomainResult<Self> {
        let name = name.into();
        ensure_name(&name)?;
        ensure_price(unit_price)?;

        Ok(Self {
            id,
            name,
            unit_price,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Invariant: unit price is never negative.
    pub fn set_unit_price(&mut self, unit_price: Money) -> DomainResult<()> {
        ensure_price(unit_price)?;
        self.unit_price = unit_price;
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        ensure_name(&name)?;
        self.name = name;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Wire shape of a product; deserializing goes through `Product::new`.
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    unit_price: Money,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> DomainResult<Self> {
        Product::new(record.id, record.name, record.unit_price)
    }
}

fn ensure_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("product name cannot be empty"));
    }
    Ok(())
}

fn ensure_price(price: Money) -> DomainResult<()> {
    if price.is_negative() {
        return Err(DomainError::validation(format!(
            "unit price must not be negative (got {price})"
        )));
    }
    Ok(())
}
