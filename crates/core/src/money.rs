//! Exact decimal amounts and quantities.
//!
//! Both types wrap `rust_decimal::Decimal`, so `2.50 * 3` is exactly `7.50`.
//! Arithmetic that can overflow is exposed only through `checked_*` methods.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// A currency amount in major units (e.g. `2.50` dollars).
///
/// The currency itself is a presentation concern: the workspace works in a
/// single currency chosen by the desktop configuration.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build an amount from minor units, e.g. `from_minor(250, 2)` is `2.50`.
    pub fn from_minor(minor: i64, scale: u32) -> Self {
        Self(Decimal::new(minor, scale))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Line arithmetic: `unit price × quantity`.
    pub fn checked_mul(self, quantity: Quantity) -> Option<Money> {
        self.0.checked_mul(quantity.0).map(Money)
    }

    /// Round half away from zero to `dp` fractional digits.
    pub fn round_dp(self, dp: u32) -> Money {
        Money(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl ValueObject for Money {}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|e| DomainError::validation(format!("invalid amount {s:?}: {e}")))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Quantity on an invoice line.
///
/// Decimal so that weighed goods (`1.25` kg) are representable. Quantities are
/// not validated: zero and negative values (returns, corrections) are allowed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    pub const ZERO: Quantity = Quantity(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl ValueObject for Quantity {}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Quantity)
            .map_err(|e| DomainError::validation(format!("invalid quantity {s:?}: {e}")))
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.normalize(), f)
    }
}
