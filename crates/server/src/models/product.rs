//! Product domain type and stock bookkeeping.

use serde::Serialize;

use bazaar_core::{Price, ProductId};

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    /// Units not yet reserved by any cart.
    pub stock: u32,
}

impl Product {
    /// Whether `quantity` more units can be reserved.
    #[must_use]
    pub const fn can_reserve(&self, quantity: u32) -> bool {
        quantity <= self.stock
    }

    /// Take `quantity` units out of stock.
    ///
    /// Returns `false` and leaves the stock untouched if not enough units remain.
    #[must_use]
    pub const fn reserve(&mut self, quantity: u32) -> bool {
        if !self.can_reserve(quantity) {
            return false;
        }
        self.stock -= quantity;
        true
    }

    /// Put `quantity` units back into stock.
    pub const fn release(&mut self, quantity: u32) {
        self.stock = self.stock.saturating_add(quantity);
    }
}
