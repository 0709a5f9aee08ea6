//! Cart domain type and the stock rules for add / reduce / remove.
//!
//! Every operation checks its preconditions before touching anything, so a
//! returned [`CartError`] guarantees the cart and the product are unchanged.

use serde::Serialize;
use thiserror::Error;

use bazaar_core::{CartId, Price, ProductId, UserId};

use super::Product;

/// Errors raised by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no line in this cart.
    #[error("Product with id {0} is not in the cart")]
    ProductNotInCart(ProductId),

    /// Not enough unreserved stock to satisfy an add.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// A reduce asked for more units than the line holds.
    #[error(
        "Cannot reduce product {product_id} by {requested}: only {in_cart} in the cart"
    )]
    StockLimitExceeded {
        product_id: ProductId,
        requested: u32,
        in_cart: u32,
    },
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    /// Always at least one; a line reaching zero is removed.
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A user's cart. Lines keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn empty(id: CartId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            lines: Vec::new(),
        }
    }

    /// Sum of unit price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }

    /// Reserve `quantity` units of `product` and add them to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InsufficientStock` if the product has fewer than
    /// `quantity` unreserved units.
    pub fn add(&mut self, product: &mut Product, quantity: u32) -> Result<(), CartError> {
        if !product.reserve(quantity) {
            return Err(CartError::InsufficientStock {
                product_id: product.id,
                requested: quantity,
                available: product.stock,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
            }),
        }
        Ok(())
    }

    /// Take `quantity` units of `product` out of the cart and back into stock.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotInCart` if there is no line for the
    /// product, or `CartError::StockLimitExceeded` if the line holds fewer
    /// than `quantity` units.
    pub fn reduce(&mut self, product: &mut Product, quantity: u32) -> Result<(), CartError> {
        let idx = self
            .position(product.id)
            .ok_or(CartError::ProductNotInCart(product.id))?;
        let Some(line) = self.lines.get_mut(idx) else {
            return Err(CartError::ProductNotInCart(product.id));
        };

        if quantity > line.quantity {
            return Err(CartError::StockLimitExceeded {
                product_id: product.id,
                requested: quantity,
                in_cart: line.quantity,
            });
        }

        line.quantity -= quantity;
        product.release(quantity);
        if line.quantity == 0 {
            self.lines.remove(idx);
        }
        Ok(())
    }

    /// Drop the whole line for `product`, returning its units to stock.
    ///
    /// Returns the number of units released.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotInCart` if there is no line for the product.
    pub fn remove(&mut self, product: &mut Product) -> Result<u32, CartError> {
        let idx = self
            .position(product.id)
            .ok_or(CartError::ProductNotInCart(product.id))?;
        let line = self.lines.remove(idx);
        product.release(line.quantity);
        Ok(line.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::product::tests::product;

    fn cart() -> Cart {
        Cart::empty(CartId::new(1), UserId::new(1))
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let mut c = cart();
        let mut apple = product(1, 150, 10);
        let mut pear = product(2, 275, 10);

        c.add(&mut apple, 3).unwrap();
        c.add(&mut pear, 2).unwrap();

        assert_eq!(c.total(), Price::from_cents(150 * 3 + 275 * 2));
        assert_eq!(c.item_count(), 5);
    }

    #[test]
    fn test_add_reserves_stock_and_merges_lines() {
        let mut c = cart();
        let mut p = product(1, 100, 5);

        c.add(&mut p, 2).unwrap();
        c.add(&mut p, 1).unwrap();

        assert_eq!(c.lines.len(), 1);
        assert_eq!(c.line(p.id).unwrap().quantity, 3);
        assert_eq!(p.stock, 2);
    }

    #[test]
    fn test_add_beyond_stock_leaves_state_unchanged() {
        let mut c = cart();
        let mut p = product(1, 100, 5);
        c.add(&mut p, 4).unwrap();
        let before = c.clone();

        let err = c.add(&mut p, 2).unwrap_err();

        assert_eq!(
            err,
            CartError::InsufficientStock {
                product_id: p.id,
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(c, before);
        assert_eq!(p.stock, 1);
    }

    #[test]
    fn test_reduce_returns_units_to_stock() {
        let mut c = cart();
        let mut p = product(1, 100, 5);
        c.add(&mut p, 4).unwrap();

        c.reduce(&mut p, 3).unwrap();

        assert_eq!(c.line(p.id).unwrap().quantity, 1);
        assert_eq!(p.stock, 4);
    }

    #[test]
    fn test_reduce_to_zero_drops_line() {
        let mut c = cart();
        let mut p = product(1, 100, 5);
        c.add(&mut p, 2).unwrap();

        c.reduce(&mut p, 2).unwrap();

        assert!(c.is_empty());
        assert_eq!(p.stock, 5);
    }

    #[test]
    fn test_reduce_below_zero_is_rejected_without_touching_other_lines() {
        let mut c = cart();
        let mut p = product(1, 100, 5);
        let mut other = product(2, 300, 5);
        c.add(&mut p, 2).unwrap();
        c.add(&mut other, 1).unwrap();
        let before = c.clone();

        let err = c.reduce(&mut p, 3).unwrap_err();

        assert_eq!(
            err,
            CartError::StockLimitExceeded {
                product_id: p.id,
                requested: 3,
                in_cart: 2,
            }
        );
        assert_eq!(c, before);
        assert_eq!(p.stock, 3);
    }

    #[test]
    fn test_reduce_missing_line() {
        let mut c = cart();
        let mut p = product(7, 100, 5);

        assert_eq!(
            c.reduce(&mut p, 1).unwrap_err(),
            CartError::ProductNotInCart(p.id)
        );
        assert_eq!(p.stock, 5);
    }

    #[test]
    fn test_remove_releases_whole_line() {
        let mut c = cart();
        let mut p = product(1, 100, 5);
        let mut other = product(2, 300, 5);
        c.add(&mut p, 3).unwrap();
        c.add(&mut other, 2).unwrap();

        assert_eq!(c.remove(&mut p).unwrap(), 3);

        assert_eq!(p.stock, 5);
        assert!(c.line(p.id).is_none());
        assert_eq!(c.line(other.id).unwrap().quantity, 2);
        assert_eq!(other.stock, 3);
    }

    #[test]
    fn test_remove_missing_line_leaves_cart_unchanged() {
        let mut c = cart();
        let mut other = product(2, 300, 5);
        c.add(&mut other, 2).unwrap();
        let before = c.clone();
        let mut p = product(1, 100, 5);

        assert_eq!(
            c.remove(&mut p).unwrap_err(),
            CartError::ProductNotInCart(p.id)
        );
        assert_eq!(c, before);
    }
}
