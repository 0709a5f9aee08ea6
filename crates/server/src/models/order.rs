//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{OrderId, OrderStatus, Price, ProductId, UserId};

use super::Cart;

/// A line of a placed order, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub customer_id: UserId,
    pub total_price: Price,
    pub status: OrderStatus,
    pub archived: bool,
    pub items: Vec<OrderItem>,
}

/// An order ready to be inserted, built from a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer_id: UserId,
    pub total_price: Price,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Snapshot `cart` into a pending order.
    ///
    /// Returns `None` for an empty cart. The total is computed from the
    /// copied items, so it always equals their sum.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        let items: Vec<OrderItem> = cart
            .lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                product_name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        Some(Self {
            customer_id: cart.user_id,
            total_price: items.iter().map(OrderItem::line_total).sum(),
            status: OrderStatus::Pending,
            items,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::CartId;

    use super::*;
    use crate::models::product::tests::product;

    #[test]
    fn test_from_empty_cart_is_none() {
        let cart = Cart::empty(CartId::new(1), UserId::new(9));
        assert!(NewOrder::from_cart(&cart).is_none());
    }

    #[test]
    fn test_total_matches_cart_and_items() {
        let mut cart = Cart::empty(CartId::new(1), UserId::new(9));
        let mut mug = product(1, 1_250, 10);
        let mut tea = product(2, 399, 10);
        cart.add(&mut mug, 2).unwrap();
        cart.add(&mut tea, 3).unwrap();

        let order = NewOrder::from_cart(&cart).unwrap();

        assert_eq!(order.customer_id, UserId::new(9));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, cart.total());
        assert_eq!(
            order.total_price,
            order.items.iter().map(OrderItem::line_total).sum::<Price>()
        );
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items.first().unwrap().product_id, mug.id);
    }
}
