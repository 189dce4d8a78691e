//! Order summary shown next to the cart.

use crate::cart::Cart;

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: f64 = 50.0;

/// Flat shipping charge below the threshold.
pub const FLAT_SHIPPING: f64 = 5.99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
    pub total_items: u64,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
    /// How much more the shopper has to add to stop paying shipping.
    pub free_shipping_remaining: Option<f64>,
}

impl OrderSummary {
    pub fn for_cart(cart: &Cart) -> Self {
        Self::from_totals(cart.total_items(), cart.total_price())
    }

    pub fn from_totals(total_items: u64, subtotal: f64) -> Self {
        // an empty cart is never shown with a shipping line
        let shipping = if total_items == 0 || subtotal > FREE_SHIPPING_THRESHOLD {
            0.0
        } else {
            FLAT_SHIPPING
        };
        let free_shipping_remaining =
            (shipping > 0.0).then(|| FREE_SHIPPING_THRESHOLD - subtotal);

        Self {
            total_items,
            subtotal,
            shipping,
            total: subtotal + shipping,
            free_shipping_remaining,
        }
    }

    pub fn ships_free(&self) -> bool {
        self.shipping == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, Rating};

    fn product(id: u32, price: f64) -> Product {
        Product {
            id,
            title: String::new(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    #[test]
    fn empty_cart_has_no_charges() {
        let summary = OrderSummary::for_cart(&Cart::new());
        assert_eq!(summary.total, 0.0);
        assert!(summary.ships_free());
        assert_eq!(summary.free_shipping_remaining, None);
    }

    #[test]
    fn small_order_pays_flat_shipping() {
        let mut cart = Cart::new();
        cart.add_to_cart(&product(1, 10.0));
        cart.add_to_cart(&product(2, 5.0));
        cart.add_to_cart(&product(2, 5.0));

        let summary = OrderSummary::for_cart(&cart);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.subtotal, 20.0);
        assert_eq!(summary.shipping, FLAT_SHIPPING);
        assert!((summary.total - 25.99).abs() < 1e-9);
        assert_eq!(summary.free_shipping_remaining, Some(30.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let at = OrderSummary::from_totals(1, 50.0);
        assert_eq!(at.shipping, FLAT_SHIPPING);
        assert_eq!(at.free_shipping_remaining, Some(0.0));

        let above = OrderSummary::from_totals(1, 50.01);
        assert!(above.ships_free());
        assert_eq!(above.total, 50.01);
    }
}
