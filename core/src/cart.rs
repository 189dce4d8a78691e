//! Session-lifetime shopping cart.
//!
//! # Design
//! `Cart` is a single owned value: every mutation takes `&mut self`, so the
//! borrow checker already guarantees one writer at a time and no lock is
//! needed. Views register plain callbacks with `subscribe` and are invoked
//! synchronously after each mutation with the event and the current items.
//!
//! Items keep first-added order and there is at most one `CartItem` per
//! product id; adding a product again bumps its quantity instead.

use std::num::NonZeroU32;

use tracing::debug;

use crate::types::{Product, ProductId};

/// A product together with how many of it are in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    /// Snapshot of the product taken when it was first added.
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl CartItem {
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Line price: unit price times quantity.
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity.get())
    }
}

/// What just changed in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// `quantity` is the item's quantity after the add.
    Added { product_id: ProductId, quantity: u32 },
    Removed { product_id: ProductId },
    QuantityUpdated { product_id: ProductId, quantity: u32 },
    Cleared,
}

/// Handle returned by `Cart::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&CartEvent, &[CartItem])>;

#[derive(Default)]
pub struct Cart {
    items: Vec<CartItem>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    // --- mutations ---

    /// Add one unit of `product`. An existing line for the same id is bumped
    /// by one; otherwise a new line with quantity 1 goes to the end.
    pub fn add_to_cart(&mut self, product: &Product) {
        let product_id = product.id;
        let quantity = match self.position(product_id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = item.quantity.saturating_add(1);
                item.quantity.get()
            }
            None => {
                self.items.push(CartItem {
                    product: product.clone(),
                    quantity: NonZeroU32::MIN,
                });
                1
            }
        };
        debug!(product_id, quantity, "added to cart");
        self.notify(CartEvent::Added { product_id, quantity });
    }

    /// Drop the line for `product_id`. Returns `false`, and notifies nobody,
    /// when there was no such line.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        self.items.remove(idx);
        debug!(product_id, "removed from cart");
        self.notify(CartEvent::Removed { product_id });
        true
    }

    /// Set the quantity of an existing line. Unknown ids are ignored and
    /// `false` is returned.
    ///
    /// A quantity of zero is not representable here; callers holding a raw
    /// stepper value go through [`Cart::change_quantity`].
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: NonZeroU32) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        self.items[idx].quantity = quantity;
        debug!(product_id, quantity = quantity.get(), "cart quantity updated");
        self.notify(CartEvent::QuantityUpdated {
            product_id,
            quantity: quantity.get(),
        });
        true
    }

    /// Apply a raw quantity from a stepper control: anything below 1 is a
    /// removal request, anything else an update. Values above `u32::MAX` are
    /// capped.
    pub fn change_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove_from_cart(product_id);
        }
        let capped = u32::try_from(quantity).unwrap_or(u32::MAX);
        match NonZeroU32::new(capped) {
            Some(quantity) => self.update_quantity(product_id, quantity),
            None => self.remove_from_cart(product_id),
        }
    }

    /// Empty the cart unconditionally.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        debug!("cart cleared");
        self.notify(CartEvent::Cleared);
    }

    // --- queries ---

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines, for the header badge.
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.get())).sum()
    }

    /// Sum of price times quantity, unrounded.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    // --- observers ---

    /// Register `observer` to run after every mutation. Observers run in
    /// subscription order.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent, &[CartItem]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() < before
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product.id == product_id)
    }

    fn notify(&mut self, event: CartEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&event, &self.items);
        }
    }
}
