//! Cart state models.

use hamper::{cart::Cart, items::LineItem, prices::Price};

/// Read-only view of the cart published by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Derived sum of line totals.
    pub subtotal: Price,
    /// Derived unit count, e.g. for a cart badge.
    pub item_count: u32,
    /// Whether a durable round trip is outstanding. Gates duplicate mutation
    /// intents, never reads.
    pub pending: bool,
}

impl CartSnapshot {
    pub(crate) fn of(cart: &Cart, pending: bool) -> Self {
        Self {
            items: cart.items().to_vec(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
            pending,
        }
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
