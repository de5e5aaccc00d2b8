//! Cart

use crate::{
    items::{LineItem, LineItemUuid, ProductSnapshot, clamped_quantity, count_of, subtotal_of},
    prices::Price,
};

/// Outcome of assigning a quantity to a line.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityChange {
    /// The line now carries the returned state.
    Updated(LineItem),
    /// A zero quantity removed the line.
    Removed(LineItem),
    /// No line with that id exists; nothing changed.
    NotFound,
}

/// An ordered collection of line items, at most one per product.
///
/// Insertion order is preserved for display; it carries no other meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Creates a cart from a durable representation.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Cart { items }
    }

    /// The line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Replaces the contents wholesale.
    pub fn replace(&mut self, items: Vec<LineItem>) {
        self.items = items;
    }

    /// Derived sum of line totals.
    pub fn subtotal(&self) -> Price {
        subtotal_of(&self.items)
    }

    /// Derived number of units across all lines.
    pub fn item_count(&self) -> u32 {
        count_of(&self.items)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a product, merging with an existing line for the same product.
    ///
    /// Merging increases the existing quantity by `quantity`, clamped to the
    /// line's stock ceiling; a fresh line clamps to `1..=ceiling`. Returns a
    /// copy of the resulting line.
    pub fn add(&mut self, product: &ProductSnapshot, quantity: u32) -> LineItem {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_uuid == product.uuid)
        {
            existing.quantity = clamped_quantity(
                existing.quantity.saturating_add(quantity),
                existing.stock_ceiling,
            );
            return existing.clone();
        }

        let line = LineItem::from_product(product, quantity);
        self.items.push(line.clone());
        line
    }

    /// Sets a line's quantity; zero removes the line.
    ///
    /// The value is applied as given, without a stock clamp. Unknown ids
    /// change nothing.
    pub fn set_quantity(&mut self, line: LineItemUuid, quantity: u32) -> QuantityChange {
        if quantity == 0 {
            return match self.remove(line) {
                Some(item) => QuantityChange::Removed(item),
                None => QuantityChange::NotFound,
            };
        }

        match self.items.iter_mut().find(|item| item.uuid == line) {
            Some(item) => {
                item.quantity = quantity;
                QuantityChange::Updated(item.clone())
            }
            None => QuantityChange::NotFound,
        }
    }

    /// Removes a line if present.
    pub fn remove(&mut self, line: LineItemUuid) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.uuid == line)?;

        Some(self.items.remove(index))
    }

    /// Destroys every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
