//! Line items

use serde::{Deserialize, Serialize};

use crate::{prices::Price, uuids::TypedUuid};

/// Line item UUID
pub type LineItemUuid = TypedUuid<LineItem>;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductSnapshot>;

/// One distinct product in a cart, with the catalog fields copied at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Identity of the cart row; store-assigned once persisted remotely.
    pub uuid: LineItemUuid,
    /// Identity of the catalog product; the merge key within a cart.
    pub product_uuid: ProductUuid,
    /// Product name at add time.
    pub name: String,
    /// Unit price at add time.
    pub unit_price: Price,
    /// Product image at add time.
    pub image_url: String,
    /// Product page slug at add time.
    pub slug: String,
    /// Units of the product in the cart.
    pub quantity: u32,
    /// Available stock at add time; `0` means no ceiling is known.
    pub stock_ceiling: u32,
}

impl LineItem {
    /// Creates a line for a product, clamping the requested quantity.
    #[must_use]
    pub fn from_product(product: &ProductSnapshot, quantity: u32) -> Self {
        Self {
            uuid: LineItemUuid::new(),
            product_uuid: product.uuid,
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.image_url.clone(),
            slug: product.slug.clone(),
            quantity: clamped_quantity(quantity, product.stock_ceiling),
            stock_ceiling: product.stock_ceiling,
        }
    }

    /// Price of the line: unit price times quantity.
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// The catalog fields a product contributes to a new line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Identity of the catalog product.
    pub uuid: ProductUuid,
    /// Product name.
    pub name: String,
    /// Current unit price.
    pub price: Price,
    /// Product image.
    pub image_url: String,
    /// Product page slug.
    pub slug: String,
    /// Currently available stock; `0` means unknown.
    pub stock_ceiling: u32,
}

/// Bounds a requested quantity to `1..=stock_ceiling`.
///
/// A ceiling of `0` means the available stock is unknown; only the lower
/// bound applies.
#[must_use]
pub fn clamped_quantity(requested: u32, stock_ceiling: u32) -> u32 {
    let quantity = requested.max(1);

    if stock_ceiling > 0 {
        quantity.min(stock_ceiling)
    } else {
        quantity
    }
}

/// The sum of line totals over `items`. An empty sequence totals zero.
pub fn subtotal_of(items: &[LineItem]) -> Price {
    items.iter().map(LineItem::line_total).sum()
}

/// The number of units across `items`. An empty sequence counts zero.
pub fn count_of(items: &[LineItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: u64, stock_ceiling: u32) -> ProductSnapshot {
        ProductSnapshot {
            uuid: ProductUuid::new(),
            name: "Walnut Desk Organiser".to_string(),
            price: Price::new(price),
            image_url: "/images/walnut-desk-organiser.jpg".to_string(),
            slug: "walnut-desk-organiser".to_string(),
            stock_ceiling,
        }
    }

    #[test]
    fn clamps_to_the_stock_ceiling() {
        assert_eq!(clamped_quantity(7, 5), 5);
        assert_eq!(clamped_quantity(3, 5), 3);
    }

    #[test]
    fn clamps_zero_up_to_one() {
        assert_eq!(clamped_quantity(0, 5), 1);
    }

    #[test]
    fn zero_ceiling_means_no_upper_bound() {
        assert_eq!(clamped_quantity(250, 0), 250);
        assert_eq!(clamped_quantity(0, 0), 1);
    }

    #[test]
    fn from_product_copies_the_snapshot_fields() {
        let product = product(12_50, 4);

        let line = LineItem::from_product(&product, 2);

        assert_eq!(line.product_uuid, product.uuid);
        assert_eq!(line.name, product.name);
        assert_eq!(line.unit_price, product.price);
        assert_eq!(line.slug, product.slug);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.stock_ceiling, 4);
    }

    #[test]
    fn from_product_clamps_the_requested_quantity() {
        let product = product(12_50, 4);

        assert_eq!(LineItem::from_product(&product, 9).quantity, 4);
        assert_eq!(LineItem::from_product(&product, 0).quantity, 1);
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let line = LineItem::from_product(&product(3_25, 10), 3);

        assert_eq!(line.line_total(), Price::new(9_75));
    }

    #[test]
    fn derivations_over_the_empty_sequence_are_zero() {
        assert_eq!(subtotal_of(&[]), Price::new(0));
        assert_eq!(count_of(&[]), 0);
    }

    #[test]
    fn derivations_sum_over_all_items() {
        let items = [
            LineItem::from_product(&product(1_00, 10), 2),
            LineItem::from_product(&product(2_00, 10), 3),
        ];

        assert_eq!(subtotal_of(&items), Price::new(8_00));
        assert_eq!(count_of(&items), 5);
    }
}
