//! Fixture builders used across service and store tests.

use hamper::{
    items::{LineItem, ProductSnapshot, ProductUuid},
    prices::Price,
};

use crate::domain::orders::models::Address;

pub(crate) fn product(slug: &str, price: u64, stock_ceiling: u32) -> ProductSnapshot {
    ProductSnapshot {
        uuid: ProductUuid::new(),
        name: slug.to_string(),
        price: Price::new(price),
        image_url: format!("/images/{slug}.jpg"),
        slug: slug.to_string(),
        stock_ceiling,
    }
}

pub(crate) fn line_item(slug: &str, price: u64, quantity: u32) -> LineItem {
    LineItem::from_product(&product(slug, price, 99), quantity)
}

pub(crate) fn address() -> Address {
    Address {
        first_name: "Avery".to_string(),
        last_name: "Quinn".to_string(),
        email: "avery.quinn@example.com".to_string(),
        phone: "+1 555 0100".to_string(),
        address_line_1: "12 Harbour Lane".to_string(),
        address_line_2: String::new(),
        city: "Portsmouth".to_string(),
        state: "NH".to_string(),
        postal_code: "03801".to_string(),
        country: "US".to_string(),
    }
}
