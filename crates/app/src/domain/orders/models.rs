//! Order Models

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use hamper::{items::ProductUuid, prices::Price, uuids::TypedUuid};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::UserUuid;

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLine>;

/// Lifecycle state of an order.
///
/// A fixed set with no transition graph enforced here; transition validity
/// is an admin-tooling concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The database and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Raised when decoding an unrecognised status value.
#[derive(Debug, Error)]
#[error("unknown order status {0:?}")]
pub struct UnknownOrderStatus(String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// A postal address captured at checkout, stored as a snapshot on the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: Option<UserUuid>,
    pub subtotal: Price,
    pub tax_amount: Price,
    pub shipping_amount: Price,
    pub total_amount: Price,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub lines: Vec<OrderLine>,
}

/// New Order Model
///
/// Orders always begin life as [`OrderStatus::Pending`]; the status is set
/// by the store, not the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: Option<UserUuid>,
    pub subtotal: Price,
    pub tax_amount: Price,
    pub shipping_amount: Price,
    pub total_amount: Price,
    pub shipping_address: Address,
    pub billing_address: Address,
}

/// A frozen copy of a line item at the moment of purchase, immune to later
/// catalog price changes.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Derives the human-facing order number shown on confirmations.
#[must_use]
pub fn order_number_for(order: OrderUuid) -> String {
    let digits: String = order
        .into_uuid()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();

    format!("ORD-{}", digits.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_text_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_numbers_are_prefixed_and_stable() {
        let order = OrderUuid::new();

        let number = order_number_for(order);

        assert!(number.starts_with("ORD-"), "got {number}");
        assert_eq!(number.len(), 12);
        assert_eq!(number, order_number_for(order));
    }
}
