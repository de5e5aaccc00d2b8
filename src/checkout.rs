//! Checkout totals

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::prices::Price;

/// Pricing policy applied at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPolicy {
    /// Fraction of the subtotal charged as tax.
    pub tax_rate: Decimal,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Price,
    /// Shipping charge below the threshold.
    pub flat_shipping_fee: Price,
}

impl Default for CheckoutPolicy {
    /// The reference policy: 8% tax, free shipping from 50.00, 9.99 flat fee.
    fn default() -> Self {
        CheckoutPolicy {
            tax_rate: Decimal::new(8, 2),
            free_shipping_threshold: Price::new(50_00),
            flat_shipping_fee: Price::new(9_99),
        }
    }
}

/// A fully priced checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    /// Sum of line totals.
    pub subtotal: Price,
    /// Tax on the subtotal.
    pub tax: Price,
    /// Shipping charge under the policy.
    pub shipping: Price,
    /// Subtotal plus tax plus shipping.
    pub grand_total: Price,
}

/// Prices a subtotal under the given policy.
///
/// Tax rounds half away from zero to the nearest minor unit. The subtotal
/// and rate are non-negative, so the conversion back to minor units cannot
/// fail.
pub fn checkout_totals(subtotal: Price, policy: &CheckoutPolicy) -> CheckoutTotals {
    let tax = (Decimal::from(subtotal.to_minor()) * policy.tax_rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .map_or(Price::new(0), Price::new);

    let shipping = if subtotal >= policy.free_shipping_threshold {
        Price::new(0)
    } else {
        policy.flat_shipping_fee
    };

    CheckoutTotals {
        subtotal,
        tax,
        shipping,
        grand_total: subtotal + tax + shipping,
    }
}
