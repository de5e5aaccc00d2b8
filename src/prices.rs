//! Prices

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::iter::Sum;
use std::ops::{Add, Deref, Mul};

use serde::{Deserialize, Serialize};

/// Represents a price in pence/cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// Creates a new Price
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn to_minor(self) -> u64 {
        self.value
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price::new(self.value.saturating_add(rhs.value))
    }
}

impl Mul<u32> for Price {
    type Output = Price;

    fn mul(self, rhs: u32) -> Price {
        Price::new(self.value.saturating_mul(u64::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::new(0), Add::add)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}.{:02}", self.value / 100, self.value % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_price() {
        let price = Price::new(1000);

        assert_eq!(price.value, 1000);
    }

    #[test]
    fn price_derefs_to_u64() {
        let price = Price { value: 100 };

        assert_eq!(*price, 100);
    }

    #[test]
    fn add_and_multiply() {
        let price = Price::new(2_50);

        assert_eq!(price + Price::new(1_00), Price::new(3_50));
        assert_eq!(price * 3, Price::new(7_50));
    }

    #[test]
    fn sum_of_prices() {
        let total: Price = [Price::new(100), Price::new(200), Price::new(300)]
            .into_iter()
            .sum();

        assert_eq!(total, Price::new(600));
    }

    #[test]
    fn displays_major_and_minor_units() {
        assert_eq!(Price::new(49_99).to_string(), "49.99");
        assert_eq!(Price::new(5).to_string(), "0.05");
    }
}
