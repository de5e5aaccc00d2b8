//! Hamper
//!
//! Hamper is the cart and checkout domain core of a retail storefront:
//! quantity-bounded line items, the pure cart aggregate they form, and the
//! deterministic totals computation that seeds order creation. Monetary
//! amounts are integer minor units throughout.

pub mod cart;
pub mod checkout;
pub mod items;
pub mod prices;
pub mod uuids;
