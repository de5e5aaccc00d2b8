//! Carts

pub mod errors;
pub mod local;
pub mod models;
pub mod persistence;
mod repositories;
pub mod service;
pub mod store;

pub use errors::{CartLinesServiceError, CartPersistenceError};
pub use persistence::*;
pub use service::*;
pub use store::CartStore;
