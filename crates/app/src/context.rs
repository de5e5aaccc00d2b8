//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::AppConfig,
    database::{self, Db},
    domain::{
        carts::{CartStore, DualModeCartPersistence, PgCartLinesService, local::LocalCartStore},
        orders::{OrderPlacement, OrdersService, PgOrdersService},
    },
    identity::SessionIdentity,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Everything a storefront session works through.
///
/// Built on session start and dropped on session end; the cart store lives
/// here rather than in any ambient global. Call [`CartStore::load`] once
/// after construction to pick up the durable cart.
#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<SessionIdentity>,
    pub cart: Arc<CartStore>,
    pub orders: Arc<dyn OrdersService>,
    pub placement: Arc<OrderPlacement>,
}

impl AppContext {
    /// Build a session context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let identity = Arc::new(SessionIdentity::default());
        let remote = Arc::new(PgCartLinesService::new(db.clone()));
        let persistence = DualModeCartPersistence::new(
            identity.clone(),
            LocalCartStore::new(config.persistence.local_dir),
            remote,
            config.persistence.durable_call_timeout,
        );
        let cart = Arc::new(CartStore::new(Arc::new(persistence)));

        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(db));
        let placement = Arc::new(OrderPlacement::new(
            orders.clone(),
            identity.clone(),
            config.checkout,
        ));

        Ok(Self {
            identity,
            cart,
            orders,
            placement,
        })
    }
}
