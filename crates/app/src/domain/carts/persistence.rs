//! Dual-mode cart persistence.
//!
//! Resolves the active identity on every durable call and records cart state
//! in the matching backend: a local serialized blob for guests, the remote
//! cart-line table for signed-in users.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hamper::items::{LineItem, LineItemUuid};
use mockall::automock;
use tokio::time::timeout;

use crate::{
    domain::carts::{
        errors::CartPersistenceError, local::LocalCartStore, service::CartLinesService,
    },
    identity::{Identity, IdentityProvider},
};

/// A durable cart intent.
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    /// Insert or merge a line, carrying its absolute resulting quantity.
    Upsert(LineItem),
    /// Set an existing line's quantity.
    SetQuantity {
        /// The line to update.
        line: LineItemUuid,
        /// The explicit quantity to record.
        quantity: u32,
    },
    /// Delete one line.
    Remove {
        /// The line to delete.
        line: LineItemUuid,
    },
    /// Delete everything scoped to the current identity.
    Clear,
}

/// Durable storage the cart store records through.
#[automock]
#[async_trait]
pub trait CartPersistence: Send + Sync {
    /// Fetches the durable cart for the current identity.
    async fn load(&self) -> Result<Vec<LineItem>, CartPersistenceError>;

    /// Durably records one mutation.
    ///
    /// `items` is the full post-mutation state; the anonymous backend
    /// overwrites its blob wholesale from it.
    async fn persist(
        &self,
        mutation: CartMutation,
        items: &[LineItem],
    ) -> Result<(), CartPersistenceError>;
}

/// Production persistence: local blob for guests, remote table for users.
pub struct DualModeCartPersistence {
    identity: Arc<dyn IdentityProvider>,
    local: LocalCartStore,
    remote: Arc<dyn CartLinesService>,
    durable_call_timeout: Duration,
}

impl Debug for DualModeCartPersistence {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DualModeCartPersistence")
            .field("local", &self.local)
            .field("durable_call_timeout", &self.durable_call_timeout)
            .finish_non_exhaustive()
    }
}

impl DualModeCartPersistence {
    /// Creates the adapter over both backends.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        local: LocalCartStore,
        remote: Arc<dyn CartLinesService>,
        durable_call_timeout: Duration,
    ) -> Self {
        Self {
            identity,
            local,
            remote,
            durable_call_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, CartPersistenceError>
    where
        F: Future<Output = Result<T, CartPersistenceError>> + Send,
    {
        match timeout(self.durable_call_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(CartPersistenceError::Timeout(self.durable_call_timeout)),
        }
    }
}

#[async_trait]
impl CartPersistence for DualModeCartPersistence {
    async fn load(&self) -> Result<Vec<LineItem>, CartPersistenceError> {
        match self.identity.current_identity().await {
            Identity::Anonymous => self.bounded(async { Ok(self.local.read().await) }).await,
            Identity::Authenticated(user) => {
                self.bounded(async { Ok(self.remote.list_lines(user).await?) })
                    .await
            }
        }
    }

    async fn persist(
        &self,
        mutation: CartMutation,
        items: &[LineItem],
    ) -> Result<(), CartPersistenceError> {
        match self.identity.current_identity().await {
            Identity::Anonymous => match mutation {
                CartMutation::Clear => self.bounded(self.local.clear()).await,
                _ => self.bounded(self.local.write(items)).await,
            },
            Identity::Authenticated(user) => {
                self.bounded(async {
                    match mutation {
                        CartMutation::Upsert(line) => {
                            self.remote.upsert_line(user, &line).await?;
                        }
                        CartMutation::SetQuantity { line, quantity } => {
                            self.remote.set_line_quantity(user, line, quantity).await?;
                        }
                        CartMutation::Remove { line } => {
                            self.remote.remove_line(user, line).await?;
                        }
                        CartMutation::Clear => {
                            self.remote.clear_lines(user).await?;
                        }
                    }

                    Ok(())
                })
                .await
            }
        }
    }
}
