//! Cart store.
//!
//! The observable state container for the session's cart. Mutation intents
//! apply to in-memory state synchronously, then record themselves durably
//! through [`CartPersistence`]; a durable failure is surfaced to the caller
//! without rolling the optimistic change back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hamper::{
    cart::{Cart, QuantityChange},
    items::{LineItem, LineItemUuid, ProductSnapshot},
};
use tokio::sync::{Mutex, watch};

use crate::domain::carts::{
    errors::CartPersistenceError,
    models::CartSnapshot,
    persistence::{CartMutation, CartPersistence},
};

struct StoreState {
    cart: Cart,
    pending: bool,
}

/// The session's cart: one writer, any number of snapshot observers.
///
/// Mutation intents serialize through an internal lock held across both the
/// in-memory apply and the durable call, so rapid repeated intents cannot
/// lose updates. [`CartStore::load`] fetches outside that lock and discards
/// its result when a newer intent was issued in the meantime.
pub struct CartStore {
    persistence: Arc<dyn CartPersistence>,
    state: Mutex<StoreState>,
    issue: AtomicU64,
    snapshots: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Creates an empty store.
    ///
    /// Call [`CartStore::load`] on session start to pick up the durable
    /// cart; the store is dropped with the session that owns it.
    #[must_use]
    pub fn new(persistence: Arc<dyn CartPersistence>) -> Self {
        let (snapshots, _) = watch::channel(CartSnapshot::default());

        Self {
            persistence,
            state: Mutex::new(StoreState {
                cart: Cart::new(),
                pending: false,
            }),
            issue: AtomicU64::new(0),
            snapshots,
        }
    }

    /// The state as of the latest publish.
    pub fn snapshot(&self) -> CartSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Observes every state change, starting from the current one.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self, state: &StoreState) -> CartSnapshot {
        let snapshot = CartSnapshot::of(&state.cart, state.pending);
        self.snapshots.send_replace(snapshot.clone());

        snapshot
    }

    /// Replaces in-memory state with the durable cart.
    ///
    /// Idempotent and safe to call repeatedly. A load overtaken by a newer
    /// intent discards its fetched state: last writer wins by issue order,
    /// not completion order.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure when the durable fetch fails; the
    /// in-memory state is left as it was.
    pub async fn load(&self) -> Result<CartSnapshot, CartPersistenceError> {
        let issued = self.issue.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.lock().await;
            state.pending = true;
            self.publish(&state);
        }

        let fetched = self.persistence.load().await;

        let mut state = self.state.lock().await;

        if self.issue.load(Ordering::SeqCst) != issued {
            // Superseded while the fetch was in flight; the newer intent
            // owns the state now.
            return Ok(CartSnapshot::of(&state.cart, state.pending));
        }

        state.pending = false;

        match fetched {
            Ok(items) => {
                state.cart.replace(items);
                Ok(self.publish(&state))
            }
            Err(error) => {
                self.publish(&state);
                Err(error)
            }
        }
    }

    /// Adds `quantity` of a product, merging with an existing line for the
    /// same product and clamping to its stock ceiling. Callers adding a
    /// single unit pass `1`.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure when the durable upsert fails; the
    /// optimistic in-memory change is kept either way.
    pub async fn add(
        &self,
        product: &ProductSnapshot,
        quantity: u32,
    ) -> Result<CartSnapshot, CartPersistenceError> {
        let mut state = self.state.lock().await;

        let line = state.cart.add(product, quantity);
        self.issue.fetch_add(1, Ordering::SeqCst);
        let items = state.cart.items().to_vec();

        self.record(&mut state, CartMutation::Upsert(line), &items)
            .await
    }

    /// Sets a line's explicit quantity; zero behaves as [`CartStore::remove`].
    ///
    /// Unknown lines are a no-op, not an error, and fire no durable call.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure when the durable update fails; the
    /// optimistic in-memory change is kept either way.
    pub async fn set_quantity(
        &self,
        line: LineItemUuid,
        quantity: u32,
    ) -> Result<CartSnapshot, CartPersistenceError> {
        let mut state = self.state.lock().await;

        let mutation = match state.cart.set_quantity(line, quantity) {
            QuantityChange::Updated(updated) => CartMutation::SetQuantity {
                line: updated.uuid,
                quantity,
            },
            QuantityChange::Removed(removed) => CartMutation::Remove { line: removed.uuid },
            QuantityChange::NotFound => return Ok(CartSnapshot::of(&state.cart, state.pending)),
        };

        self.issue.fetch_add(1, Ordering::SeqCst);
        let items = state.cart.items().to_vec();

        self.record(&mut state, mutation, &items).await
    }

    /// Removes a line. Unknown lines are a no-op and fire no durable call.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure when the durable delete fails; the
    /// optimistic in-memory change is kept either way.
    pub async fn remove(&self, line: LineItemUuid) -> Result<CartSnapshot, CartPersistenceError> {
        let mut state = self.state.lock().await;

        if state.cart.remove(line).is_none() {
            return Ok(CartSnapshot::of(&state.cart, state.pending));
        }

        self.issue.fetch_add(1, Ordering::SeqCst);
        let items = state.cart.items().to_vec();

        self.record(&mut state, CartMutation::Remove { line }, &items)
            .await
    }

    /// Destroys every line, in memory and durably.
    ///
    /// # Errors
    ///
    /// Returns the persistence failure when the durable bulk delete fails;
    /// the in-memory cart stays empty either way.
    pub async fn clear(&self) -> Result<CartSnapshot, CartPersistenceError> {
        let mut state = self.state.lock().await;

        state.cart.clear();
        self.issue.fetch_add(1, Ordering::SeqCst);

        self.record(&mut state, CartMutation::Clear, &[]).await
    }

    /// Publishes the optimistic state, records the mutation durably, then
    /// publishes completion.
    async fn record(
        &self,
        state: &mut StoreState,
        mutation: CartMutation,
        items: &[LineItem],
    ) -> Result<CartSnapshot, CartPersistenceError> {
        state.pending = true;
        self.publish(state);

        let result = self.persistence.persist(mutation, items).await;

        state.pending = false;
        let snapshot = self.publish(state);

        result.map(|()| snapshot)
    }
}
