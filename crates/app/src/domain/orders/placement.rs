//! Order placement.

use std::sync::Arc;

use hamper::checkout::{CheckoutPolicy, checkout_totals};
use tracing::{Span, info, warn};

use crate::{
    domain::{
        carts::store::CartStore,
        orders::{
            errors::PlaceOrderError,
            models::{
                Address, NewOrder, Order, OrderLine, OrderLineUuid, OrderUuid, order_number_for,
            },
            service::OrdersService,
        },
    },
    identity::{Identity, IdentityProvider},
};

/// Sequences total calculation, order creation, order-line creation and the
/// cart clear as one logical unit, surfacing partial failure.
pub struct OrderPlacement {
    orders: Arc<dyn OrdersService>,
    identity: Arc<dyn IdentityProvider>,
    policy: CheckoutPolicy,
}

impl OrderPlacement {
    /// Creates the orchestrator.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        identity: Arc<dyn IdentityProvider>,
        policy: CheckoutPolicy,
    ) -> Self {
        Self {
            orders,
            identity,
            policy,
        }
    }

    /// Places an order from the cart's current contents.
    ///
    /// The order and its lines are two separate writes; when the second
    /// fails the order is left in place and reported through
    /// [`PlaceOrderError::PartialOrder`]. The cart is cleared only after
    /// both writes succeed.
    ///
    /// # Errors
    ///
    /// - [`PlaceOrderError::EmptyCart`]: the cart holds no lines.
    /// - [`PlaceOrderError::Order`]: creating the order failed; nothing was
    ///   written.
    /// - [`PlaceOrderError::PartialOrder`]: the order exists without lines.
    #[tracing::instrument(
        skip_all,
        fields(
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty,
            line_count = tracing::field::Empty
        )
    )]
    pub async fn place(
        &self,
        cart: &CartStore,
        shipping: Address,
        billing: Address,
    ) -> Result<Order, PlaceOrderError> {
        let snapshot = cart.snapshot();

        if snapshot.is_empty() {
            return Err(PlaceOrderError::EmptyCart);
        }

        let totals = checkout_totals(snapshot.subtotal, &self.policy);

        let user_uuid = match self.identity.current_identity().await {
            Identity::Authenticated(user) => Some(user),
            Identity::Anonymous => None,
        };

        let uuid = OrderUuid::new();
        let order_number = order_number_for(uuid);

        let span = Span::current();
        span.record("order_uuid", tracing::field::display(uuid));
        span.record("order_number", tracing::field::display(&order_number));
        span.record("line_count", snapshot.items.len());

        let order = self
            .orders
            .create_order(NewOrder {
                uuid,
                order_number,
                user_uuid,
                subtotal: totals.subtotal,
                tax_amount: totals.tax,
                shipping_amount: totals.shipping,
                total_amount: totals.grand_total,
                shipping_address: shipping,
                billing_address: billing,
            })
            .await
            .map_err(PlaceOrderError::Order)?;

        let lines: Vec<OrderLine> = snapshot
            .items
            .iter()
            .map(|item| OrderLine {
                uuid: OrderLineUuid::new(),
                order_uuid: order.uuid,
                product_uuid: item.product_uuid,
                product_name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total(),
            })
            .collect();

        if let Err(source) = self.orders.create_order_lines(lines.clone()).await {
            return Err(PlaceOrderError::PartialOrder {
                order: order.uuid,
                order_number: order.order_number.clone(),
                source,
            });
        }

        if let Err(error) = cart.clear().await {
            // The order is placed; the unclear cart reconciles on next load.
            warn!(%error, order_number = %order.order_number, "cart clear failed after placement");
        }

        info!(order_number = %order.order_number, "placed order");

        Ok(Order { lines, ..order })
    }
}

#[cfg(test)]
mod tests {
    use hamper::prices::Price;
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::persistence::MockCartPersistence,
            orders::{
                errors::OrdersServiceError,
                models::OrderStatus,
                service::MockOrdersService,
            },
        },
        identity::{MockIdentityProvider, UserUuid},
        test::helpers::{address, product},
    };

    use super::*;

    fn order_from(new: NewOrder) -> Order {
        Order {
            uuid: new.uuid,
            order_number: new.order_number,
            user_uuid: new.user_uuid,
            subtotal: new.subtotal,
            tax_amount: new.tax_amount,
            shipping_amount: new.shipping_amount,
            total_amount: new.total_amount,
            shipping_address: new.shipping_address,
            billing_address: new.billing_address,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
            lines: Vec::new(),
        }
    }

    fn anonymous() -> Arc<MockIdentityProvider> {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_current_identity()
            .returning(|| Identity::Anonymous);

        Arc::new(identity)
    }

    async fn two_product_cart() -> CartStore {
        let mut persistence = MockCartPersistence::new();
        persistence.expect_persist().returning(|_, _| Ok(()));

        let cart = CartStore::new(Arc::new(persistence));
        cart.add(&product("enamel-mug", 14_00, 10), 2)
            .await
            .expect("add should succeed");
        cart.add(&product("oak-tray", 32_00, 10), 1)
            .await
            .expect("add should succeed");

        cart
    }

    #[tokio::test]
    async fn a_successful_placement_writes_one_order_and_all_lines() -> TestResult {
        let cart = two_product_cart().await;

        let mut orders = MockOrdersService::new();
        orders
            .expect_create_order()
            .once()
            // 60.00 subtotal: 8% tax, free shipping at the threshold.
            .withf(|new| {
                new.subtotal == Price::new(60_00)
                    && new.tax_amount == Price::new(4_80)
                    && new.shipping_amount == Price::new(0)
                    && new.total_amount == Price::new(64_80)
                    && new.user_uuid.is_none()
            })
            .returning(|new| Ok(order_from(new)));
        orders
            .expect_create_order_lines()
            .once()
            .withf(|lines| {
                lines.len() == 2
                    && lines.iter().any(|line| {
                        line.product_name == "enamel-mug"
                            && line.quantity == 2
                            && line.unit_price == Price::new(14_00)
                            && line.line_total == Price::new(28_00)
                    })
            })
            .returning(|_| Ok(()));

        let placement = OrderPlacement::new(
            Arc::new(orders),
            anonymous(),
            CheckoutPolicy::default(),
        );

        let order = placement.place(&cart, address(), address()).await?;

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert!(
            cart.snapshot().is_empty(),
            "the cart is cleared after full success"
        );

        Ok(())
    }

    #[tokio::test]
    async fn an_authenticated_placement_carries_the_user() -> TestResult {
        let cart = two_product_cart().await;
        let user = UserUuid::new();

        let mut identity = MockIdentityProvider::new();
        identity
            .expect_current_identity()
            .returning(move || Identity::Authenticated(user));

        let mut orders = MockOrdersService::new();
        orders
            .expect_create_order()
            .once()
            .withf(move |new| new.user_uuid == Some(user))
            .returning(|new| Ok(order_from(new)));
        orders
            .expect_create_order_lines()
            .once()
            .returning(|_| Ok(()));

        let placement = OrderPlacement::new(
            Arc::new(orders),
            Arc::new(identity),
            CheckoutPolicy::default(),
        );

        placement.place(&cart, address(), address()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn totals_below_the_threshold_include_flat_shipping() -> TestResult {
        let mut persistence = MockCartPersistence::new();
        persistence.expect_persist().returning(|_, _| Ok(()));
        let cart = CartStore::new(Arc::new(persistence));
        cart.add(&product("enamel-mug", 30_00, 10), 1).await?;

        let mut orders = MockOrdersService::new();
        orders
            .expect_create_order()
            .once()
            // 30.00 subtotal: 2.40 tax, 9.99 shipping, 42.39 grand total.
            .withf(|new| {
                new.tax_amount == Price::new(2_40)
                    && new.shipping_amount == Price::new(9_99)
                    && new.total_amount == Price::new(42_39)
            })
            .returning(|new| Ok(order_from(new)));
        orders
            .expect_create_order_lines()
            .once()
            .returning(|_| Ok(()));

        let placement = OrderPlacement::new(
            Arc::new(orders),
            anonymous(),
            CheckoutPolicy::default(),
        );

        placement.place(&cart, address(), address()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn an_empty_cart_aborts_before_any_write() {
        let mut persistence = MockCartPersistence::new();
        persistence.expect_persist().never();
        let cart = CartStore::new(Arc::new(persistence));

        let mut orders = MockOrdersService::new();
        orders.expect_create_order().never();
        orders.expect_create_order_lines().never();

        let placement = OrderPlacement::new(
            Arc::new(orders),
            anonymous(),
            CheckoutPolicy::default(),
        );

        let result = placement.place(&cart, address(), address()).await;

        assert!(
            matches!(result, Err(PlaceOrderError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn a_failed_order_create_aborts_with_no_further_writes() -> TestResult {
        let cart = two_product_cart().await;

        let mut orders = MockOrdersService::new();
        orders
            .expect_create_order()
            .once()
            .returning(|_| Err(OrdersServiceError::InvalidData));
        orders.expect_create_order_lines().never();

        let placement = OrderPlacement::new(
            Arc::new(orders),
            anonymous(),
            CheckoutPolicy::default(),
        );

        let result = placement.place(&cart, address(), address()).await;

        assert!(
            matches!(result, Err(PlaceOrderError::Order(_))),
            "expected Order error, got {result:?}"
        );
        assert_eq!(cart.snapshot().items.len(), 2, "the cart is untouched");

        Ok(())
    }

    #[tokio::test]
    async fn failed_lines_leave_the_order_orphaned_and_the_cart_intact() -> TestResult {
        let cart = two_product_cart().await;

        let mut orders = MockOrdersService::new();
        orders
            .expect_create_order()
            .once()
            .returning(|new| Ok(order_from(new)));
        orders
            .expect_create_order_lines()
            .once()
            .returning(|_| Err(OrdersServiceError::InvalidReference));

        let placement = OrderPlacement::new(
            Arc::new(orders),
            anonymous(),
            CheckoutPolicy::default(),
        );

        let result = placement.place(&cart, address(), address()).await;

        match result {
            Err(PlaceOrderError::PartialOrder {
                order,
                order_number,
                ..
            }) => {
                assert_eq!(order_number, order_number_for(order));
            }
            other => panic!("expected PartialOrder, got {other:?}"),
        }

        assert_eq!(
            cart.snapshot().items.len(),
            2,
            "the cart is not cleared on partial failure"
        );

        Ok(())
    }
}
