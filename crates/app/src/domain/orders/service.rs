//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{NewOrder, Order, OrderLine, OrderStatus, OrderUuid},
        repository::PgOrdersRepository,
    },
    identity::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_order_lines(&self, lines: Vec<OrderLine>) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        for line in &lines {
            self.repository.create_order_line(&mut tx, line).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_shopper_transaction(user).await?;

        let mut orders = self.repository.list_orders(&mut tx, user).await?;
        self.repository.attach_lines(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order_number: &str) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut orders = vec![self.repository.get_order(&mut tx, order_number).await?];
        self.repository.attach_lines(&mut tx, &mut orders).await?;

        tx.commit().await?;

        orders.pop().ok_or(OrdersServiceError::NotFound)
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.set_status(&mut tx, order, status).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Creates an order record with status `pending`.
    async fn create_order(&self, order: NewOrder) -> Result<Order, OrdersServiceError>;

    /// Creates the frozen lines belonging to an order.
    async fn create_order_lines(&self, lines: Vec<OrderLine>) -> Result<(), OrdersServiceError>;

    /// A user's order history, newest first, lines included.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Looks up a single order by its human-facing number.
    async fn get_order(&self, order_number: &str) -> Result<Order, OrdersServiceError>;

    /// Replaces an order's status. Any status from the fixed set is
    /// accepted; transition validity is not checked here.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<(), OrdersServiceError>;
}
