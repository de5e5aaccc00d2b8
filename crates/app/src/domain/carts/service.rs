//! Cart lines service.

use async_trait::async_trait;
use hamper::items::{LineItem, LineItemUuid};
use mockall::automock;

use crate::{
    database::Db,
    domain::carts::{errors::CartLinesServiceError, repositories::PgCartLinesRepository},
    identity::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgCartLinesService {
    db: Db,
    repository: PgCartLinesRepository,
}

impl PgCartLinesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl CartLinesService for PgCartLinesService {
    async fn list_lines(&self, user: UserUuid) -> Result<Vec<LineItem>, CartLinesServiceError> {
        let mut tx = self.db.begin_shopper_transaction(user).await?;

        let lines = self.repository.list_lines(&mut tx, user).await?;

        tx.commit().await?;

        Ok(lines)
    }

    async fn upsert_line(
        &self,
        user: UserUuid,
        line: &LineItem,
    ) -> Result<(), CartLinesServiceError> {
        let mut tx = self.db.begin_shopper_transaction(user).await?;

        self.repository.upsert_line(&mut tx, user, line).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn set_line_quantity(
        &self,
        user: UserUuid,
        line: LineItemUuid,
        quantity: u32,
    ) -> Result<(), CartLinesServiceError> {
        let mut tx = self.db.begin_shopper_transaction(user).await?;

        self.repository
            .set_line_quantity(&mut tx, user, line, quantity)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn remove_line(
        &self,
        user: UserUuid,
        line: LineItemUuid,
    ) -> Result<(), CartLinesServiceError> {
        let mut tx = self.db.begin_shopper_transaction(user).await?;

        self.repository.delete_line(&mut tx, user, line).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn clear_lines(&self, user: UserUuid) -> Result<(), CartLinesServiceError> {
        let mut tx = self.db.begin_shopper_transaction(user).await?;

        self.repository.clear_lines(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartLinesService: Send + Sync {
    /// The user's cart lines, product snapshots re-derived from the catalog
    /// on every read.
    async fn list_lines(&self, user: UserUuid) -> Result<Vec<LineItem>, CartLinesServiceError>;

    /// Inserts or merges a line keyed by `(user, product)`.
    ///
    /// The line carries the absolute resulting quantity, so repeating the
    /// same upsert never double-counts.
    async fn upsert_line(&self, user: UserUuid, line: &LineItem)
    -> Result<(), CartLinesServiceError>;

    /// Sets an existing line's quantity. A missing line is not an error, so
    /// the operation stays safe to repeat.
    async fn set_line_quantity(
        &self,
        user: UserUuid,
        line: LineItemUuid,
        quantity: u32,
    ) -> Result<(), CartLinesServiceError>;

    /// Deletes one line. A missing line is not an error.
    async fn remove_line(
        &self,
        user: UserUuid,
        line: LineItemUuid,
    ) -> Result<(), CartLinesServiceError>;

    /// Deletes every line belonging to the user.
    async fn clear_lines(&self, user: UserUuid) -> Result<(), CartLinesServiceError>;
}
