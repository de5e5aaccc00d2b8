//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query};

use crate::identity::UserUuid;

/// SQL used to set the shopper context for row-level security.
pub const SET_SHOPPER_CONTEXT_SQL: &str = "SELECT set_config('app.current_user_uuid', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a plain transaction with no shopper context.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction and set the shopper context for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the shopper
    /// context fails.
    pub async fn begin_shopper_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_SHOPPER_CONTEXT_SQL)
            .bind(user.into_uuid().to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Decode a non-negative bigint column into minor units.
pub(crate) fn try_get_amount(row: &PgRow, index: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(index)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

/// Decode a non-negative integer column into a count.
pub(crate) fn try_get_count(row: &PgRow, index: &str) -> sqlx::Result<u32> {
    let value: i32 = row.try_get(index)?;

    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}
