//! Cart Lines Repository

use hamper::{
    items::{LineItem, LineItemUuid, ProductUuid},
    prices::Price,
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::database::{try_get_amount, try_get_count};
use crate::identity::UserUuid;

const LIST_CART_LINES_SQL: &str = include_str!("../sql/list_cart_lines.sql");
const UPSERT_CART_LINE_SQL: &str = include_str!("../sql/upsert_cart_line.sql");
const SET_CART_LINE_QUANTITY_SQL: &str = include_str!("../sql/set_cart_line_quantity.sql");
const DELETE_CART_LINE_SQL: &str = include_str!("../sql/delete_cart_line.sql");
const CLEAR_CART_LINES_SQL: &str = include_str!("../sql/clear_cart_lines.sql");

/// One `cart_lines` row joined with its product snapshot.
struct CartLineRow {
    uuid: LineItemUuid,
    product_uuid: ProductUuid,
    name: String,
    price: Price,
    image_url: String,
    slug: String,
    quantity: u32,
    stock_ceiling: u32,
}

impl From<CartLineRow> for LineItem {
    fn from(row: CartLineRow) -> Self {
        LineItem {
            uuid: row.uuid,
            product_uuid: row.product_uuid,
            name: row.name,
            unit_price: row.price,
            image_url: row.image_url,
            slug: row.slug,
            quantity: row.quantity,
            stock_ceiling: row.stock_ceiling,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LineItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            price: Price::new(try_get_amount(row, "price")?),
            image_url: row.try_get("image_url")?,
            slug: row.try_get("slug")?,
            quantity: try_get_count(row, "quantity")?,
            stock_ceiling: try_get_count(row, "stock_quantity")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<LineItem>, sqlx::Error> {
        let rows = query_as::<Postgres, CartLineRow>(LIST_CART_LINES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    pub(crate) async fn upsert_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        line: &LineItem,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_CART_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(try_bind_count(line.quantity)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn set_line_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        line: LineItemUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_CART_LINE_QUANTITY_SQL)
            .bind(line.into_uuid())
            .bind(user.into_uuid())
            .bind(try_bind_count(quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        line: LineItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_LINE_SQL)
            .bind(line.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_LINES_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn try_bind_count(value: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
