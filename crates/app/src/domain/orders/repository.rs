//! Orders Repository

use std::collections::HashMap;

use hamper::{items::ProductUuid, prices::Price};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json, types::Uuid,
};

use crate::{
    database::{try_get_amount, try_get_count},
    domain::orders::models::{
        Address, NewOrder, Order, OrderLine, OrderLineUuid, OrderStatus, OrderUuid,
    },
    identity::UserUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINE_SQL: &str = include_str!("sql/create_order_line.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("sql/list_order_lines.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("sql/set_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<Order, sqlx::Error> {
        let (created_at,): (SqlxTimestamp,) = query_as(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.order_number)
            .bind(order.user_uuid.map(UserUuid::into_uuid))
            .bind(try_bind_amount(order.subtotal)?)
            .bind(try_bind_amount(order.tax_amount)?)
            .bind(try_bind_amount(order.shipping_amount)?)
            .bind(try_bind_amount(order.total_amount)?)
            .bind(Json(&order.shipping_address))
            .bind(Json(&order.billing_address))
            .fetch_one(&mut **tx)
            .await?;

        Ok(Order {
            uuid: order.uuid,
            order_number: order.order_number,
            user_uuid: order.user_uuid,
            subtotal: order.subtotal,
            tax_amount: order.tax_amount,
            shipping_amount: order.shipping_amount,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            status: OrderStatus::Pending,
            created_at: created_at.to_jiff(),
            lines: Vec::new(),
        })
    }

    pub(crate) async fn create_order_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: &OrderLine,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_LINE_SQL)
            .bind(line.uuid.into_uuid())
            .bind(line.order_uuid.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(&line.product_name)
            .bind(try_bind_quantity(line.quantity)?)
            .bind(try_bind_amount(line.unit_price)?)
            .bind(try_bind_amount(line.line_total)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_number: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order_number)
            .fetch_one(&mut **tx)
            .await
    }

    /// Populates `lines` on each order from one grouped query.
    pub(crate) async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [Order],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let lines = query_as::<Postgres, OrderLine>(LIST_ORDER_LINES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: HashMap<OrderUuid, Vec<OrderLine>> = HashMap::new();
        for line in lines {
            by_order.entry(line.order_uuid).or_default().push(line);
        }

        for order in orders {
            order.lines = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            subtotal: Price::new(try_get_amount(row, "subtotal")?),
            tax_amount: Price::new(try_get_amount(row, "tax_amount")?),
            shipping_amount: Price::new(try_get_amount(row, "shipping_amount")?),
            total_amount: Price::new(try_get_amount(row, "total_amount")?),
            shipping_address: row.try_get::<Json<Address>, _>("shipping_address")?.0,
            billing_address: row.try_get::<Json<Address>, _>("billing_address")?.0,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            lines: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity: try_get_count(row, "quantity")?,
            unit_price: Price::new(try_get_amount(row, "unit_price")?),
            line_total: Price::new(try_get_amount(row, "line_total")?),
        })
    }
}

fn try_bind_amount(price: Price) -> Result<i64, sqlx::Error> {
    i64::try_from(price.to_minor()).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn try_bind_quantity(value: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
