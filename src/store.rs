use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_no: String,
    amount: f64,
    status: String,
    created_at: i64,
    paid_at: i64,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        let status = OrderStatus::parse(&self.status).ok_or_else(|| {
            anyhow::anyhow!("unknown status {:?} for order {}", self.status, self.order_no)
        })?;
        Ok(Order {
            order_no: self.order_no,
            amount: self.amount,
            status,
            created_at: self.created_at,
            paid_at: (self.paid_at != 0).then_some(self.paid_at),
        })
    }
}

/// Durable order store: the source of truth. All SQL for the `orders` table
/// lives here; callers see domain types and the error taxonomy only.
#[derive(Clone)]
pub struct OrderStore {
    pool: DbPool,
}

impl OrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new order row. A primary-key collision on `order_no` maps to
    /// `Conflict`; there is no retry.
    pub async fn insert(&self, order: &Order) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO orders (order_no, amount, status, created_at, paid_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&order.order_no)
        .bind(order.amount)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.paid_at.unwrap_or(0))
        .execute(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict,
            _ => AppError::Db(err),
        })?;
        Ok(())
    }

    pub async fn find(&self, order_no: &str) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT order_no, amount, status, created_at, paid_at FROM orders WHERE order_no = ?",
        )
        .bind(order_no)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => row.into_order(),
            None => Err(AppError::NotFound),
        }
    }

    pub async fn mark_paid(&self, order_no: &str, paid_at: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE orders SET status = 'PAID', paid_at = ? WHERE order_no = ?")
            .bind(paid_at)
            .bind(order_no)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, order_no: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE order_no = ?")
            .bind(order_no)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// All orders, optionally restricted to an exact status match. Ordering
    /// is whatever SQLite returns.
    pub async fn list(&self, status: Option<&str>) -> AppResult<Vec<Order>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(
                    "SELECT order_no, amount, status, created_at, paid_at FROM orders \
                     WHERE status = ?",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(
                    "SELECT order_no, amount, status, created_at, paid_at FROM orders",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(OrderRow::into_order).collect()
    }
}
