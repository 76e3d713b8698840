use chrono::DateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle state. PENDING is the initial state; PAID is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "PAID" => Some(OrderStatus::Paid),
            _ => None,
        }
    }
}

/// An order as stored: unix-second timestamps, `paid_at` absent while PENDING.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_no: String,
    pub amount: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub paid_at: Option<i64>,
}

impl Order {
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            order_no: self.order_no.clone(),
            amount: self.amount,
            status: self.status,
            created_at: format_ts(self.created_at),
            paid_at: self.paid_at.map(format_ts),
        }
    }
}

/// Wire representation of an order. This exact shape is also what gets
/// serialized into the cache, so it derives `Deserialize` as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderSnapshot {
    pub order_no: String,
    pub amount: f64,
    pub status: OrderStatus,
    /// `YYYY-MM-DD HH:MM:SS` (UTC) or `N/A`.
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

/// Format a unix-second timestamp; the 0 sentinel renders as `N/A`.
pub fn format_ts(t: i64) -> String {
    if t == 0 {
        return "N/A".to_string();
    }
    match DateTime::from_timestamp(t, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "N/A".to_string(),
    }
}
