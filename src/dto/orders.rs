use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::OrderSnapshot;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayOrderRequest {
    pub order_no: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub orders: Vec<OrderSnapshot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteConfirmation {
    pub deleted: bool,
    pub order_no: String,
}
