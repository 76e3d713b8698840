use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::{delete, get, post},
};

use crate::{
    dto::orders::{
        CreateOrderRequest, DeleteConfirmation, OrderList, OrderListQuery, PayOrderRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::ApiKey,
    models::OrderSnapshot,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_order))
        .route("/get/{order_no}", get(get_order))
        .route("/pay", post(pay_order))
        .route("/list", get(list_orders))
        .route("/delete/{order_no}", delete(delete_order))
}

// Malformed or missing JSON bodies are a client problem, not a 422.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

#[utoipa::path(
    post,
    path = "/order/create",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Created order snapshot", body = OrderSnapshot),
        (status = 400, description = "Missing or non-positive amount"),
        (status = 500, description = "Store or cache error"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    _auth: ApiKey,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<Json<OrderSnapshot>> {
    let payload = body(payload)?;
    let snapshot = order_service::create_order(&state, payload).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/order/get/{order_no}",
    params(("order_no" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order snapshot", body = OrderSnapshot),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _auth: ApiKey,
    Path(order_no): Path<String>,
) -> AppResult<Json<OrderSnapshot>> {
    let snapshot = order_service::get_order(&state, &order_no).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/order/pay",
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Updated order snapshot", body = OrderSnapshot),
        (status = 400, description = "Missing order_no or already paid"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Store or cache error"),
    ),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    _auth: ApiKey,
    payload: Result<Json<PayOrderRequest>, JsonRejection>,
) -> AppResult<Json<OrderSnapshot>> {
    let payload = body(payload)?;
    let snapshot = order_service::pay_order(&state, payload).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/order/list",
    params(("status" = Option<String>, Query, description = "Exact status filter")),
    responses(
        (status = 200, description = "All matching orders", body = OrderList),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _auth: ApiKey,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<OrderList>> {
    let list = order_service::list_orders(&state, query.status).await?;
    Ok(Json(list))
}

#[utoipa::path(
    delete,
    path = "/order/delete/{order_no}",
    params(("order_no" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Deletion confirmation", body = DeleteConfirmation),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    _auth: ApiKey,
    Path(order_no): Path<String>,
) -> AppResult<Json<DeleteConfirmation>> {
    let confirmation = order_service::delete_order(&state, &order_no).await?;
    Ok(Json(confirmation))
}
