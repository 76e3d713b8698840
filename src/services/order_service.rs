use chrono::Utc;

use crate::{
    cache,
    dto::orders::{CreateOrderRequest, DeleteConfirmation, OrderList, PayOrderRequest},
    error::{AppError, AppResult},
    metrics,
    models::{Order, OrderSnapshot, OrderStatus},
    order_no,
    state::AppState,
};

fn cache_key(order_no: &str) -> String {
    format!("order:{order_no}")
}

/// Create a PENDING order: insert the row, then populate the cache with the
/// snapshot. A cache-set failure aborts the request even though the row is
/// already durable; a later get() still succeeds via the store fallback.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<OrderSnapshot> {
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(AppError::BadRequest(
            "Amount must be a positive number".into(),
        ));
    }

    let order = Order {
        order_no: order_no::generate(),
        amount: payload.amount,
        status: OrderStatus::Pending,
        created_at: Utc::now().timestamp(),
        paid_at: None,
    };
    state.store.insert(&order).await?;

    let snapshot = order.snapshot();
    let value = serde_json::to_string(&snapshot).map_err(anyhow::Error::from)?;
    state
        .cache
        .set(&cache_key(&order.order_no), &value, cache::ORDER_TTL)
        .await?;
    tracing::info!(order_no = %order.order_no, "created order and cached snapshot (ttl 300s)");

    metrics::incr(&metrics::ORDERS_CREATED);
    Ok(snapshot)
}

/// Cache-aside read: cache hit wins, everything else falls through to the
/// store. A store-fallback read does not repopulate the cache.
pub async fn get_order(state: &AppState, order_no: &str) -> AppResult<OrderSnapshot> {
    let key = cache_key(order_no);
    match state.cache.get(&key).await {
        Ok(Some(raw)) => match serde_json::from_str::<OrderSnapshot>(&raw) {
            Ok(snapshot) => {
                metrics::incr(&metrics::CACHE_HITS);
                tracing::debug!(%order_no, "cache hit");
                return Ok(snapshot);
            }
            Err(err) => {
                tracing::warn!(%order_no, error = %err, "ignoring undecodable cache entry");
            }
        },
        Ok(None) => {
            metrics::incr(&metrics::CACHE_MISSES);
            tracing::debug!(%order_no, "cache miss");
        }
        Err(err) => {
            tracing::warn!(%order_no, error = %err, "cache read failed, falling back to store");
        }
    }

    let order = state.store.find(order_no).await?;
    Ok(order.snapshot())
}

/// PENDING -> PAID, exactly once. The cache entry is invalidated before the
/// store update; if invalidation fails the operation aborts with the store
/// untouched, so a PAID order can never sit behind a stale PENDING snapshot.
pub async fn pay_order(state: &AppState, payload: PayOrderRequest) -> AppResult<OrderSnapshot> {
    if payload.order_no.is_empty() {
        return Err(AppError::BadRequest("Missing order_no".into()));
    }

    let order = state.store.find(&payload.order_no).await?;
    if order.status == OrderStatus::Paid {
        return Err(AppError::BadRequest("Already paid".into()));
    }

    state.cache.delete(&cache_key(&order.order_no)).await?;
    tracing::info!(order_no = %order.order_no, "invalidated cache entry before payment");

    let paid_at = Utc::now().timestamp();
    state.store.mark_paid(&order.order_no, paid_at).await?;
    metrics::incr(&metrics::ORDERS_PAID);

    let paid = Order {
        status: OrderStatus::Paid,
        paid_at: Some(paid_at),
        ..order
    };
    Ok(paid.snapshot())
}

/// List bypasses the cache entirely; only single-order snapshots are cached.
/// An empty status string means no filter.
pub async fn list_orders(state: &AppState, status: Option<String>) -> AppResult<OrderList> {
    let filter = status.as_deref().filter(|s| !s.is_empty());
    let orders = state
        .store
        .list(filter)
        .await?
        .into_iter()
        .map(|order| order.snapshot())
        .collect();
    Ok(OrderList { orders })
}

/// Delete the row, then invalidate the cache best-effort: a cache failure
/// here is logged and never surfaced.
pub async fn delete_order(state: &AppState, order_no: &str) -> AppResult<DeleteConfirmation> {
    state.store.delete(order_no).await?;

    if let Err(err) = state.cache.delete(&cache_key(order_no)).await {
        tracing::warn!(%order_no, error = %err, "cache invalidation failed (non-blocking)");
    } else {
        tracing::info!(%order_no, "deleted order and cache entry");
    }

    Ok(DeleteConfirmation {
        deleted: true,
        order_no: order_no.to_string(),
    })
}
