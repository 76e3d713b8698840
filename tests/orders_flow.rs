use axum_order_api::{
    cache::{Cache, MemoryCache},
    config::AppConfig,
    db::run_migrations,
    dto::orders::{CreateOrderRequest, PayOrderRequest},
    error::AppError,
    models::{Order, OrderStatus},
    services::order_service,
    state::AppState,
    store::OrderStore,
};
use sqlx::sqlite::SqlitePoolOptions;

// Each test gets its own in-memory database and in-process cache. One pool
// connection, otherwise every connection would see a different :memory: db.
// The returned cache handle can simulate an outage.
async fn setup_state() -> anyhow::Result<(AppState, MemoryCache)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;

    let memory = MemoryCache::default();
    let state = AppState {
        store: OrderStore::new(pool),
        cache: Cache::Memory(memory.clone()),
        config: AppConfig {
            database_url: "sqlite::memory:".into(),
            redis_url: "redis://127.0.0.1:6379".into(),
            api_key: "test-key".into(),
            host: "127.0.0.1".into(),
            port: 0,
        },
    };
    Ok((state, memory))
}

async fn create(state: &AppState, amount: f64) -> anyhow::Result<String> {
    let snapshot = order_service::create_order(state, CreateOrderRequest { amount })
        .await
        .map_err(|err| anyhow::anyhow!("create failed: {err}"))?;
    Ok(snapshot.order_no)
}

#[tokio::test]
async fn create_returns_pending_order_with_well_formed_id() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let snapshot = order_service::create_order(&state, CreateOrderRequest { amount: 99.99 })
        .await
        .unwrap();
    assert_eq!(snapshot.status, OrderStatus::Pending);
    assert_eq!(snapshot.amount, 99.99);
    assert!(snapshot.paid_at.is_none());
    assert!(snapshot.order_no.starts_with("ORD"));
    assert!(snapshot.order_no[3..].chars().all(|c| c.is_ascii_digit()));
    Ok(())
}

#[tokio::test]
async fn create_rejects_non_positive_amount() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = order_service::create_order(&state, CreateOrderRequest { amount })
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(_)),
            "amount {amount} should be rejected, got {err:?}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn create_get_delete_flow() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let order_no = create(&state, 99.99).await?;

    let fetched = order_service::get_order(&state, &order_no).await.unwrap();
    assert_eq!(fetched.order_no, order_no);
    assert_eq!(fetched.amount, 99.99);
    assert_eq!(fetched.status, OrderStatus::Pending);

    let confirmation = order_service::delete_order(&state, &order_no).await.unwrap();
    assert!(confirmation.deleted);
    assert_eq!(confirmation.order_no, order_no);

    let err = order_service::get_order(&state, &order_no).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn pay_transitions_to_paid_exactly_once() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let order_no = create(&state, 123.45).await?;

    let paid = order_service::pay_order(
        &state,
        PayOrderRequest {
            order_no: order_no.clone(),
        },
    )
    .await
    .unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert!(paid.paid_at.is_some());

    // The cache entry was invalidated, so this read reflects the store.
    let fetched = order_service::get_order(&state, &order_no).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Paid);
    assert!(fetched.paid_at.is_some());

    let err = order_service::pay_order(
        &state,
        PayOrderRequest {
            order_no: order_no.clone(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg == "Already paid"));

    // Status is unchanged by the rejected second payment.
    let fetched = order_service::get_order(&state, &order_no).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Paid);
    Ok(())
}

#[tokio::test]
async fn pay_rejects_missing_order_no() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let err = order_service::pay_order(
        &state,
        PayOrderRequest {
            order_no: String::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn operations_on_unknown_order_return_not_found() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let err = order_service::get_order(&state, "ORD00000").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = order_service::pay_order(
        &state,
        PayOrderRequest {
            order_no: "ORD00000".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let err = order_service::delete_order(&state, "ORD00000").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn list_filters_by_exact_status() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let first = create(&state, 10.0).await?;
    let _second = create(&state, 20.0).await?;
    let _third = create(&state, 30.0).await?;

    order_service::pay_order(
        &state,
        PayOrderRequest {
            order_no: first.clone(),
        },
    )
    .await
    .unwrap();

    let all = order_service::list_orders(&state, None).await.unwrap();
    assert_eq!(all.orders.len(), 3);

    let paid = order_service::list_orders(&state, Some("PAID".into()))
        .await
        .unwrap();
    assert_eq!(paid.orders.len(), 1);
    assert_eq!(paid.orders[0].order_no, first);
    assert!(paid.orders.iter().all(|o| o.status == OrderStatus::Paid));

    let pending = order_service::list_orders(&state, Some("PENDING".into()))
        .await
        .unwrap();
    assert_eq!(pending.orders.len(), 2);

    // An empty filter string means no filter; an unmatched status matches nothing.
    let unfiltered = order_service::list_orders(&state, Some(String::new()))
        .await
        .unwrap();
    assert_eq!(unfiltered.orders.len(), 3);
    let none = order_service::list_orders(&state, Some("SHIPPED".into()))
        .await
        .unwrap();
    assert!(none.orders.is_empty());
    Ok(())
}

#[tokio::test]
async fn repeated_gets_are_stable_within_ttl() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let order_no = create(&state, 55.5).await?;

    let first = order_service::get_order(&state, &order_no).await.unwrap();
    let second = order_service::get_order(&state, &order_no).await.unwrap();
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn store_fallback_read_does_not_repopulate_cache() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let order_no = create(&state, 42.0).await?;
    let key = format!("order:{order_no}");

    // Evict the snapshot; the next read must come from the store and leave
    // the cache cold.
    state.cache.delete(&key).await.unwrap();
    let fetched = order_service::get_order(&state, &order_no).await.unwrap();
    assert_eq!(fetched.amount, 42.0);
    assert_eq!(state.cache.get(&key).await.unwrap(), None);
    Ok(())
}

#[tokio::test]
async fn create_aborts_when_cache_set_fails_but_row_is_durable() -> anyhow::Result<()> {
    let (state, cache) = setup_state().await?;

    cache.set_unavailable(true);
    let err = order_service::create_order(&state, CreateOrderRequest { amount: 10.0 })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cache(_)));

    // The insert happened before the cache write, so the order exists and a
    // later read must succeed via the store fallback.
    let all = state.store.list(None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, OrderStatus::Pending);

    cache.set_unavailable(false);
    let fetched = order_service::get_order(&state, &all[0].order_no)
        .await
        .unwrap();
    assert_eq!(fetched.amount, 10.0);
    Ok(())
}

#[tokio::test]
async fn pay_aborts_when_cache_delete_fails_and_leaves_order_pending() -> anyhow::Result<()> {
    let (state, cache) = setup_state().await?;

    let order_no = create(&state, 77.0).await?;

    cache.set_unavailable(true);
    let err = order_service::pay_order(
        &state,
        PayOrderRequest {
            order_no: order_no.clone(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Cache(_)));

    // Invalidation runs before the update, so the store was never touched.
    cache.set_unavailable(false);
    let order = state.store.find(&order_no).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.paid_at.is_none());
    Ok(())
}

#[tokio::test]
async fn get_falls_back_to_store_when_cache_is_down() -> anyhow::Result<()> {
    let (state, cache) = setup_state().await?;

    let order_no = create(&state, 15.0).await?;

    cache.set_unavailable(true);
    let fetched = order_service::get_order(&state, &order_no).await.unwrap();
    assert_eq!(fetched.amount, 15.0);
    assert_eq!(fetched.status, OrderStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn delete_succeeds_despite_cache_failure() -> anyhow::Result<()> {
    let (state, cache) = setup_state().await?;

    let order_no = create(&state, 8.0).await?;

    cache.set_unavailable(true);
    let confirmation = order_service::delete_order(&state, &order_no).await.unwrap();
    assert!(confirmation.deleted);

    // Row is gone. The snapshot cached at create survives the failed
    // invalidation: the accepted staleness window, bounded by the TTL.
    let err = state.store.find(&order_no).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    cache.set_unavailable(false);
    let key = format!("order:{order_no}");
    assert!(state.cache.get(&key).await.unwrap().is_some());
    Ok(())
}

#[tokio::test]
async fn duplicate_order_no_is_a_conflict() -> anyhow::Result<()> {
    let (state, _cache) = setup_state().await?;

    let order = Order {
        order_no: "ORD17000000000001".into(),
        amount: 5.0,
        status: OrderStatus::Pending,
        created_at: 1_700_000_000,
        paid_at: None,
    };
    state.store.insert(&order).await.unwrap();

    let err = state.store.insert(&order).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict));
    Ok(())
}
