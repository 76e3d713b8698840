use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use utoipa::ToSchema;

pub static TOTAL_REQUESTS: AtomicU64 = AtomicU64::new(0);
pub static ORDERS_CREATED: AtomicU64 = AtomicU64::new(0);
pub static ORDERS_PAID: AtomicU64 = AtomicU64::new(0);
pub static CACHE_HITS: AtomicU64 = AtomicU64::new(0);
pub static CACHE_MISSES: AtomicU64 = AtomicU64::new(0);

pub fn incr(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub orders_created: u64,
    pub orders_paid: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        total_requests: TOTAL_REQUESTS.load(Ordering::Relaxed),
        orders_created: ORDERS_CREATED.load(Ordering::Relaxed),
        orders_paid: ORDERS_PAID.load(Ordering::Relaxed),
        cache_hits: CACHE_HITS.load(Ordering::Relaxed),
        cache_misses: CACHE_MISSES.load(Ordering::Relaxed),
    }
}
