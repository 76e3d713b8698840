use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Expiry for cached order snapshots.
pub const ORDER_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache backend unavailable")]
    Unavailable,
}

/// Key-value cache with per-entry expiry. Enum dispatch: the Redis variant is
/// what production runs; the Memory variant lets tests inject an in-process
/// fake with the same TTL semantics, including a switchable outage mode.
#[derive(Clone)]
pub enum Cache {
    Redis(ConnectionManager),
    Memory(MemoryCache),
}

impl Cache {
    /// Connect to Redis. Fails fast at startup if the server is unreachable;
    /// the connection manager reconnects on its own afterwards.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Cache::Redis(manager))
    }

    pub fn memory() -> Self {
        Cache::Memory(MemoryCache::default())
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        match self {
            Cache::Redis(manager) => {
                let mut conn = manager.clone();
                conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
                Ok(())
            }
            Cache::Memory(memory) => memory.set(key, value, ttl).await,
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self {
            Cache::Redis(manager) => {
                let mut conn = manager.clone();
                let value: Option<String> = conn.get(key).await?;
                Ok(value)
            }
            Cache::Memory(memory) => memory.get(key).await,
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Cache::Redis(manager) => {
                let mut conn = manager.clone();
                conn.del::<_, ()>(key).await?;
                Ok(())
            }
            Cache::Memory(memory) => memory.delete(key).await,
        }
    }
}

/// In-process cache mirroring the Redis contract, including expiry. While
/// marked unavailable, every operation fails like a lost Redis connection.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, (String, Instant)>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryCache {
    /// Toggle outage mode for subsequent operations.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(CacheError::Unavailable);
        }
        Ok(())
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        if let Some((value, expires_at)) = entries.get(key) {
            if *expires_at > Instant::now() {
                return Ok(Some(value.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_cache_set_get_delete() {
        let cache = Cache::memory();
        cache.set("order:ORD1", "{}", ORDER_TTL).await.unwrap();
        assert_eq!(cache.get("order:ORD1").await.unwrap(), Some("{}".into()));

        cache.delete("order:ORD1").await.unwrap();
        assert_eq!(cache.get("order:ORD1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_cache_entries_expire() {
        let cache = Cache::memory();
        cache
            .set("order:ORD2", "{}", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.get("order:ORD2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_cache_fails_while_unavailable() {
        let memory = MemoryCache::default();
        let cache = Cache::Memory(memory.clone());
        cache.set("order:ORD3", "{}", ORDER_TTL).await.unwrap();

        memory.set_unavailable(true);
        assert!(matches!(
            cache.set("order:ORD3", "{}", ORDER_TTL).await,
            Err(CacheError::Unavailable)
        ));
        assert!(matches!(
            cache.get("order:ORD3").await,
            Err(CacheError::Unavailable)
        ));
        assert!(matches!(
            cache.delete("order:ORD3").await,
            Err(CacheError::Unavailable)
        ));

        // Entries survive the outage; only availability is simulated.
        memory.set_unavailable(false);
        assert_eq!(cache.get("order:ORD3").await.unwrap(), Some("{}".into()));
    }
}
