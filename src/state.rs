use crate::{cache::Cache, config::AppConfig, store::OrderStore};

#[derive(Clone)]
pub struct AppState {
    pub store: OrderStore,
    pub cache: Cache,
    pub config: AppConfig,
}
