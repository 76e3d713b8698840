use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod metrics;
pub mod orders;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/order", orders::router())
}
