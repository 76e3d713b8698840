use axum::{extract::FromRequestParts, http::header};

use crate::{error::AppError, state::AppState};

/// Static shared-secret check: the `Authorization` header must equal the
/// configured API key. Handlers opt in by taking this extractor, which keeps
/// `/healthcheck`, `/metrics`, and `/docs` open.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if provided != state.config.api_key {
            return Err(AppError::Unauthorized);
        }
        Ok(ApiKey)
    }
}
