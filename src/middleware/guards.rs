use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header};

use crate::{auth::Principal, error::AppError, state::AppState};

// Auth guard: resolve the bearer token to a verified principal.
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(principal);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = auth
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Missing/invalid Authorization header"))?;

        let principal = state.verifier.verify_bearer(token).await?;

        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}

pub type AuthGuard = Principal;
