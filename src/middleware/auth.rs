use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    auth::{Principal, TokenCodec},
    error::AppError,
    state::AppState,
};
use crate::store::UserStore;

/// Turns a bearer access token into a `Principal`. Decoding alone is
/// not enough: the user row is re-checked on every request, so deleted
/// and deactivated accounts lose access before their tokens expire.
#[derive(Clone)]
pub struct AccessVerifier {
    codec: TokenCodec,
    store: Arc<dyn UserStore>,
}

impl AccessVerifier {
    pub fn new(codec: TokenCodec, store: Arc<dyn UserStore>) -> Self {
        Self { codec, store }
    }

    pub async fn verify_bearer(&self, token: &str) -> Result<Principal, AppError> {
        let claims = self.codec.verify_access(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        let user = self
            .store
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        if !user.is_active {
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        Ok(Principal {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        })
    }
}

pub async fn bearer_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::unauthorized("Missing/invalid Authorization header").into_response()
    })?;

    let principal = state
        .verifier
        .verify_bearer(token)
        .await
        .map_err(|err| err.into_response())?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
