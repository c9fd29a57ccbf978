use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{
    auth::Principal,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}

async fn me(principal: AuthGuard) -> ApiResult<Principal> {
    JsonApiResponse::ok(principal)
}
