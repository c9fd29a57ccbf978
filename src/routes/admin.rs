use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{Role, RoleRequirement, RequireRolesLayer},
    middleware::{AuthGuard, bearer_auth},
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    // Later-added route_layer wraps the earlier one, so bearer_auth runs
    // first and the role layer sees its principal.
    Router::new()
        .route("/admin/stats", get(admin_stats))
        .route("/admin/users/{id}/active", post(set_active))
        .route_layer(RequireRolesLayer::new(RoleRequirement::any_of([
            Role::Admin,
        ])))
        .route_layer(from_fn_with_state(state.clone(), bearer_auth))
        .with_state(state)
}

async fn admin_stats(principal: AuthGuard) -> ApiResult<serde_json::Value> {
    JsonApiResponse::ok(serde_json::json!({ "ok": true, "admin": principal.username }))
}

async fn set_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    _principal: AuthGuard,
    Json(body): Json<SetActiveRequest>,
) -> ApiResult<serde_json::Value> {
    state.store.set_active(&id, body.active).await?;
    JsonApiResponse::ok(serde_json::json!({ "ok": true, "id": id, "active": body.active }))
}
