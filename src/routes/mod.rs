pub mod admin;
pub mod auth;
pub mod protected;
pub mod public;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(public::router())
        .merge(auth::router(state.clone()))
        .merge(protected::router(state.clone()))
        .merge(admin::router(state));

    Router::new().nest(API_PREFIX, api)
}
