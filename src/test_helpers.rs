use std::sync::Arc;

use axum::Router;

use crate::{
    config::{AppConfig, AuthConfig},
    routes::router,
    state::AppState,
    store::MemoryUserStore,
};

pub fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            // Keep hashing fast in tests.
            hash_work_factor: 1,
            ..AuthConfig::default()
        },
        ..AppConfig::default()
    }
}

pub fn test_state() -> Arc<AppState> {
    let store = Arc::new(MemoryUserStore::new());
    AppState::new(test_config(), store).expect("build app state")
}

pub fn test_router(state: Arc<AppState>) -> Router {
    router(state)
}
