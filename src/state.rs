use std::sync::Arc;

use crate::{
    auth::TokenCodec,
    config::AppConfig,
    error::AppError,
    middleware::AccessVerifier,
    services::SessionManager,
    store::UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn UserStore>,
    pub sessions: SessionManager,
    pub verifier: AccessVerifier,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn UserStore>) -> Result<Arc<Self>, AppError> {
        let sessions = SessionManager::new(store.clone(), &config.auth)?;
        let verifier = AccessVerifier::new(TokenCodec::new(&config.auth), store.clone());

        Ok(Arc::new(Self {
            config,
            store,
            sessions,
            verifier,
        }))
    }
}
