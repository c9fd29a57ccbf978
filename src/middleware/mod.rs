pub mod auth;
pub mod guards;

pub use auth::{AccessVerifier, bearer_auth};
pub use guards::AuthGuard;
