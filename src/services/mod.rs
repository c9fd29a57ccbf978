pub mod credentials;
pub mod session;

pub use credentials::CredentialValidator;
pub use session::{NewAccount, SessionManager};
