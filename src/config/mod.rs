pub mod configs;
pub mod defaults;
pub mod validate;

pub use configs::{AdminSeedConfig, AppConfig, AuthConfig, GeneralConfig, LoggingConfig};
