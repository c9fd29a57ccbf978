pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_HASH_WORK_FACTOR: i64 = 10;

// Debug-build fallbacks only; validation refuses them in release builds.
pub const DEFAULT_ACCESS_SECRET: &str = "dev-access-secret-change-me";
pub const DEFAULT_REFRESH_SECRET: &str = "dev-refresh-secret-change-me";
