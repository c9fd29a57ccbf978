use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{defaults, validate};

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Reads `APP_`-prefixed environment variables, `__` separating the
    /// nesting levels (`APP_AUTH__ACCESS_SECRET` → `auth.access_secret`),
    /// after loading `.env` from the crate root if present.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_env_prefixed(ENV_PREFIX)
    }

    fn from_env_prefixed(prefix: &str) -> Result<Self> {
        let settings = config_rs::Config::builder()
            .add_source(
                config_rs::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read environment variables for config")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        validate::validate(&cfg)?;
        Ok(cfg)
    }
}

fn load_dotenv() {
    // Load .env from crate root (falls back to current dir if missing)
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT as u16,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

/// Session-token settings. Access and refresh tokens are signed with
/// independent secrets so that one class can never forge the other.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub access_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_secret: String,
    pub refresh_ttl_secs: i64,
    pub hash_work_factor: u32,
    pub admin: Option<AdminSeedConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: defaults::DEFAULT_ACCESS_SECRET.to_string(),
            access_ttl_secs: defaults::DEFAULT_ACCESS_TTL_SECS as u64,
            refresh_secret: defaults::DEFAULT_REFRESH_SECRET.to_string(),
            refresh_ttl_secs: defaults::DEFAULT_REFRESH_TTL_SECS,
            hash_work_factor: defaults::DEFAULT_HASH_WORK_FACTOR as u32,
            admin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSeedConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}
