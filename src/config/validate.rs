use anyhow::{Result, bail};

use super::{AppConfig, defaults};

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    let auth = &cfg.auth;

    if auth.access_secret.trim().is_empty() {
        errors.push("auth.access_secret must not be empty".to_string());
    }

    if auth.refresh_secret.trim().is_empty() {
        errors.push("auth.refresh_secret must not be empty".to_string());
    }

    if auth.access_secret == auth.refresh_secret {
        errors.push("auth.access_secret and auth.refresh_secret must differ".to_string());
    }

    if !cfg!(debug_assertions)
        && (auth.access_secret == defaults::DEFAULT_ACCESS_SECRET
            || auth.refresh_secret == defaults::DEFAULT_REFRESH_SECRET)
    {
        errors.push("auth secrets must be set explicitly in release builds".to_string());
    }

    if auth.access_ttl_secs == 0 {
        errors.push("auth.access_ttl_secs must be > 0".to_string());
    }

    if auth.refresh_ttl_secs <= 0 {
        errors.push("auth.refresh_ttl_secs must be > 0".to_string());
    }

    if auth.hash_work_factor == 0 || auth.hash_work_factor > 64 {
        errors.push(format!(
            "auth.hash_work_factor ({}) must be between 1 and 64",
            auth.hash_work_factor
        ));
    }

    if let Some(admin) = auth.admin.as_ref() {
        if admin.username.trim().is_empty() {
            errors.push("auth.admin.username must not be empty".to_string());
        }

        if admin.email.trim().is_empty() {
            errors.push("auth.admin.email must not be empty".to_string());
        }

        if admin.password.len() < 8 {
            errors.push("auth.admin.password must be at least 8 characters".to_string());
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
