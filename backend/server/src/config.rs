use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Context, Result};
use tracing::{info, warn};

pub const MEMORY_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub seed_on_start: bool,
    pub cors_max_age_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            database_url: database_url(),
            seed_on_start: try_load("SEED_ON_START", "false")?,
            cors_max_age_secs: try_load("CORS_MAX_AGE_SECS", "3600")?,
        })
    }

    /// In-process store, ephemeral port. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            port: 0,
            database_url: MEMORY_URL.to_string(),
            seed_on_start: false,
            cors_max_age_secs: 3600,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key} value {raw:?}: {e}"))
}

fn database_url() -> String {
    if let Some(url) = var("DATABASE_URL") {
        return url;
    }

    match read_secret("DATABASE_URL") {
        Ok(url) => url,
        Err(e) => {
            warn!("DATABASE_URL not configured ({e:#}), using {MEMORY_URL}");
            MEMORY_URL.to_string()
        }
    }
}

fn read_secret(secret_name: &str) -> Result<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .with_context(|| format!("failed to read {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_default() {
        let port: u16 = try_load("INVENTORY_TEST_UNSET_PORT", "5000").unwrap();
        assert_eq!(port, 5000);
    }

    #[test]
    fn test_try_load_rejects_garbage() {
        let flag: Result<bool> = try_load("INVENTORY_TEST_UNSET_FLAG", "maybe");
        assert!(flag.is_err());
    }

    #[test]
    fn test_in_memory_config() {
        let config = Config::in_memory();
        assert_eq!(config.database_url, MEMORY_URL);
        assert_eq!(config.port, 0);
    }
}
