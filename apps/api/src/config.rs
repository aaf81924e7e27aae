use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::catalog::FallbackPolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON catalog replacing the built-in role table.
    pub skill_catalog_path: Option<PathBuf>,
    pub role_fallback: FallbackPolicy,
    pub extraction_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            skill_catalog_path: None,
            role_fallback: FallbackPolicy::Full,
            extraction_timeout: Duration::from_secs(10),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: match lookup("PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            skill_catalog_path: lookup("SKILL_CATALOG_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            role_fallback: match lookup("ROLE_FALLBACK") {
                Some(v) => v
                    .parse::<FallbackPolicy>()
                    .map_err(anyhow::Error::msg)
                    .context("ROLE_FALLBACK is invalid")?,
                None => defaults.role_fallback,
            },
            extraction_timeout: match lookup("EXTRACTION_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse::<u64>()
                        .context("EXTRACTION_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                None => defaults.extraction_timeout,
            },
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => defaults.max_upload_bytes,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert!(config.skill_catalog_path.is_none());
        assert_eq!(config.role_fallback, FallbackPolicy::Full);
        assert_eq!(config.extraction_timeout, Duration::from_secs(10));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9090"),
            ("SKILL_CATALOG_PATH", "/etc/skills.json"),
            ("ROLE_FALLBACK", "exact_only"),
            ("EXTRACTION_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.skill_catalog_path,
            Some(PathBuf::from("/etc/skills.json"))
        );
        assert_eq!(config.role_fallback, FallbackPolicy::ExactOnly);
        assert_eq!(config.extraction_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ROLE_FALLBACK", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("EXTRACTION_TIMEOUT_SECS", "-1")])).is_err());
    }
}
