//! Probe target configuration.
//!
//! Resolves the base URL, shared secret, and timeout from multiple sources
//! with a fixed priority: command-line flag, then `~/.tradeprobe/config.toml`,
//! then environment variables, then the documented default. Which
//! environment variables hold the secret depends on the probe plan, so the
//! secret resolver takes the plan's variable names as input.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::{Error, Result};

/// Default probe target when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "TRADEPROBE_BASE_URL";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;

/// CLI configuration stored in ~/.tradeprobe/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the probed API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Shared signing secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.tradeprobe/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| Error::config("Unable to determine home directory"))?;

        let mut path = PathBuf::from(home);
        path.push(".tradeprobe");
        path.push("config.toml");

        Ok(path)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize configuration: {}", e)))?;
        std::fs::write(path, contents)?;

        Ok(())
    }
}

/// Resolve the base URL from multiple sources
///
/// Checks sources in the following priority order:
/// 1. Command-line argument or --base-url flag
/// 2. ~/.tradeprobe/config.toml
/// 3. TRADEPROBE_BASE_URL environment variable
/// 4. Default: http://localhost:8000
///
/// The winning value is validated as an absolute http(s) URL and returned
/// without a trailing slash so case paths can be appended directly.
pub fn resolve_base_url(base_url_flag: Option<String>) -> Result<String> {
    let raw = if let Some(url) = base_url_flag {
        debug!("Using base URL from command line: {}", url);
        url
    } else if let Some(url) = CliConfig::load().ok().and_then(|c| c.base_url).filter(|u| !u.is_empty())
    {
        debug!("Using base URL from config file: {}", url);
        url
    } else if let Ok(url) = std::env::var(BASE_URL_ENV) {
        if url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            debug!("Using base URL from {} environment variable: {}", BASE_URL_ENV, url);
            url
        }
    } else {
        debug!("Using default base URL: {}", DEFAULT_BASE_URL);
        DEFAULT_BASE_URL.to_string()
    };

    let parsed = Url::parse(&raw)
        .map_err(|e| Error::config(format!("Invalid base URL '{}': {}", raw, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::config(format!(
            "Invalid base URL '{}': scheme must be http or https",
            raw
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// Resolve the shared secret from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --secret flag
/// 2. --secret-file flag
/// 3. ~/.tradeprobe/config.toml
/// 4. The plan's environment variables, in order
///
/// Returns `None` when no source has a non-empty secret; the plan's secret
/// policy decides whether that skips the signed cases or aborts the run.
pub fn resolve_secret(
    secret_flag: Option<String>,
    secret_file_flag: Option<PathBuf>,
    env_names: &[&str],
) -> Result<Option<String>> {
    if let Some(secret) = secret_flag.filter(|s| !s.is_empty()) {
        debug!("Using secret from --secret flag");
        return Ok(Some(secret));
    }

    if let Some(secret_file) = secret_file_flag {
        debug!("Reading secret from file: {}", secret_file.display());
        let secret = std::fs::read_to_string(&secret_file)?.trim().to_string();
        if secret.is_empty() {
            return Err(Error::config(format!(
                "Secret file is empty: {}",
                secret_file.display()
            )));
        }
        return Ok(Some(secret));
    }

    if let Ok(config) = CliConfig::load() {
        if let Some(secret) = config.secret.filter(|s| !s.is_empty()) {
            debug!("Using secret from config file");
            return Ok(Some(secret));
        }
    }

    for name in env_names {
        if let Ok(secret) = std::env::var(name) {
            if !secret.is_empty() {
                debug!("Using secret from {} environment variable", name);
                return Ok(Some(secret));
            }
        }
    }

    Ok(None)
}

/// Resolve the timeout from flag, config file, or default
pub fn resolve_timeout(timeout_flag: Option<u64>) -> u64 {
    if let Some(timeout) = timeout_flag {
        debug!("Using timeout from --timeout flag: {} seconds", timeout);
        return timeout;
    }

    if let Some(timeout) = CliConfig::load().ok().and_then(|c| c.timeout) {
        debug!("Using timeout from config file: {} seconds", timeout);
        return timeout;
    }

    DEFAULT_TIMEOUT
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.secret.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = CliConfig {
            base_url: Some("http://example.com".to_string()),
            secret: Some("testsecret".to_string()),
            timeout: Some(60),
        };

        config.save_to_path(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = CliConfig::load_from_path(&config_path).unwrap();
        assert_eq!(loaded.base_url, config.base_url);
        assert_eq!(loaded.secret, config.secret);
        assert_eq!(loaded.timeout, config.timeout);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let loaded = CliConfig::load_from_path(&config_path).unwrap();
        assert!(loaded.base_url.is_none());
    }

    #[test]
    fn test_resolve_base_url_from_flag_trims_slash() {
        let url = resolve_base_url(Some("http://api.example.com/".to_string())).unwrap();
        assert_eq!(url, "http://api.example.com");
    }

    #[test]
    fn test_resolve_base_url_rejects_garbage() {
        assert!(resolve_base_url(Some("not a url".to_string())).is_err());
        assert!(resolve_base_url(Some("ftp://example.com".to_string())).is_err());
    }

    #[test]
    fn test_resolve_secret_flag_wins() {
        let secret =
            resolve_secret(Some("from-flag".to_string()), None, &["TRADEPROBE_TEST_UNSET"])
                .unwrap();
        assert_eq!(secret.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_resolve_secret_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let secret_path = temp_dir.path().join("secret");
        std::fs::write(&secret_path, "s3cret\n").unwrap();

        let secret = resolve_secret(None, Some(secret_path), &[]).unwrap();
        assert_eq!(secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_resolve_secret_empty_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let secret_path = temp_dir.path().join("secret");
        std::fs::write(&secret_path, "").unwrap();

        assert!(resolve_secret(None, Some(secret_path), &[]).is_err());
    }

    #[test]
    fn test_resolve_secret_absent() {
        let secret = resolve_secret(None, None, &["TRADEPROBE_TEST_UNSET"]).unwrap();
        assert!(secret.is_none());
    }

    #[test]
    fn test_resolve_timeout_default() {
        assert_eq!(resolve_timeout(Some(5)), 5);
    }
}
