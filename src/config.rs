// src/config.rs
// =============================================================================
// Settings for one link-checking run.
//
// The values come from the command line (or the matching environment
// variables, see cli.rs) and are checked here once, so the rest of the
// program can rely on them being sane.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

use crate::checker::DEFAULT_MAX_REDIRECTS;

/// How long a single HTTP request may take
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How many links are checked at the same time
pub const DEFAULT_CONCURRENCY: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("--timeout must be at least 1 second")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Redirect budget per link
    pub max_redirects: usize,
    /// Timeout per HTTP request
    pub timeout: Duration,
    /// Upper bound on links checked concurrently
    pub concurrency: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: default_user_agent(),
        }
    }
}

impl CheckConfig {
    /// Builds a config from raw values, rejecting ones that can't work.
    pub fn new(
        max_redirects: usize,
        timeout_secs: u64,
        concurrency: usize,
        user_agent: Option<String>,
    ) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            max_redirects,
            timeout: Duration::from_secs(timeout_secs),
            concurrency,
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        })
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.concurrency, 50);
        assert!(config.user_agent.starts_with("locale-link-check/"));
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(
            CheckConfig::new(10, 10, 0, None).unwrap_err(),
            ConfigError::ZeroConcurrency
        );
        assert_eq!(
            CheckConfig::new(10, 0, 5, None).unwrap_err(),
            ConfigError::ZeroTimeout
        );
    }

    #[test]
    fn test_custom_user_agent() {
        let config = CheckConfig::new(3, 5, 2, Some("bot/1.0".to_string())).unwrap();
        assert_eq!(config.user_agent, "bot/1.0");
        assert_eq!(config.max_redirects, 3);
    }
}
