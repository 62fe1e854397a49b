//! Adapter configuration
//!
//! Connection settings for the Mage API: base URL, optional API key and
//! request timeout.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:6789/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("api_url cannot be empty")]
    EmptyUrl,

    #[error("api_url must start with http:// or https://")]
    InvalidUrl,

    #[error("timeout must be greater than 0")]
    ZeroTimeout,

    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Adapter configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Mage API base URL (e.g., "http://localhost:6789/api/")
    pub api_url: String,

    /// Sent as `X-API-KEY`; an empty key is treated as no key
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Config {
    /// Creates a new configuration with the default timeout and no API key
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MAGE_API_URL (optional, default: http://localhost:6789/api/)
    /// - MAGE_API_KEY (optional)
    /// - MAGE_API_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("MAGE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = lookup("MAGE_API_KEY").filter(|key| !key.is_empty());

        let timeout = match lookup("MAGE_API_TIMEOUT") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "MAGE_API_TIMEOUT",
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            api_key,
            timeout,
        })
    }

    /// Replaces the settings that were given explicitly, e.g. on the command
    /// line; an empty key clears the key
    pub fn apply_overrides(
        mut self,
        api_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(api_key) = api_key {
            self.api_key = Some(api_key).filter(|key| !key.is_empty());
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl);
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:6789/api/");
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.api_url = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyUrl));

        config.api_url = "localhost:6789".to_string();
        assert_eq!(config.validate(), Err(ConfigError::InvalidUrl));

        config.api_url = "https://mage.example.com/api/".to_string();
        assert!(config.validate().is_ok());

        config.timeout = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_from_env_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_from_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("MAGE_API_URL", "http://mage:6789/api/"),
            ("MAGE_API_KEY", "secret"),
            ("MAGE_API_TIMEOUT", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://mage:6789/api/");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_empty_key_and_bad_timeout() {
        let config = Config::from_lookup(lookup(&[("MAGE_API_KEY", "")])).unwrap();
        assert_eq!(config.api_key, None);

        let err = Config::from_lookup(lookup(&[("MAGE_API_TIMEOUT", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "MAGE_API_TIMEOUT",
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_overrides_replace_env_values() {
        let env = Config::from_lookup(lookup(&[
            ("MAGE_API_URL", "http://mage:6789/api/"),
            ("MAGE_API_KEY", "secret"),
            ("MAGE_API_TIMEOUT", "5"),
        ]))
        .unwrap();

        let kept = env.clone().apply_overrides(None, None, None);
        assert_eq!(kept.api_url, "http://mage:6789/api/");
        assert_eq!(kept.api_key.as_deref(), Some("secret"));
        assert_eq!(kept.timeout, Duration::from_secs(5));

        let replaced = env.apply_overrides(
            Some("https://other/api/".to_string()),
            Some(String::new()),
            Some(60),
        );
        assert_eq!(replaced.api_url, "https://other/api/");
        assert_eq!(replaced.api_key, None);
        assert_eq!(replaced.timeout, Duration::from_secs(60));
    }
}
