//! Client configuration shared by the completion provider and the assistants backend.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use sizzle::ClientConfig;
//!
//! let config = ClientConfig::new("sk-test")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_max_attempts(3);
//! assert_eq!(config.retry.max_attempts, 3);
//! ```

use std::time::Duration;

use crate::{ProviderError, RetryPolicy};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const TIMEOUT_ENV: &str = "SIZZLE_TIMEOUT_SECS";
pub const MAX_ATTEMPTS_ENV: &str = "SIZZLE_MAX_ATTEMPTS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: Duration::from_secs(90),
            retry: RetryPolicy::default(),
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Reads the client configuration from process environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read(API_KEY_ENV).ok_or_else(|| {
            ProviderError::authentication(format!("{API_KEY_ENV} is not set"))
        })?;
        let mut config = Self::new(api_key);

        if let Some(base_url) = read(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = read(TIMEOUT_ENV) {
            let secs = parse_positive(TIMEOUT_ENV, &raw)?;
            config = config.with_timeout(Duration::from_secs(secs.into()));
        }
        if let Some(raw) = read(MAX_ATTEMPTS_ENV) {
            config = config.with_max_attempts(parse_positive(MAX_ATTEMPTS_ENV, &raw)?);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u32, ProviderError> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ProviderError::invalid_request(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::ProviderErrorKind;

    use super::{ClientConfig, MAX_ATTEMPTS_ENV, TIMEOUT_ENV};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn from_lookup_requires_api_key() {
        let error = ClientConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")]))
            .expect_err("blank key should be rejected");
        assert_eq!(error.kind, ProviderErrorKind::Authentication);
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")]))
            .expect("config should load");

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, None);
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn from_lookup_reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            (TIMEOUT_ENV, "15"),
            (MAX_ATTEMPTS_ENV, "2"),
        ]))
        .expect("config should load");

        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.retry.max_attempts, 2);
    }

    #[test]
    fn from_lookup_rejects_non_positive_numbers() {
        let error = ClientConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            (MAX_ATTEMPTS_ENV, "0"),
        ]))
        .expect_err("zero attempts should be rejected");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);

        let error = ClientConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            (TIMEOUT_ENV, "soon"),
        ]))
        .expect_err("non-numeric timeout should be rejected");
        assert!(error.message.contains(TIMEOUT_ENV));
    }
}
