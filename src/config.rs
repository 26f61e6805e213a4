//! Client configuration for java2uml.
//!
//! A configuration names the server to talk to and how patient the client
//! should be with it. It can be built in code or loaded from YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `http://localhost:8090/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds (default: 60000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Headers sent with every request, passed through untouched
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub poll: PollConfig,
}

/// Polling behaviour for endpoints that answer 202 while the server works.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PollConfig {
    /// Delay between attempts in milliseconds (default: 500)
    #[serde(default)]
    pub delay_ms: Option<u64>,
    /// Total attempts per polling call, the first one included (default: 10)
    #[serde(default)]
    pub retry_limit: Option<u32>,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8090/api";
pub const DEFAULT_POLL_DELAY_MS: u64 = 500;
pub const DEFAULT_RETRY_LIMIT: u32 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    60_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
            headers: BTreeMap::new(),
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the given base URL with every other value defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml)?;
        validate(&config)?;
        Ok(config)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll.delay_ms = Some(delay.as_millis() as u64);
        self
    }

    pub fn with_retry_limit(mut self, limit: u32) -> Self {
        self.poll.retry_limit = Some(limit);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the delay between polling attempts (defaults to 500ms).
    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll.delay_ms.unwrap_or(DEFAULT_POLL_DELAY_MS))
    }

    /// Returns the default number of attempts for polling calls (defaults to 10).
    pub fn retry_limit(&self) -> u32 {
        self.poll.retry_limit.unwrap_or(DEFAULT_RETRY_LIMIT)
    }

    /// Polling policy with the configured delay and the given attempt budget.
    pub fn retry_policy(&self, retry_limit: u32) -> RetryPolicy {
        RetryPolicy::new(retry_limit, self.poll_delay())
    }

    /// Upper bound on how long a polling call with `retry_limit` attempts
    /// can take before it gives up.
    pub fn worst_case_poll_latency(&self, retry_limit: u32) -> Duration {
        let attempts = retry_limit.max(1);
        self.timeout() * attempts + self.poll_delay() * (attempts - 1)
    }
}

/// Validate a configuration for correctness.
pub fn validate(config: &ClientConfig) -> anyhow::Result<()> {
    let base = config.base_url.trim();
    if base.is_empty() {
        anyhow::bail!("base_url must not be empty");
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("base_url {:?} must start with http:// or https://", base);
    }
    if config.timeout_ms == 0 {
        anyhow::bail!("timeout_ms must be greater than zero");
    }
    for name in config.headers.keys() {
        reqwest::header::HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid header name {:?}: {}", name, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
base_url: "https://j2u.example.com/api"
timeout_ms: 5000
headers:
  X-Api-Key: "secret"
poll:
  delay_ms: 250
  retry_limit: 4
"#;
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "https://j2u.example.com/api");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.headers.get("X-Api-Key").map(String::as_str), Some("secret"));
        assert_eq!(config.poll_delay(), Duration::from_millis(250));
        assert_eq!(config.retry_limit(), 4);
    }

    #[test]
    fn test_poll_defaults() {
        let config = ClientConfig::from_yaml_str("base_url: http://localhost:1/api").unwrap();
        assert_eq!(config.poll_delay(), Duration::from_millis(500));
        assert_eq!(config.retry_limit(), 10);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_empty_yaml_uses_local_server() {
        let config = ClientConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ClientConfig::from_yaml_str("base_url: ftp://nope").is_err());
        assert!(ClientConfig::from_yaml_str("base_url: ''").is_err());
    }

    #[test]
    fn test_rejects_bad_header_name() {
        let config = ClientConfig::new("http://localhost").with_header("bad header", "x");
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_worst_case_latency() {
        let config = ClientConfig::new("http://localhost")
            .with_timeout(Duration::from_secs(2))
            .with_poll_delay(Duration::from_millis(500));
        assert_eq!(
            config.worst_case_poll_latency(3),
            Duration::from_millis(2000 * 3 + 500 * 2)
        );
        assert_eq!(config.worst_case_poll_latency(0), Duration::from_secs(2));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("java2uml.yaml");
        fs::write(&path, "base_url: http://127.0.0.1:8090/api\ntimeout_ms: 1000\n").unwrap();

        let config = ClientConfig::parse_file(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8090/api");
        assert_eq!(config.timeout_ms, 1000);
    }
}
