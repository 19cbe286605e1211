//! Connector configuration
//!
//! Runtime settings loaded from YAML. Everything has a default, so an empty
//! file (or no file) is a valid configuration; the API key may come from
//! the file or from `WEBINARJAM_API_KEY`, which wins when set.

use crate::auth::{ApiKeyCredential, API_KEY_ENV};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpTransportConfig, RateLimiterConfig};
use crate::types::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

// ============================================================================
// Connector Config
// ============================================================================

/// Runtime configuration for a connector client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Optional client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// API key (prefer the environment variable)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Extra routing table merged over the built-in ones
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: None,
            rate_limit: None,
            api_key: None,
            catalog: None,
        }
    }
}

impl ConnectorConfig {
    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&yaml)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load a config file if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Check field values
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be at least 1"));
        }

        if let Some(ref limit) = self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.requests_per_second",
                    "must be at least 1",
                ));
            }
        }

        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the API key from the environment, then the config
    pub fn credential(&self) -> Result<ApiKeyCredential> {
        self.credential_with_env(std::env::var(API_KEY_ENV).ok().as_deref())
    }

    /// Resolve the API key given the value of the environment variable
    pub fn credential_with_env(&self, env_value: Option<&str>) -> Result<ApiKeyCredential> {
        let from_env = env_value.map(str::trim).filter(|v| !v.is_empty());
        let from_file = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty());

        from_env
            .or(from_file)
            .map(ApiKeyCredential::new)
            .ok_or_else(|| {
                Error::config(format!(
                    "No API key: set {API_KEY_ENV} or api_key in the config file"
                ))
            })
    }

    /// Transport settings derived from this config
    pub fn to_transport_config(&self) -> HttpTransportConfig {
        let mut builder = HttpTransportConfig::builder().timeout(self.timeout());
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(ref limit) = self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ConnectorConfig::default();
        assert_eq!(config.base_url, "https://api.webinarjam.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.rate_limit.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            ConnectorConfig::from_yaml_str("").unwrap(),
            ConnectorConfig::default()
        );
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r"
base_url: http://localhost:8080
timeout_secs: 5
user_agent: my-agent/2.0
rate_limit:
  requests_per_second: 2
api_key: from-file
catalog: tables/extra.yaml
";
        let config = ConnectorConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 1)));
        assert_eq!(config.catalog, Some(PathBuf::from("tables/extra.yaml")));

        let transport = config.to_transport_config();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.user_agent, "my-agent/2.0");
        assert_eq!(transport.rate_limit, Some(RateLimiterConfig::new(2, 1)));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = ConnectorConfig::from_yaml_str("retries: 3").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ConnectorConfig::from_yaml_str("base_url: not a url").unwrap_err(),
            Error::InvalidUrl(_)
        ));
        assert!(matches!(
            ConnectorConfig::from_yaml_str("base_url: ftp://example.com").unwrap_err(),
            Error::InvalidConfigValue { .. }
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ConnectorConfig::from_yaml_str("timeout_secs: 0").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_credential_env_wins() {
        let config = ConnectorConfig::default().with_api_key("from-file");
        assert_eq!(
            config.credential_with_env(Some("from-env")).unwrap().api_key(),
            "from-env"
        );
        assert_eq!(
            config.credential_with_env(Some("  ")).unwrap().api_key(),
            "from-file"
        );
        assert_eq!(
            config.credential_with_env(None).unwrap().api_key(),
            "from-file"
        );
    }

    #[test]
    fn test_credential_missing() {
        let err = ConnectorConfig::default()
            .credential_with_env(None)
            .unwrap_err();
        assert!(err.to_string().contains("WEBINARJAM_API_KEY"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://127.0.0.1:9999").unwrap();

        let config = ConnectorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_from_missing_file() {
        let err = ConnectorConfig::from_file("/nonexistent/webinarjam.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
