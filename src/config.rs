use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a provider lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `<PREFIX>_API_URL` and `<PREFIX>_TIMEOUT_SECS` (default 30).
    pub fn from_env(prefix: &str) -> Result<Self, env::VarError> {
        let prefix = prefix.to_uppercase();
        let mut config = Self::new(env::var(format!("{prefix}_API_URL"))?);
        config.timeout = Duration::from_secs(
            env::var(format!("{prefix}_TIMEOUT_SECS"))
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        );
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ProviderConfig::new("https://api.dynect.net/REST/");
        assert_eq!(config.api_url, "https://api.dynect.net/REST");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_env_requires_url() {
        assert!(ProviderConfig::from_env("dns_mgmt_test_unset_prefix").is_err());
    }

    #[test]
    fn test_with_timeout() {
        let config = ProviderConfig::new("http://localhost").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
