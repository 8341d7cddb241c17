use std::time::Duration;

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                     |
    /// |------------------------------|-----------------------------|
    /// | `CATALOG_API_URL`            | `http://localhost:3000/api` |
    /// | `CATALOG_API_TIMEOUT_SECS`   | `30`                        |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match std::env::var("CATALOG_API_URL") {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().trim_end_matches('/').to_string(),
            _ => defaults.api_url,
        };
        reqwest::Url::parse(&api_url).map_err(|e| ConfigError::Invalid {
            name: "CATALOG_API_URL",
            reason: e.to_string(),
        })?;

        let request_timeout = match std::env::var("CATALOG_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::Invalid {
                    name: "CATALOG_API_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?,
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            api_url,
            request_timeout,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}
