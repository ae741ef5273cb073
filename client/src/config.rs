use crate::error::ClientError;
use reqwest::Url;
use std::env;

pub const API_BASE_ENV: &str = "DOCQA_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: String,
}

impl ClientConfig {
    /// Accepts an absolute http(s) URL, optionally with a path prefix such as
    /// `http://host/api`. Trailing slashes are dropped.
    pub fn new(api_base: impl Into<String>) -> Result<Self, ClientError> {
        let raw = api_base.into();
        let trimmed = raw.trim().trim_end_matches('/').to_string();

        match Url::parse(&trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(Self { api_base: trimmed })
            }
            _ => Err(ClientError::InvalidBaseUrl(raw)),
        }
    }

    /// Reads `DOCQA_API_BASE`, falling back to the local default when the
    /// variable is unset or blank.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_base = env::var(API_BASE_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self::new(api_base)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_prefix_and_path() {
        let config = ClientConfig::new("http://example.com/api/").unwrap();
        assert_eq!(config.api_base(), "http://example.com/api");
        assert_eq!(config.endpoint("/health"), "http://example.com/api/health");
        assert_eq!(config.endpoint("documents"), "http://example.com/api/documents");
    }

    #[test]
    fn rejects_relative_and_non_http_bases() {
        assert!(matches!(ClientConfig::new("/api"), Err(ClientError::InvalidBaseUrl(_))));
        assert!(matches!(ClientConfig::new("localhost:8000"), Err(ClientError::InvalidBaseUrl(_))));
        assert!(ClientConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn default_points_at_local_backend() {
        assert_eq!(ClientConfig::default().endpoint("query"), "http://localhost:8000/query");
    }
}
