//! Client configuration.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::Error;

/// Configuration of a single [`TwinClient`](crate::TwinClient).
///
/// Immutable once the client is built. The base URL is stored with a
/// trailing slash so that endpoint paths join underneath it instead of
/// replacing its last segment.
///
/// # Example
///
/// ```rust
/// use twin::ClientConfig;
///
/// let config = ClientConfig::parse("https://41aa.tq.biz.todaq.net")
///     .unwrap()
///     .with_api_key("8c0b7fb3-c832-4c54-9f8f-3a5e8eef4e52");
/// assert_eq!(config.base_url().as_str(), "https://41aa.tq.biz.todaq.net/");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URL of the twin this client talks to.
    #[serde(deserialize_with = "deserialize_base_url")]
    base_url: Url,

    /// API key sent as the `apiKey` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration for the twin at `base_url`, without API key.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: normalize(base_url),
            api_key: None,
        }
    }

    /// Parses `base_url` and creates a configuration for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlParse`] if `base_url` is not an absolute URL.
    pub fn parse(base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url).map_err(|source| Error::UrlParse {
            context: "Failed to parse twin base URL",
            source,
        })?;
        Ok(Self::new(url))
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Returns the base URL, always ending in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the API key, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl TryFrom<&str> for ClientConfig {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn normalize(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn deserialize_base_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Url, D::Error> {
    Url::deserialize(deserializer).map(normalize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_added_once() {
        let a = ClientConfig::parse("http://localhost:8089").unwrap();
        let b = ClientConfig::parse("http://localhost:8089/").unwrap();
        assert_eq!(a.base_url().as_str(), "http://localhost:8089/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_path_prefix_preserved() {
        let config = ClientConfig::parse("https://gateway.example/twins/41aa").unwrap();
        assert_eq!(
            config.base_url().join("info").unwrap().as_str(),
            "https://gateway.example/twins/41aa/info"
        );
    }

    #[test]
    fn test_relative_url_rejected() {
        let err = ClientConfig::parse("not a url").unwrap_err();
        assert!(matches!(err, Error::UrlParse { .. }));
    }

    #[test]
    fn test_deserialize() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "baseUrl": "https://twin.example", "apiKey": "secret" }"#,
        )
        .unwrap();
        assert_eq!(config.base_url().as_str(), "https://twin.example/");
        assert_eq!(config.api_key(), Some("secret"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::parse("https://twin.example")
            .unwrap()
            .with_api_key("secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
