//! Steam Web API catalog client implementation.

use crate::fetcher::CatalogFetcher;
use async_trait::async_trait;
use quickplay_core::{QuickplayError, RawServerDescriptor, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The Steam Web API base URL
const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";

/// Path of the server list endpoint
const SERVER_LIST_PATH: &str = "/IGameServersService/GetServerList/v1/";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog client for the `IGameServersService/GetServerList` Web API
/// endpoint.
///
/// This is plain HTTPS against the Web API, not the legacy UDP
/// master-server query protocol.
#[derive(Clone)]
pub struct WebApiCatalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    http: HttpClient,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

/// Response envelope around the server list; `servers` is omitted entirely
/// when nothing matches the filter.
#[derive(Debug, Default, Deserialize)]
struct ServerListEnvelope {
    #[serde(default)]
    response: ServerList,
}

#[derive(Debug, Default, Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: Vec<RawServerDescriptor>,
}

impl WebApiCatalog {
    /// Create a new catalog client with the given API key using default
    /// settings
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        WebApiCatalogBuilder::new(api_key).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> WebApiCatalogBuilder {
        WebApiCatalogBuilder::new(api_key)
    }

    /// Perform a GET request with query parameters
    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        Self::handle_response(response).await
    }

    /// Convert a reqwest transport failure into the upstream error class
    fn map_transport_error(&self, e: &reqwest::Error) -> QuickplayError {
        if e.is_timeout() {
            QuickplayError::Timeout(self.inner.timeout.as_secs())
        } else {
            QuickplayError::Http(e.to_string())
        }
    }

    /// Build a URL with query parameters (including API key)
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.inner.base_url, path);

        url.push_str("?key=");
        url.push_str(&self.inner.api_key);

        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| QuickplayError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(QuickplayError::Json)
        } else {
            Self::handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response into a QuickplayError
    async fn handle_error<T>(status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        // Try to parse an error message out of a JSON body
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        if status == 401 || status == 403 {
            return Err(QuickplayError::Unauthorized);
        }
        if status == 429 {
            warn!("rate limited by the Steam Web API");
        }
        Err(QuickplayError::Api {
            code: status,
            message,
        })
    }
}

#[async_trait]
impl CatalogFetcher for WebApiCatalog {
    async fn fetch(&self, filter: &str, max: usize) -> Result<Vec<RawServerDescriptor>> {
        let limit = max.to_string();
        let envelope: ServerListEnvelope = self
            .get_with_query(SERVER_LIST_PATH, &[("filter", filter), ("limit", &limit)])
            .await?;

        debug!(
            servers = envelope.response.servers.len(),
            "catalog fetch complete"
        );
        Ok(envelope.response.servers)
    }
}

/// Builder for configuring a [`WebApiCatalog`]
pub struct WebApiCatalogBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl WebApiCatalogBuilder {
    /// Create a new builder with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("quickplay-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the catalog client
    #[must_use]
    pub fn build(self) -> WebApiCatalog {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .expect("Failed to build HTTP client");

        WebApiCatalog {
            inner: Arc::new(CatalogInner {
                http,
                api_key: self.api_key,
                base_url: self.base_url,
                timeout: self.timeout,
            }),
        }
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FILTER: &str = r"\appid\440\gametype\truequickplay\secure\1";

    fn catalog_for(server: &MockServer) -> WebApiCatalog {
        WebApiCatalog::builder("test-key")
            .base_url(server.uri())
            .build()
    }

    #[tokio::test]
    async fn test_fetch_parses_server_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SERVER_LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {
                    "servers": [
                        {
                            "addr": "192.0.2.1:27015",
                            "name": "alpha",
                            "players": 12,
                            "max_players": 24,
                            "region": 3,
                            "map": "pl_upward",
                            "secure": true
                        },
                        {
                            "addr": "192.0.2.2:27015",
                            "name": "beta"
                        }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let servers = catalog_for(&server).fetch(FILTER, 20).await.unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].name, "alpha");
        assert_eq!(servers[0].players, 12);
        assert_eq!(servers[0].region, Some(3));
        assert_eq!(servers[0].map.as_deref(), Some("pl_upward"));
        // Partial second record fills in defaults.
        assert_eq!(servers[1].players, 0);
        assert!(!servers[1].secure);
    }

    #[tokio::test]
    async fn test_fetch_sends_key_filter_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SERVER_LIST_PATH))
            .and(query_param("key", "test-key"))
            .and(query_param("filter", FILTER))
            .and(query_param("limit", "20"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": {"servers": []}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let servers = catalog_for(&server).fetch(FILTER, 20).await.unwrap();
        assert!(servers.is_empty());
    }

    #[tokio::test]
    async fn test_empty_envelope_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": {}})))
            .mount(&server)
            .await;

        let servers = catalog_for(&server).fetch(FILTER, 20).await.unwrap();
        assert!(servers.is_empty());
    }

    #[tokio::test]
    async fn test_missing_envelope_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let servers = catalog_for(&server).fetch(FILTER, 20).await.unwrap();
        assert!(servers.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_on_401() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch(FILTER, 20).await.unwrap_err();
        assert!(matches!(err, QuickplayError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unauthorized_on_403() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch(FILTER, 20).await.unwrap_err();
        assert!(matches!(err, QuickplayError::Unauthorized));
    }

    #[tokio::test]
    async fn test_api_error_with_json_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "backend unavailable"})),
            )
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch(FILTER, 20).await.unwrap_err();
        match err {
            QuickplayError::Api { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "backend unavailable");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_with_plain_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch(FILTER, 20).await.unwrap_err();
        match err {
            QuickplayError::Api { code, message } => {
                assert_eq!(code, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = catalog_for(&server).fetch(FILTER, 20).await.unwrap_err();
        assert!(matches!(err, QuickplayError::Json(_)));
    }
}
