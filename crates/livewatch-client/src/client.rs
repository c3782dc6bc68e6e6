//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use livewatch_types::Channel;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::StreamApi;
use crate::error::{ApiError, Result};
use crate::types::{DataEnvelope, TokenInfo, UserRecord};

const DEFAULT_ID_BASE_URL: &str = "https://id.twitch.tv/oauth2";
const DEFAULT_HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Header carrying the application's client id on Helix calls.
const CLIENT_ID_HEADER: &str = "Client-Id";

/// Client for the identity and Helix endpoints.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HelixClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    id_base_url: Url,
    helix_base_url: Url,
    client_id: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for HelixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelixClient")
            .field("id_base_url", &self.inner.id_base_url.as_str())
            .field("helix_base_url", &self.inner.helix_base_url.as_str())
            .finish()
    }
}

impl HelixClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn id_base_url(&self) -> &Url {
        &self.inner.id_base_url
    }

    pub fn helix_base_url(&self) -> &Url {
        &self.inner.helix_base_url
    }

    fn join(base: &Url, path: &str) -> Result<Url> {
        base.join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidConfig(format!("bad endpoint path '{}': {}", path, e)))
    }

    fn bearer(token: &str) -> Result<HeaderValue> {
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::MalformedResponse("token is not a valid header value".into()))
    }

    /// GET a Helix endpoint with bearer and client-id headers.
    async fn helix_get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<reqwest::Response> {
        let url = Self::join(&self.inner.helix_base_url, path)?;
        let mut request = self
            .inner
            .http
            .get(url)
            .query(query)
            .header(AUTHORIZATION, Self::bearer(token)?)
            .header(CLIENT_ID_HEADER, &self.inner.client_id);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        Ok(request.send().await?)
    }

    /// Read the body and decode it, mapping failures by cause.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl StreamApi for HelixClient {
    async fn check_token(&self, token: &str) -> Result<Option<TokenInfo>> {
        let url = Self::join(&self.inner.id_base_url, "validate")?;
        let Ok(auth) = Self::bearer(token) else {
            return Ok(None);
        };
        let mut request = self.inner.http.get(url).header(AUTHORIZATION, auth);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Token rejected by validate endpoint");
            return Ok(None);
        }

        match Self::decode::<TokenInfo>(response).await {
            Ok(info) => Ok(Some(info)),
            Err(ApiError::NetworkError(e)) => Err(ApiError::NetworkError(e)),
            Err(e) => {
                tracing::debug!(error = %e, "Validate response had no user id");
                Ok(None)
            }
        }
    }

    async fn get_user_id(&self, token: &str) -> Result<String> {
        let response = self.helix_get("users", &[], token).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                endpoint: "users",
            });
        }

        let envelope: DataEnvelope<UserRecord> = Self::decode(response).await?;
        envelope
            .data
            .and_then(|users| users.into_iter().next())
            .map(|user| user.id)
            .ok_or_else(|| ApiError::MalformedResponse("users response contained no user".into()))
    }

    async fn get_followed_streams(&self, user_id: &str, token: &str) -> Result<Vec<Channel>> {
        let response = self
            .helix_get("streams/followed", &[("user_id", user_id)], token)
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                endpoint: "streams/followed",
            });
        }

        let envelope: DataEnvelope<Channel> = Self::decode(response).await?;
        let channels = envelope.data.unwrap_or_default();
        tracing::debug!(live = channels.len(), "Fetched followed streams");
        Ok(channels)
    }
}

/// Builder for creating a [`HelixClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    client_id: Option<String>,
    id_base_url: String,
    helix_base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder pointing at the production endpoints.
    pub fn new() -> Self {
        Self {
            client_id: None,
            id_base_url: DEFAULT_ID_BASE_URL.to_string(),
            helix_base_url: DEFAULT_HELIX_BASE_URL.to_string(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the application client id sent on Helix calls.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Override the identity endpoint base (`.../oauth2`).
    pub fn id_base_url(mut self, url: impl Into<String>) -> Self {
        self.id_base_url = url.into();
        self
    }

    /// Override the Helix base (`.../helix`).
    pub fn helix_base_url(mut self, url: impl Into<String>) -> Self {
        self.helix_base_url = url.into();
        self
    }

    /// Set a per-request timeout. None by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HelixClient> {
        let client_id = self
            .client_id
            .ok_or_else(|| ApiError::InvalidConfig("client_id is required".to_string()))?;

        let id_base_url = normalize_base(&self.id_base_url)?;
        let helix_base_url = normalize_base(&self.helix_base_url)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("livewatch/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(HelixClient {
            inner: Arc::new(ClientInner {
                http,
                id_base_url,
                helix_base_url,
                client_id,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a base URL and make sure relative joins keep its last segment.
fn normalize_base(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| ApiError::InvalidConfig(format!("'{}': {}", raw, e)))?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HelixClient {
        HelixClient::builder()
            .client_id("test-client")
            .id_base_url(server.uri())
            .helix_base_url(server.uri())
            .build()
            .unwrap()
    }

    /// A client whose endpoints refuse connections.
    fn unreachable_client() -> HelixClient {
        HelixClient::builder()
            .client_id("test-client")
            .id_base_url("http://127.0.0.1:1")
            .helix_base_url("http://127.0.0.1:1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_client_id() {
        let err = ClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = HelixClient::builder().client_id("x").build().unwrap();
        assert_eq!(client.id_base_url().as_str(), "https://id.twitch.tv/oauth2/");
        assert_eq!(
            HelixClient::join(client.helix_base_url(), "streams/followed")
                .unwrap()
                .as_str(),
            "https://api.twitch.tv/helix/streams/followed"
        );
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = HelixClient::builder()
            .client_id("x")
            .helix_base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_validate_token_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .and(header("Authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client_id": "test-client",
                "login": "viewer",
                "scopes": ["user:read:follows"],
                "user_id": "1234",
                "expires_in": 5000
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.validate_token("good").await);

        let info = client.check_token("good").await.unwrap().unwrap();
        assert_eq!(info.login, "viewer");
        assert_eq!(info.user_id, "1234");
    }

    #[tokio::test]
    async fn test_validate_token_rejected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": 401,
                "message": "invalid access token"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(!client.validate_token("expired").await);
        assert!(client.check_token("expired").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validate_token_missing_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "client_id": "app-token-no-user"
            })))
            .mount(&server)
            .await;

        assert!(!client_for(&server).validate_token("app").await);
    }

    #[tokio::test]
    async fn test_validate_token_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(!client_for(&server).validate_token("tok").await);
    }

    #[tokio::test]
    async fn test_validate_token_network_failure_is_false() {
        let client = unreachable_client();
        assert!(!client.validate_token("tok").await);

        let err = client.check_token("tok").await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_get_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("Client-Id", "test-client"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "141981764", "login": "twitchdev", "display_name": "TwitchDev"}]
            })))
            .mount(&server)
            .await;

        let id = client_for(&server).get_user_id("tok").await.unwrap();
        assert_eq!(id, "141981764");
    }

    #[tokio::test]
    async fn test_get_user_id_empty_data_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_user_id("tok").await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_get_user_id_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).get_user_id("tok").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(matches!(
            err,
            ApiError::RequestFailed {
                status: 401,
                endpoint: "users"
            }
        ));
    }

    #[tokio::test]
    async fn test_get_followed_streams() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/streams/followed"))
            .and(query_param("user_id", "1234"))
            .and(header("Client-Id", "test-client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "id": "1", "user_id": "10", "user_login": "alpha", "user_name": "Alpha",
                        "game_name": "Chess", "title": "blitz", "viewer_count": 12345,
                        "thumbnail_url": "https://cdn/alpha-{width}x{height}.jpg"
                    },
                    {
                        "id": "2", "user_id": "20", "user_login": "beta", "user_name": "Beta",
                        "game_name": "", "title": "", "viewer_count": 7,
                        "thumbnail_url": "https://cdn/beta-{width}x{height}.jpg"
                    }
                ],
                "pagination": {}
            })))
            .mount(&server)
            .await;

        let channels = client_for(&server)
            .get_followed_streams("1234", "tok")
            .await
            .unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].login, "alpha");
        assert_eq!(channels[0].viewer_count, 12345);
        assert_eq!(channels[1].display_name, "Beta");
    }

    #[tokio::test]
    async fn test_get_followed_streams_missing_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/streams/followed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pagination": {}})))
            .mount(&server)
            .await;

        let channels = client_for(&server)
            .get_followed_streams("1234", "tok")
            .await
            .unwrap();
        assert!(channels.is_empty());
    }

    #[tokio::test]
    async fn test_get_followed_streams_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/streams/followed"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_followed_streams("1234", "tok")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_get_followed_streams_network_failure() {
        let err = unreachable_client()
            .get_followed_streams("1234", "tok")
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
