use crate::core::config::PortalConfig;
use crate::core::error::RequestError;
use crate::session::context::SessionContext;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Content type sent unless the caller overrides it
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Options for a single decorated request.
///
/// Caller headers are applied over the defaults, so a header with the same
/// name (case-insensitive) replaces the default one.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, serde_json::Error> {
        Ok(self.body(serde_json::to_string(value)?))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Build the outgoing header set: bearer token and JSON content type first,
/// then the caller's headers on top.
pub fn merge_headers(
    token: Option<&str>,
    headers: &[(String, String)],
) -> Result<HeaderMap, RequestError> {
    let mut merged = HeaderMap::new();

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| RequestError::InvalidHeaderValue(AUTHORIZATION.to_string()))?;
        merged.insert(AUTHORIZATION, value);
    }
    merged.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RequestError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RequestError::InvalidHeaderValue(name.clone()))?;
        merged.insert(header_name, header_value);
    }

    Ok(merged)
}

/// HTTP client that authorizes every request with the current session token
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl AuthClient {
    pub fn new(config: &PortalConfig, session: Arc<SessionContext>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Resolve a portal path against the base URL; absolute URLs pass through
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a request with the session headers merged into `options`.
    ///
    /// Non-success statuses are returned as responses, not errors.
    pub async fn fetch(&self, path: &str, options: RequestOptions) -> Result<Response, RequestError> {
        let token = self.session.token();
        let headers = merge_headers(token.as_deref(), &options.headers)?;
        let url = self.url(path);

        reqwest::Url::parse(&url).map_err(|_| RequestError::InvalidUrl(url.clone()))?;

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);

        if let Some(body) = options.body {
            request = request.body(body);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        debug!(method = %options.method, url = %url, "Sending portal request");

        let response = request.send().await?;

        debug!(status = %response.status(), url = %url, "Portal request completed");

        Ok(response)
    }

    /// Add the bearer header to a request built directly on [`AuthClient::http`].
    ///
    /// Unlike [`AuthClient::fetch`] nothing else is touched, and no header is
    /// added while signed out.
    pub fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// The underlying client, for requests that need full control
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server;
    use crate::session::context::CurrentUser;
    use axum::routing::any;
    use axum::Router;

    fn portal_config(base_url: &str) -> PortalConfig {
        crate::core::config::Config::from_toml(&format!(
            "[portal]\nbase_url = \"{}\"\n[logging]\n",
            base_url
        ))
        .unwrap()
        .portal
    }

    fn signed_in() -> Arc<SessionContext> {
        Arc::new(SessionContext::new(
            Some("abc123".to_string()),
            CurrentUser::default(),
        ))
    }

    #[test]
    fn test_default_headers_only() {
        let headers = merge_headers(Some("abc123"), &[]).unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_custom_header_preserves_defaults() {
        let headers =
            merge_headers(Some("abc123"), &[("X-Request-Id".to_string(), "42".to_string())]).unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("x-request-id").unwrap(), "42");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_content_type_override_replaces_default() {
        let headers = merge_headers(
            Some("abc123"),
            &[("content-type".to_string(), "text/plain".to_string())],
        )
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_authorization_can_be_overridden() {
        let headers = merge_headers(
            Some("abc123"),
            &[("Authorization".to_string(), "Basic Zm9vOmJhcg==".to_string())],
        )
        .unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic Zm9vOmJhcg==");
    }

    #[test]
    fn test_no_token_omits_authorization() {
        let headers = merge_headers(None, &[]).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_invalid_header_name() {
        let result = merge_headers(Some("abc"), &[("bad header".to_string(), "x".to_string())]);
        assert!(matches!(result, Err(RequestError::InvalidHeaderName(_))));
    }

    #[test]
    fn test_url_resolution() {
        let client = AuthClient::new(&portal_config("http://localhost:5000/"), signed_in()).unwrap();

        assert_eq!(client.url("/api/v1/patients"), "http://localhost:5000/api/v1/patients");
        assert_eq!(client.url("api/v1/patients"), "http://localhost:5000/api/v1/patients");
        assert_eq!(client.url("https://other.example/x"), "https://other.example/x");
    }

    #[test]
    fn test_options_json_body() {
        let options = RequestOptions::new(Method::PUT)
            .json(&serde_json::json!({"name": "Alice"}))
            .unwrap();
        assert_eq!(options.method, Method::PUT);
        assert_eq!(options.body.as_deref(), Some(r#"{"name":"Alice"}"#));
    }

    #[tokio::test]
    async fn test_fetch_sends_session_headers() {
        let base_url =
            test_server::spawn(Router::new().route("/echo", any(test_server::echo_request))).await;
        let client = AuthClient::new(&portal_config(&base_url), signed_in()).unwrap();

        let response = client
            .fetch(
                "/echo",
                RequestOptions::new(Method::POST)
                    .header("X-Trace", "t-1")
                    .body(r#"{"a":1}"#),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());

        let echoed: serde_json::Value = response.json().await.unwrap();
        assert_eq!(echoed["method"], "POST");
        assert_eq!(echoed["headers"]["authorization"], "Bearer abc123");
        assert_eq!(echoed["headers"]["content-type"], "application/json");
        assert_eq!(echoed["headers"]["x-trace"], "t-1");
        assert_eq!(echoed["body"], r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_decorate_adds_bearer_only() {
        let base_url =
            test_server::spawn(Router::new().route("/echo", any(test_server::echo_request))).await;
        let client = AuthClient::new(&portal_config(&base_url), signed_in()).unwrap();

        let request = client.decorate(client.http().get(client.url("/echo")));
        let echoed: serde_json::Value = request.send().await.unwrap().json().await.unwrap();

        assert_eq!(echoed["headers"]["authorization"], "Bearer abc123");
        assert!(echoed["headers"].get("content-type").is_none());
    }

    #[tokio::test]
    async fn test_decorate_signed_out() {
        let client = AuthClient::new(
            &portal_config("http://localhost:5000"),
            Arc::new(SessionContext::default()),
        )
        .unwrap();

        let request = client
            .decorate(client.http().get(client.url("/echo")))
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is not expected to accept HTTP connections locally
        let client = AuthClient::new(&portal_config("http://127.0.0.1:9"), signed_in()).unwrap();
        let result = client.fetch("/anything", RequestOptions::default()).await;
        assert!(matches!(result, Err(RequestError::Transport(_))));
    }
}
