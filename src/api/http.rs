//! HTTP client for the notes template endpoints.

use super::TemplateApi;
use crate::config::ApiConfig;
use crate::models::{Template, TemplatePayload};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// HTTP client configuration for the notes API.
#[derive(Debug, Clone, Copy)]
pub struct ApiHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for ApiHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl ApiHttpConfig {
    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub const fn from_config(config: &ApiConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }
}

/// Builds an HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: ApiHttpConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(format!("Noteport/{}", env!("CARGO_PKG_VERSION")));
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build notes API HTTP client: {err}");
        reqwest::Client::new()
    })
}

/// Notes API client over HTTP/JSON.
///
/// Endpoints, relative to the base URL:
///
/// | Operation | Request |
/// |-----------|---------|
/// | create | `POST /templates` with the payload as the JSON body |
/// | list | `GET /templates` returning a JSON array |
pub struct HttpTemplateApi {
    /// Base URL without trailing slash.
    base_url: String,
    /// Bearer token, if the server requires one.
    token: Option<SecretString>,
    /// HTTP client.
    client: reqwest::Client,
}

impl HttpTemplateApi {
    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api";

    /// Creates a client for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client: build_http_client(ApiHttpConfig::default()),
        }
    }

    /// Creates a client from the `[api]` config section.
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        let mut api =
            Self::new(config.base_url.clone()).with_http_config(ApiHttpConfig::from_config(config));
        api.token.clone_from(&config.token);
        api
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: ApiHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the templates collection URL.
    fn templates_url(&self) -> String {
        format!("{}/templates", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Sends a request and decodes a JSON response.
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = self.authorize(request).send().await.map_err(|e| {
            let error_kind = classify_transport_error(&e);
            tracing::error!(
                operation,
                error = %e,
                error_kind,
                "Notes API request failed"
            );
            Error::OperationFailed {
                operation: operation.to_string(),
                cause: format!("{error_kind} error: {e}"),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                operation,
                status = %status,
                body = %body,
                "Notes API returned error status"
            );
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                body
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| Error::OperationFailed {
            operation: operation.to_string(),
            cause: format!("invalid response body: {e}"),
        })
    }
}

impl Default for HttpTemplateApi {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl TemplateApi for HttpTemplateApi {
    async fn create_template(&self, payload: &TemplatePayload) -> Result<Template> {
        tracing::debug!(url = %self.templates_url(), name = ?payload.name(), "Creating template");
        let request = self.client.post(self.templates_url()).json(payload);
        self.send_json("create_template", request).await
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        let request = self.client.get(self.templates_url());
        self.send_json("list_templates", request).await
    }
}

/// Names the transport failure for logs and error causes.
fn classify_transport_error(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    }
}
