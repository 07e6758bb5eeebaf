use std::time::Duration;

use async_trait::async_trait;
use postbox_core::{HttpRequest, HttpResponse, HttpTransport};
use postbox_domain::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use postbox_domain::{ApiConfig, HttpMethod, PostboxError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// reqwest-backed transport that resolves endpoints against a base URL.
///
/// Each call is dispatched exactly once; retrying is the pipeline's job.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    base_url: Url,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client for the `[api]` section of the configuration.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let mut builder = Self::builder().base_url(&api.base_url).timeout(api.timeout());
        if let Some(agent) = &api.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an endpoint relative to the base.
    pub fn resolve(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|err| InfraError::from(err).into())
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.resolve(&request.endpoint)?;
        let method = reqwest_method(request.method);
        let authorized = request.is_authorized();

        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.json_body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        // The query can carry the refresh token, so only the path is logged.
        debug!(%method, path = url.path(), authorized, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, path = url.path(), error = %err, "HTTP request failed");
            PostboxError::from(InfraError::from(err))
        })?;

        let status = response.status();
        debug!(%method, path = url.path(), %status, "received HTTP response");

        let body = response.text().await.map_err(|err| PostboxError::from(InfraError::from(err)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(InfraError::from)?;

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(InfraError::from)?;

        Ok(HttpClient { client, base_url })
    }
}
