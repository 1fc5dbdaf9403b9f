use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::config::{api_base_url, generate_endpoint};
use crate::domain::{GenerateRequest, GenerateResponse};
use crate::error::TransportError;

/// One request/response exchange with the generation backend.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest)
        -> Result<GenerateResponse, TransportError>;
}

#[derive(Debug, Clone)]
enum BaseUrl {
    FromEnv,
    Fixed(String),
}

/// `POST {base}/api/generate` over reqwest. No local timeout is applied.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    http: reqwest::Client,
    base_url: BaseUrl,
}

impl HttpGenerationClient {
    /// Resolves the base URL from the environment on every exchange.
    pub fn from_env() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BaseUrl::FromEnv,
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Uses a caller-built reqwest client, e.g. one with proxies disabled.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: BaseUrl::Fixed(base_url.into()),
        }
    }

    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    fn endpoint(&self) -> Result<String, TransportError> {
        let base = match &self.base_url {
            BaseUrl::FromEnv => api_base_url().ok_or(TransportError::MissingBaseUrl)?,
            BaseUrl::Fixed(url) => url.clone(),
        };
        Ok(generate_endpoint(&base))
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, TransportError> {
        let endpoint = self.endpoint()?;
        tracing::debug!(%endpoint, "sending generation request");

        let response = self
            .http
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        // The status code is not consulted: an error status with a JSON body
        // still carries the backend's own `error` field.
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "generation response received");

        Ok(serde_json::from_slice(&body)?)
    }
}
