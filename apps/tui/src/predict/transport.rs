//! The single outbound call a submission makes.

use super::PredictError;
use crate::config::AppConfig;
use crate::domain::PredictionRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Status and body of whatever the server answered, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Anything able to carry a [`PredictionRequest`] to the prediction service.
///
/// Implementations return `Err` only when no response was obtained; HTTP
/// error statuses come back as a [`RawResponse`].
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn send(&self, request: &PredictionRequest) -> Result<RawResponse, PredictError>;
}

/// JSON-over-HTTP transport to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, PredictError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub const fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PredictError> {
        Self::new(config.endpoint.clone(), config.request_timeout)
    }

    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionTransport for HttpTransport {
    fn name(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn send(&self, request: &PredictionRequest) -> Result<RawResponse, PredictError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "prediction response received");

        Ok(RawResponse { status, body })
    }
}
