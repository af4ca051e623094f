//! Upstream HTTP transport
//!
//! The handler talks to the upstream API through this trait so tests can
//! substitute a scripted transport and assert on exactly what was (or was
//! not) sent over the wire.

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;

use crate::api::GenerateContentRequest;

/// Raw reply from the upstream API: status plus unparsed body bytes.
/// The body stays opaque so success responses can be relayed verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to reach upstream: {0}")]
    Connect(String),

    #[error("Failed to read upstream response: {0}")]
    Read(String),
}

/// Trait for the single POST the relay performs per invocation
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Issue one best-effort POST. No retries, no internal timeout; the
    /// caller's invocation model governs cancellation.
    async fn post(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> Result<UpstreamReply, TransportError>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> Result<UpstreamReply, TransportError> {
        // Strip the URL from reqwest errors: it carries the key as a query
        // parameter and must never reach a log line.
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.without_url().to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Read(e.without_url().to_string()))?;

        Ok(UpstreamReply {
            status,
            body: bytes,
        })
    }
}
