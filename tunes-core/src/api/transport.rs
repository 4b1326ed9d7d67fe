use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;

use super::endpoint::{Method, RequestTarget};
use crate::error::TransportError;

/// One outbound request, already resolved from a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub target: RequestTarget,
}

impl HttpRequest {
    pub fn new(method: Method, target: RequestTarget) -> Self {
        Self { method, target }
    }
}

/// Raw status and body as received from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn new(status: u16, body: Option<Vec<u8>>) -> Self {
        Self { status, body }
    }

    /// `200 OK` carrying `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, Some(body.into()))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves a request over the network (or pretends to, in tests).
///
/// Implementations perform exactly one exchange per call and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a pooled `reqwest` client.
///
/// The client carries no timeout of its own; the pipeline bounds each round
/// trip instead.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|err| TransportError::Other(err.to_string()))?;
        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::TimedOut
    } else if err.is_connect()
        || err.is_request()
        || err.is_body()
        || err.is_redirect()
    {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
        };
        let response = self
            .client
            .request(method, request.target.as_url().clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;
        trace!(
            target_url = %request.target,
            status,
            bytes = body.len(),
            "transport exchange complete"
        );

        Ok(HttpResponse::new(status, Some(body.to_vec())))
    }
}
