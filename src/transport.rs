//! Transport abstraction for device HTTP calls.
//!
//! The negotiator never talks to the network directly; every call goes
//! through the [`Transport`] trait so tests can script device responses
//! and embedders can plug in their own HTTP stack. [`HttpTransport`] is
//! the default reqwest-backed implementation.
//!
//! All request bodies are JSON. Responses are returned as parsed JSON
//! regardless of HTTP status: the device signals failure through the
//! `success` flag in the body, not the status line. Some endpoints wrap
//! their payload as a JSON-encoded string inside the outer envelope (the
//! api_version discovery response); decoding that inner layer is the
//! caller's responsibility, not the transport's.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

use crate::error::TransportError;

/// HTTP method of a device request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Retrieve a resource.
    Get,
    /// Submit a JSON body.
    Post,
}

impl Method {
    /// Get the method name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Boxed future returned by transport requests.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<Value, TransportError>> + Send + 'a>>;

/// Pluggable request/response backend.
///
/// Implementations handle the low-level HTTP exchange while the
/// negotiator stays transport-agnostic.
pub trait Transport: Send + Sync {
    /// Perform a request and return the parsed JSON response body.
    fn request<'a>(&'a self, method: Method, url: &'a str, body: Option<Value>)
        -> TransportFuture<'a>;
}

/// Default [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> std::result::Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn request<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        body: Option<Value>,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            tracing::debug!("{} {}", method, url);

            let mut request = match method {
                Method::Get => self.client.get(url),
                Method::Post => self.client.post(url),
            };
            if let Some(body) = body {
                request = request.json(&body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            response
                .json::<Value>()
                .await
                .map_err(|e| TransportError::InvalidBody(e.to_string()))
        })
    }
}
