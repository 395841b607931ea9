//! HTTP transport boundary.
//!
//! The core never performs I/O itself: it hands a fully described request
//! to an injected [`SoapTransport`] and awaits the response text. Tests
//! substitute a double; production code can use [`HttpSoapTransport`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Description of the outbound HTTP request for one SOAP call.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    /// Always "POST" for SOAP calls
    pub method: String,
    pub headers: HashMap<String, String>,
    /// Serialized SOAP envelope
    pub body: String,
}

/// Transport delegate: the sole network boundary of the crate.
///
/// Implementations resolve with the raw response body text or fail with a
/// transport-level error, which the caller receives unchanged. No retries,
/// timeouts or cancellation happen at this layer.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<String>;
}

/// Default transport backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpSoapTransport {
    client: reqwest::Client,
}

impl HttpSoapTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SoapTransport for HttpSoapTransport {
    async fn send(&self, request: &HttpRequest) -> Result<String> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body.clone())
            .send()
            .await
            .with_context(|| {
                format!("HTTP error when sending SOAP request to {}", request.url)
            })?;

        // Read the body whatever the status code: SOAP Faults typically
        // arrive with HTTP 500 and still carry a parseable envelope.
        response
            .text()
            .await
            .context("Failed to read SOAP response body")
    }
}
