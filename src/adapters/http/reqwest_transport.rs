//! Reqwest Transport
//!
//! Executes `HttpRequest` values with a shared `reqwest::Client`. No retries:
//! a failed round-trip is reported once as a `TransportError`.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;

use crate::ports::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default settings (no overall timeout)
    pub fn new() -> Result<Self, TransportError> {
        Self::build(None)
    }

    /// Create a transport that applies a timeout to every request
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::build(Some(timeout))
    }

    /// Wrap an existing client (shares its connection pool)
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    fn build(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
        };

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse { status, headers, body })
    }
}
