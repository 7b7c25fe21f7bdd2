use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Mock transport that records requests and replays queued responses
///
/// Clones share state, so a test can keep one handle and give another to the client.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<HttpRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to queue a 200 response with the given body
    pub fn with_body(self, body: &str) -> Self {
        self.with_response(Ok(HttpResponse::ok(body)))
    }

    /// Builder method to queue any response or transport failure
    pub fn with_response(self, response: Result<HttpResponse, TransportError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Get all recorded requests
    pub fn get_calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("No response configured".to_string())))
    }
}
