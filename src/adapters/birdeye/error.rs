//! Birdeye Error Types
//!
//! Every failure of a client call, one variant per category. Nothing is
//! logged-and-dropped: each call either returns typed data or one of these.

use thiserror::Error;

use crate::domain::schema::ValidationError;
use crate::ports::transport::TransportError;

/// Errors returned by `BirdeyeClient` operations
#[derive(Error, Debug)]
pub enum BirdeyeError {
    /// The HTTP round-trip did not complete (DNS, connect, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not valid JSON
    #[error("Malformed JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The JSON did not match the endpoint contract
    #[error("Response validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The response was well-formed but reported `success: false`
    #[error("Birdeye API reported failure: {}", .message.as_deref().unwrap_or("no message"))]
    ApiFailure { message: Option<String> },

    /// A local precondition failed, no request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BirdeyeError {
    /// Whether the failure happened before a response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, BirdeyeError::Transport(_))
    }

    /// Whether the vendor response shape drifted from the contract
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, BirdeyeError::Validation(_))
    }

    /// Get the validation details, if this is a contract violation
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            BirdeyeError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::IssueKind;

    #[test]
    fn test_error_categories() {
        assert!(BirdeyeError::Transport(TransportError::Timeout).is_transport());
        assert!(!BirdeyeError::ApiFailure { message: None }.is_transport());

        let validation = BirdeyeError::from(ValidationError::single("data", IssueKind::Missing));
        assert!(validation.is_contract_violation());
        assert_eq!(validation.validation().unwrap().issues[0].path, "data");
    }

    #[test]
    fn test_error_display() {
        let err = BirdeyeError::ApiFailure { message: Some("rate limited".to_string()) };
        assert_eq!(err.to_string(), "Birdeye API reported failure: rate limited");

        let err = BirdeyeError::ApiFailure { message: None };
        assert_eq!(err.to_string(), "Birdeye API reported failure: no message");

        let err = BirdeyeError::Http { status: 401, body: "Unauthorized".to_string() };
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = BirdeyeError::from(json_err);
        assert!(matches!(err, BirdeyeError::Decode(_)));
    }
}
