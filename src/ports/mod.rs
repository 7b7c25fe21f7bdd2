//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! The only external dependency of the client is the HTTP round-trip.

pub mod transport;
pub mod mocks;

// Re-export main traits and types
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use mocks::RecordingTransport;
