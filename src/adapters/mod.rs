//! Adapters Layer - External System Implementations
//!
//! - Birdeye: market data API client
//! - HTTP: reqwest implementation of the transport port
//! - CLI: command-line harness around the client

pub mod birdeye;
pub mod http;
pub mod cli;

pub use birdeye::{BirdeyeClient, BirdeyeError, ClientConfig};
pub use http::ReqwestTransport;
pub use cli::CliApp;
