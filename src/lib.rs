//! Birdeye - Typed client for the Birdeye market data API
//!
//! Token prices, token lists and price history for Solana and other chains,
//! with every response checked against a strict per-endpoint contract.
//!
//! # Modules
//!
//! - `domain`: Query encoding, response contracts, typed records
//! - `ports`: Transport abstraction (`HttpTransport`) and test doubles
//! - `adapters`: Birdeye client, reqwest transport, CLI
//! - `config`: Configuration loading and validation
//!
//! # Example
//!
//! ```no_run
//! use birdeye::adapters::birdeye::{BirdeyeClient, PriceQuery};
//!
//! # async fn run() -> Result<(), birdeye::adapters::birdeye::BirdeyeError> {
//! let client = BirdeyeClient::new("my-api-key")?;
//! let price = client
//!     .price(&PriceQuery::new("So11111111111111111111111111111111111111112"))
//!     .await?;
//! println!("SOL = {}", price.value);
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
