//! Birdeye Adapter
//!
//! Typed client for the Birdeye market data API.
//! Builds encoded requests, runs them through an `HttpTransport`, and
//! validates every response against its endpoint contract.

mod client;
mod error;
mod query;

pub use client::{paths, BirdeyeClient, ClientConfig, BIRDEYE_API_URL, DEFAULT_CHAIN};
pub use error::BirdeyeError;
pub use query::{
    token_list_defaults, AddressType, HistoryPriceQuery, Interval, MultiPriceQuery, PriceQuery,
    SortBy, SortType, TokenListQuery, MAX_MULTI_PRICE_ADDRESSES,
};
