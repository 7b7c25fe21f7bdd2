//! Birdeye API Client
//!
//! HTTP client for the Birdeye public market data API.
//! Each endpoint is split into a `build_*` step (request as data), the
//! transport round-trip, and a `parse_*` step (status + body to typed data).
//! The client holds only immutable configuration, so one instance can serve
//! concurrent calls.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::adapters::http::ReqwestTransport;
use crate::domain::contracts::{
    self, Contract, Envelope, HistoryPrice, PriceData, TokenList,
};
use crate::domain::query::QueryParams;
use crate::domain::schema::{IssueKind, ValidationError};
use crate::ports::transport::{HttpRequest, HttpResponse, HttpTransport};

use super::error::BirdeyeError;
use super::query::{HistoryPriceQuery, MultiPriceQuery, PriceQuery, TokenListQuery};

/// Public API host
pub const BIRDEYE_API_URL: &str = "https://public-api.birdeye.so";

/// Chain used when a call does not select one
pub const DEFAULT_CHAIN: &str = "solana";

/// Endpoint paths
pub mod paths {
    pub const NETWORKS: &str = "/defi/networks";
    pub const PRICE: &str = "/defi/price";
    pub const TOKEN_LIST: &str = "/defi/tokenlist";
    pub const HISTORY_PRICE: &str = "/defi/history_price";
    pub const MULTI_PRICE: &str = "/defi/multi_price";
}

/// Birdeye client configuration
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    default_chain: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for the public API host with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BIRDEYE_API_URL.to_string(),
            default_chain: DEFAULT_CHAIN.to_string(),
            timeout: None,
        }
    }

    /// Point the client at another host (mock servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_chain(mut self, chain: impl Into<String>) -> Self {
        self.default_chain = chain.into();
        self
    }

    /// Deadline forwarded to the transport for every request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_chain(&self) -> &str {
        &self.default_chain
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("default_chain", &self.default_chain)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Birdeye market data client
#[derive(Debug, Clone)]
pub struct BirdeyeClient<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl BirdeyeClient<ReqwestTransport> {
    /// Create a client for the public API with the given key
    pub fn new(api_key: impl Into<String>) -> Result<Self, BirdeyeError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, BirdeyeError> {
        let transport = match config.timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new()?,
        };
        Ok(Self { config, transport })
    }
}

impl<T: HttpTransport> BirdeyeClient<T> {
    /// Create a client over any transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a list of all supported networks
    pub async fn networks(&self, chain: Option<&str>) -> Result<Vec<String>, BirdeyeError> {
        let response = self.send(&contracts::NETWORKS, self.build_networks(chain)).await?;
        self.parse_networks(response)
    }

    /// Get the latest price of a token
    pub async fn price(&self, query: &PriceQuery) -> Result<PriceData, BirdeyeError> {
        let response = self.send(&contracts::PRICE, self.build_price(query)).await?;
        self.parse_price(response)
    }

    /// Get one page of the token list
    pub async fn token_list(&self, query: &TokenListQuery) -> Result<TokenList, BirdeyeError> {
        let response = self.send(&contracts::TOKEN_LIST, self.build_token_list(query)).await?;
        self.parse_token_list(response)
    }

    /// Get the historical price line of a token or pair
    pub async fn history_price(&self, query: &HistoryPriceQuery) -> Result<HistoryPrice, BirdeyeError> {
        let response = self.send(&contracts::HISTORY_PRICE, self.build_history_price(query)).await?;
        self.parse_history_price(response)
    }

    /// Get prices of up to 100 tokens in one call
    ///
    /// `Ok(None)` means the API succeeded but returned no data.
    pub async fn multi_price(&self, query: &MultiPriceQuery) -> Result<Option<Vec<PriceData>>, BirdeyeError> {
        let request = self.build_multi_price(query)?;
        let response = self.send(&contracts::MULTI_PRICE, request).await?;
        self.parse_multi_price(response)
    }

    pub fn build_networks(&self, chain: Option<&str>) -> HttpRequest {
        self.build_request(paths::NETWORKS, QueryParams::new(), chain)
    }

    pub fn build_price(&self, query: &PriceQuery) -> HttpRequest {
        self.build_request(paths::PRICE, query.to_params(), query.chain.as_deref())
    }

    pub fn build_token_list(&self, query: &TokenListQuery) -> HttpRequest {
        self.build_request(paths::TOKEN_LIST, query.to_params(), query.chain.as_deref())
    }

    pub fn build_history_price(&self, query: &HistoryPriceQuery) -> HttpRequest {
        self.build_request(paths::HISTORY_PRICE, query.to_params(), query.chain.as_deref())
    }

    pub fn build_multi_price(&self, query: &MultiPriceQuery) -> Result<HttpRequest, BirdeyeError> {
        query.check().map_err(BirdeyeError::InvalidRequest)?;
        Ok(self.build_request(paths::MULTI_PRICE, query.to_params(), query.chain.as_deref()))
    }

    pub fn parse_networks(&self, response: HttpResponse) -> Result<Vec<String>, BirdeyeError> {
        require_data(parse_envelope(&contracts::NETWORKS, response)?)
    }

    pub fn parse_price(&self, response: HttpResponse) -> Result<PriceData, BirdeyeError> {
        require_data(parse_envelope(&contracts::PRICE, response)?)
    }

    pub fn parse_token_list(&self, response: HttpResponse) -> Result<TokenList, BirdeyeError> {
        require_data(parse_envelope(&contracts::TOKEN_LIST, response)?)
    }

    pub fn parse_history_price(&self, response: HttpResponse) -> Result<HistoryPrice, BirdeyeError> {
        require_data(parse_envelope(&contracts::HISTORY_PRICE, response)?)
    }

    pub fn parse_multi_price(&self, response: HttpResponse) -> Result<Option<Vec<PriceData>>, BirdeyeError> {
        Ok(parse_envelope(&contracts::MULTI_PRICE, response)?.data)
    }

    fn build_request(&self, path: &str, params: QueryParams, chain: Option<&str>) -> HttpRequest {
        let query = params.encode();
        let url = if query.is_empty() {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}{}?{}", self.config.base_url, path, query)
        };
        let chain = chain.unwrap_or(&self.config.default_chain);

        let mut request = HttpRequest::get(url)
            .header("accept", "application/json")
            .header("X-API-KEY", self.config.api_key.as_str())
            .header("x-chain", chain);
        request.timeout = self.config.timeout;
        request
    }

    async fn send(&self, contract: &Contract, request: HttpRequest) -> Result<HttpResponse, BirdeyeError> {
        tracing::debug!(
            endpoint = contract.endpoint,
            chain = request.header_value("x-chain").unwrap_or_default(),
            "GET {}",
            request.url
        );

        let response = self.transport.execute(request).await?;
        tracing::debug!(endpoint = contract.endpoint, "Birdeye responded with status {}", response.status);
        Ok(response)
    }
}

/// Status check, JSON decode, contract validation and `success` check
fn parse_envelope<D: DeserializeOwned>(
    contract: &Contract,
    response: HttpResponse,
) -> Result<Envelope<D>, BirdeyeError> {
    if !response.is_success() {
        return Err(non_success_error(contract, response));
    }

    let value: Value = serde_json::from_str(&response.body)?;
    let envelope: Envelope<D> = contract.parse(value).map_err(|err| {
        tracing::warn!(
            endpoint = contract.endpoint,
            "Response violates contract ({} issue(s)): {}",
            err.issues.len(),
            err
        );
        err
    })?;

    if !envelope.success {
        return Err(BirdeyeError::ApiFailure { message: envelope.message });
    }

    Ok(envelope)
}

/// A non-2xx reply is an `ApiFailure` when its body is a conforming `success: false`
/// envelope, otherwise `Http` with the raw body
fn non_success_error(contract: &Contract, response: HttpResponse) -> BirdeyeError {
    let failure = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|value| contract.parse::<Envelope<Value>>(value).ok())
        .filter(|envelope| !envelope.success);

    match failure {
        Some(envelope) => {
            tracing::debug!(
                endpoint = contract.endpoint,
                "Birdeye reported failure with status {}",
                response.status
            );
            BirdeyeError::ApiFailure { message: envelope.message }
        }
        None => BirdeyeError::Http {
            status: response.status,
            body: response.body,
        },
    }
}

fn require_data<D>(envelope: Envelope<D>) -> Result<D, BirdeyeError> {
    envelope
        .data
        .ok_or_else(|| ValidationError::single("data", IssueKind::Missing).into())
}
