//! Birdeye Request Types
//!
//! Parameters for each endpoint and their mapping onto query strings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::query::QueryParams;

/// Vendor defaults applied when a token list parameter is omitted
pub mod token_list_defaults {
    use super::{SortBy, SortType};

    pub const SORT_BY: SortBy = SortBy::V24hUsd;
    pub const SORT_TYPE: SortType = SortType::Desc;
    pub const OFFSET: u64 = 0;
    pub const MIN_LIQUIDITY: f64 = 100.0;
}

/// Maximum addresses accepted by `/defi/multi_price`
pub const MAX_MULTI_PRICE_ADDRESSES: usize = 100;

/// Token list sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "v24hUSD")]
    V24hUsd,
    #[serde(rename = "mc")]
    Mc,
    #[serde(rename = "v24hChangePercent")]
    V24hChangePercent,
}

impl SortBy {
    pub const ALL: &'static [SortBy] = &[SortBy::V24hUsd, SortBy::Mc, SortBy::V24hChangePercent];

    /// Value sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::V24hUsd => "v24hUSD",
            SortBy::Mc => "mc",
            SortBy::V24hChangePercent => "v24hChangePercent",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    Asc,
    Desc,
}

impl SortType {
    pub const ALL: &'static [SortType] = &[SortType::Asc, SortType::Desc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Asc => "asc",
            SortType::Desc => "desc",
        }
    }
}

/// Whether a history address is a token mint or a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Token,
    Pair,
}

impl AddressType {
    pub const ALL: &'static [AddressType] = &[AddressType::Token, AddressType::Pair];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Token => "token",
            AddressType::Pair => "pair",
        }
    }
}

/// Candle interval for price history (`type` parameter)
///
/// Minutes are lowercase `m`, months uppercase `M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "2H")]
    H2,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "6H")]
    H6,
    #[serde(rename = "8H")]
    H8,
    #[serde(rename = "12H")]
    H12,
    #[serde(rename = "1D")]
    D1,
    #[serde(rename = "3D")]
    D3,
    #[serde(rename = "1W")]
    W1,
    #[serde(rename = "1M")]
    Mo1,
}

impl Interval {
    pub const ALL: &'static [Interval] = &[
        Interval::M1,
        Interval::M3,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H2,
        Interval::H4,
        Interval::H6,
        Interval::H8,
        Interval::H12,
        Interval::D1,
        Interval::D3,
        Interval::W1,
        Interval::Mo1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M3 => "3m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1H",
            Interval::H2 => "2H",
            Interval::H4 => "4H",
            Interval::H6 => "6H",
            Interval::H8 => "8H",
            Interval::H12 => "12H",
            Interval::D1 => "1D",
            Interval::D3 => "3D",
            Interval::W1 => "1W",
            Interval::Mo1 => "1M",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exact, case-sensitive lookup of a wire value
fn parse_wire<T: Copy>(kind: &str, raw: &str, all: &[T], as_str: fn(&T) -> &'static str) -> Result<T, String> {
    all.iter().copied().find(|v| as_str(v) == raw).ok_or_else(|| {
        let accepted: Vec<&str> = all.iter().map(as_str).collect();
        format!("invalid {} '{}', expected one of: {}", kind, raw, accepted.join(", "))
    })
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("sort key", s, SortBy::ALL, SortBy::as_str)
    }
}

impl FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("sort order", s, SortType::ALL, SortType::as_str)
    }
}

impl FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("address type", s, AddressType::ALL, AddressType::as_str)
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire("interval", s, Interval::ALL, Interval::as_str)
    }
}

/// `/defi/price` parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub address: String,
    /// Overrides the client's default chain
    pub chain: Option<String>,
    pub check_liquidity: Option<f64>,
    pub include_liquidity: Option<bool>,
}

impl PriceQuery {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chain: None,
            check_liquidity: None,
            include_liquidity: None,
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn with_check_liquidity(mut self, min_liquidity: f64) -> Self {
        self.check_liquidity = Some(min_liquidity);
        self
    }

    pub fn with_include_liquidity(mut self, include: bool) -> Self {
        self.include_liquidity = Some(include);
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("address", self.address.as_str())
            .with_opt("check_liquidity", self.check_liquidity)
            .with_opt("include_liquidity", self.include_liquidity)
    }
}

/// `/defi/tokenlist` parameters
///
/// Unset fields are omitted and the vendor applies its defaults:
/// sort by `v24hUSD`, descending, offset 0, minimum liquidity 100
/// (see [`token_list_defaults`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenListQuery {
    pub sort_by: Option<SortBy>,
    pub sort_type: Option<SortType>,
    pub offset: Option<u64>,
    pub min_liquidity: Option<f64>,
    pub chain: Option<String>,
}

impl TokenListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sorted(mut self, sort_by: SortBy, sort_type: SortType) -> Self {
        self.sort_by = Some(sort_by);
        self.sort_type = Some(sort_type);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_min_liquidity(mut self, min_liquidity: f64) -> Self {
        self.min_liquidity = Some(min_liquidity);
        self
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("sort_by", self.sort_by.map(|s| s.as_str()))
            .with_opt("sort_type", self.sort_type.map(|s| s.as_str()))
            .with_opt("offset", self.offset)
            .with_opt("min_liquidity", self.min_liquidity)
    }
}

/// `/defi/history_price` parameters
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPriceQuery {
    pub address: String,
    pub address_type: AddressType,
    pub interval: Interval,
    /// Sent as whole epoch seconds
    pub time_from: DateTime<Utc>,
    /// Sent as whole epoch seconds
    pub time_to: DateTime<Utc>,
    pub chain: Option<String>,
}

impl HistoryPriceQuery {
    pub fn new(
        address: impl Into<String>,
        address_type: AddressType,
        interval: Interval,
        time_from: DateTime<Utc>,
        time_to: DateTime<Utc>,
    ) -> Self {
        Self {
            address: address.into(),
            address_type,
            interval,
            time_from,
            time_to,
            chain: None,
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("address", self.address.as_str())
            .with("address_type", self.address_type.as_str())
            .with("type", self.interval.as_str())
            .with("time_from", self.time_from.timestamp())
            .with("time_to", self.time_to.timestamp())
    }
}

/// `/defi/multi_price` parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPriceQuery {
    pub list_address: Vec<String>,
    pub chain: Option<String>,
    pub check_liquidity: Option<f64>,
    pub include_liquidity: Option<bool>,
}

impl MultiPriceQuery {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            list_address: addresses.into_iter().map(Into::into).collect(),
            chain: None,
            check_liquidity: None,
            include_liquidity: None,
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    pub fn with_check_liquidity(mut self, min_liquidity: f64) -> Self {
        self.check_liquidity = Some(min_liquidity);
        self
    }

    pub fn with_include_liquidity(mut self, include: bool) -> Self {
        self.include_liquidity = Some(include);
        self
    }

    /// Address count must be 1..=100
    pub(crate) fn check(&self) -> Result<(), String> {
        match self.list_address.len() {
            0 => Err("multi price needs at least one address".to_string()),
            n if n > MAX_MULTI_PRICE_ADDRESSES => Err(format!(
                "multi price accepts at most {} addresses, got {}",
                MAX_MULTI_PRICE_ADDRESSES, n
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("list_address", self.list_address.join(","))
            .with_opt("check_liquidity", self.check_liquidity)
            .with_opt("include_liquidity", self.include_liquidity)
    }
}
