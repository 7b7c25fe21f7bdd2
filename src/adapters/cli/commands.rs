//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the birdeye client harness.
//! Each subcommand maps its flags onto one client call and prints the typed
//! result as pretty JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::adapters::birdeye::{
    AddressType, BirdeyeClient, HistoryPriceQuery, Interval, MultiPriceQuery, PriceQuery, SortBy,
    SortType, TokenListQuery,
};
use crate::config::{config_from_env, load_config};
use crate::domain::datetime;

/// Birdeye - Typed market data client for Solana and other chains
#[derive(Parser, Debug)]
#[command(
    name = "birdeye",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Query the Birdeye market data API",
    long_about = "Calls the Birdeye public API and prints contract-validated responses. \
                  The API key is read from the config file, BIRDEYE_API_KEY or BIRDEYE_KEY \
                  (a .env file in the working directory is loaded first)."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (environment only when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported networks
    Networks(NetworksCmd),

    /// Get the latest price of a token
    Price(PriceCmd),

    /// List tokens ranked by volume, market cap or change
    TokenList(TokenListCmd),

    /// Get the price history of a token or pair
    History(HistoryCmd),

    /// Get prices of several tokens in one call
    MultiPrice(MultiPriceCmd),
}

/// List networks
#[derive(Parser, Debug)]
pub struct NetworksCmd {
    /// Chain header override
    #[arg(long)]
    pub chain: Option<String>,
}

/// Token price
#[derive(Parser, Debug)]
pub struct PriceCmd {
    /// Token address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Chain override (default from config, else solana)
    #[arg(long)]
    pub chain: Option<String>,

    /// Minimum liquidity a price source must have
    #[arg(long, value_name = "USD")]
    pub check_liquidity: Option<f64>,

    /// Include liquidity in the response
    #[arg(long, value_name = "BOOL")]
    pub include_liquidity: Option<bool>,
}

/// Token list
#[derive(Parser, Debug)]
pub struct TokenListCmd {
    /// Sort key: v24hUSD, mc, v24hChangePercent
    #[arg(long)]
    pub sort_by: Option<SortBy>,

    /// Sort order: asc, desc
    #[arg(long)]
    pub sort_type: Option<SortType>,

    /// Pagination offset
    #[arg(long)]
    pub offset: Option<u64>,

    /// Minimum liquidity in USD
    #[arg(long, value_name = "USD")]
    pub min_liquidity: Option<f64>,

    /// Chain override
    #[arg(long)]
    pub chain: Option<String>,
}

/// Price history
#[derive(Parser, Debug)]
pub struct HistoryCmd {
    /// Token or pair address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Address type: token, pair
    #[arg(long, default_value = "token")]
    pub address_type: AddressType,

    /// Interval: 1m 3m 5m 15m 30m 1H 2H 4H 6H 8H 12H 1D 3D 1W 1M
    #[arg(long, default_value = "15m")]
    pub interval: Interval,

    /// Start time (RFC 3339 or epoch seconds), overrides --hours
    #[arg(long, value_parser = parse_time)]
    pub from: Option<DateTime<Utc>>,

    /// End time (RFC 3339 or epoch seconds), defaults to now
    #[arg(long, value_parser = parse_time)]
    pub to: Option<DateTime<Utc>>,

    /// Hours of history before --to when --from is not given
    #[arg(long, default_value = "24")]
    pub hours: u32,

    /// Chain override
    #[arg(long)]
    pub chain: Option<String>,
}

/// Multi price
#[derive(Parser, Debug)]
pub struct MultiPriceCmd {
    /// Token addresses (at most 100)
    #[arg(value_name = "ADDRESS", required = true)]
    pub addresses: Vec<String>,

    /// Chain override
    #[arg(long)]
    pub chain: Option<String>,

    /// Minimum liquidity a price source must have
    #[arg(long, value_name = "USD")]
    pub check_liquidity: Option<f64>,

    /// Include liquidity in the response
    #[arg(long, value_name = "BOOL")]
    pub include_liquidity: Option<bool>,
}

impl HistoryCmd {
    /// Resolve the time window from the flags
    fn time_range(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let to = self.to.unwrap_or(now);
        let from = match self.from {
            Some(from) => from,
            None => to
                .checked_sub_signed(Duration::hours(i64::from(self.hours)))
                .with_context(|| format!("--hours {} reaches before the earliest representable time", self.hours))?,
        };
        Ok((from, to))
    }

    fn to_query(&self, now: DateTime<Utc>) -> Result<HistoryPriceQuery> {
        let (from, to) = self.time_range(now)?;
        let mut query = HistoryPriceQuery::new(&self.address, self.address_type, self.interval, from, to);
        query.chain = self.chain.clone();
        Ok(query)
    }
}

impl PriceCmd {
    fn to_query(&self) -> PriceQuery {
        PriceQuery {
            address: self.address.clone(),
            chain: self.chain.clone(),
            check_liquidity: self.check_liquidity,
            include_liquidity: self.include_liquidity,
        }
    }
}

impl TokenListCmd {
    fn to_query(&self) -> TokenListQuery {
        TokenListQuery {
            sort_by: self.sort_by,
            sort_type: self.sort_type,
            offset: self.offset,
            min_liquidity: self.min_liquidity,
            chain: self.chain.clone(),
        }
    }
}

impl MultiPriceCmd {
    fn to_query(&self) -> MultiPriceQuery {
        MultiPriceQuery {
            list_address: self.addresses.clone(),
            chain: self.chain.clone(),
            check_liquidity: self.check_liquidity,
            include_liquidity: self.include_liquidity,
        }
    }
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    datetime::coerce(&Value::String(raw.to_string()))
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    // Initialize logging based on flags
    init_logging(app.verbose, app.debug)?;

    let client = build_client(app.config.as_ref())?;

    match app.command {
        Command::Networks(cmd) => {
            let networks = client.networks(cmd.chain.as_deref()).await.context("networks request failed")?;
            print_json(&networks)
        }
        Command::Price(cmd) => {
            let price = client.price(&cmd.to_query()).await.context("price request failed")?;
            print_json(&price)
        }
        Command::TokenList(cmd) => {
            let list = client.token_list(&cmd.to_query()).await.context("token list request failed")?;
            print_json(&list)
        }
        Command::History(cmd) => {
            let query = cmd.to_query(Utc::now())?;
            tracing::info!(
                "History for {} from {} to {}",
                query.address,
                query.time_from,
                query.time_to
            );
            let history = client.history_price(&query).await.context("history request failed")?;
            print_json(&history)
        }
        Command::MultiPrice(cmd) => {
            let prices = client.multi_price(&cmd.to_query()).await.context("multi price request failed")?;
            print_json(&prices)
        }
    }
}

fn build_client(config_path: Option<&PathBuf>) -> Result<BirdeyeClient> {
    let config = match config_path {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
            load_config(&expanded).with_context(|| format!("Failed to load configuration from {}", expanded))?
        }
        None => config_from_env().context("Failed to build configuration from environment")?,
    };

    let client_config = config.client_config()?;
    tracing::debug!("Using {:?}", client_config);
    BirdeyeClient::with_config(client_config).context("Failed to create Birdeye client")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging system
fn init_logging(verbose: bool, debug: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SOL: &str = "So11111111111111111111111111111111111111112";
    const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

    #[test]
    fn test_cli_app_parse_networks() {
        let args = vec!["birdeye", "networks"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Networks(cmd) => assert!(cmd.chain.is_none()),
            _ => panic!("Expected Networks command"),
        }
        assert!(app.config.is_none());
    }

    #[test]
    fn test_cli_app_parse_price() {
        let args = vec![
            "birdeye", "price", SOL, "--chain", "solana", "--check-liquidity", "100", "--include-liquidity", "true",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Price(cmd) => {
                let query = cmd.to_query();
                assert_eq!(query.address, SOL);
                assert_eq!(query.chain.as_deref(), Some("solana"));
                assert_eq!(query.check_liquidity, Some(100.0));
                assert_eq!(query.include_liquidity, Some(true));
            }
            _ => panic!("Expected Price command"),
        }
    }

    #[test]
    fn test_cli_app_parse_token_list() {
        let args = vec!["birdeye", "token-list", "--sort-by", "mc", "--sort-type", "asc", "--offset", "0"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::TokenList(cmd) => {
                let query = cmd.to_query();
                assert_eq!(query.sort_by, Some(SortBy::Mc));
                assert_eq!(query.sort_type, Some(SortType::Asc));
                assert_eq!(query.offset, Some(0));
                assert!(query.min_liquidity.is_none());
            }
            _ => panic!("Expected TokenList command"),
        }
    }

    #[test]
    fn test_cli_app_rejects_unknown_sort_key() {
        let args = vec!["birdeye", "token-list", "--sort-by", "volume"];
        assert!(CliApp::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_app_parse_history_defaults() {
        let args = vec!["birdeye", "history", SOL];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::History(cmd) => {
                assert_eq!(cmd.address_type, AddressType::Token);
                assert_eq!(cmd.interval, Interval::M15);
                assert_eq!(cmd.hours, 24);

                let now = Utc.timestamp_opt(1_700_086_400, 0).unwrap();
                let query = cmd.to_query(now).unwrap();
                assert_eq!(query.time_to, now);
                assert_eq!(query.time_from.timestamp(), 1_700_000_000);
            }
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_cli_app_parse_history_explicit_range() {
        let args = vec![
            "birdeye", "history", SOL, "--address-type", "pair", "--interval", "1H",
            "--from", "2023-11-14T22:13:20Z", "--to", "1700003600",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::History(cmd) => {
                let (from, to) = cmd.time_range(Utc::now()).unwrap();
                assert_eq!(from.timestamp(), 1_700_000_000);
                assert_eq!(to.timestamp(), 1_700_003_600);
                assert_eq!(cmd.interval, Interval::H1);
            }
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_history_hours_out_of_range_is_error() {
        let hours = u32::MAX.to_string();
        let args = vec!["birdeye", "history", SOL, "--hours", hours.as_str()];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::History(cmd) => {
                let err = cmd.to_query(Utc::now()).unwrap_err();
                assert!(err.to_string().contains("--hours"));
            }
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_cli_app_parse_multi_price() {
        let args = vec!["birdeye", "multi-price", SOL, BONK, "--include-liquidity", "false"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::MultiPrice(cmd) => {
                let query = cmd.to_query();
                assert_eq!(query.list_address, vec![SOL.to_string(), BONK.to_string()]);
                assert_eq!(query.include_liquidity, Some(false));
            }
            _ => panic!("Expected MultiPrice command"),
        }
    }

    #[test]
    fn test_cli_app_multi_price_requires_address() {
        let args = vec!["birdeye", "multi-price"];
        assert!(CliApp::try_parse_from(args).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = vec!["birdeye", "networks", "--verbose", "--debug", "--config", "~/birdeye.toml"];
        let app = CliApp::try_parse_from(args).unwrap();

        assert!(app.verbose);
        assert!(app.debug);
        assert_eq!(app.config, Some(PathBuf::from("~/birdeye.toml")));
    }

    #[test]
    fn test_build_client_missing_config_file() {
        let path = PathBuf::from("/nonexistent/birdeye.toml");
        let err = build_client(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
