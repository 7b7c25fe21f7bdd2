//! CLI Adapter
//!
//! Command-line harness for the Birdeye client.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, HistoryCmd, MultiPriceCmd, NetworksCmd, PriceCmd, TokenListCmd};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
