//! Birdeye - market data from the command line
//!
//! Thin binary over the `birdeye` library: every subcommand performs one API
//! call and prints the validated result as JSON.

use anyhow::Result;

use birdeye::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (BIRDEYE_API_KEY is used when the config file has no api_key)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
