//! Command-line arguments for the `tickerlens` binary.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP facade (`/news`, `/plot`, `/db`) |
//! | `history --user <U>` | Print a user's recorded lookups as JSON |
//! | `purge-history` | Delete every recorded lookup |
//!
//! # Examples
//!
//! ```bash
//! tickerlens serve --listen 127.0.0.1:8888 --allowed-origin https://app.example.com
//! tickerlens history --user u1 --pretty
//! TICKERLENS_DB_PATH=/tmp/history.duckdb tickerlens purge-history
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Symbol lookup facade: news headlines, daily prices and per-user history.
#[derive(Debug, Parser)]
#[command(name = "tickerlens", author, version, about)]
pub struct Cli {
    /// History database file. Defaults to `$TICKERLENS_HOME/history.duckdb`.
    #[arg(long, global = true, env = "TICKERLENS_DB_PATH")]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP facade.
    Serve(ServeArgs),

    /// Print the recorded lookups of one user.
    History(HistoryArgs),

    /// Delete every recorded lookup and print how many were removed.
    PurgeHistory,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Socket address to listen on.
    #[arg(long, env = "TICKERLENS_LISTEN", default_value = "0.0.0.0:8888")]
    pub listen: String,

    /// Alpha Vantage API key.
    #[arg(
        long,
        env = "TICKERLENS_ALPHAVANTAGE_API_KEY",
        default_value = "demo",
        hide_env_values = true
    )]
    pub alphavantage_key: String,

    /// Per-request upstream budget in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Restrict `Access-Control-Allow-Origin` to these origins.
    ///
    /// Without this flag the request's `Origin` is echoed back.
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// User whose lookups to print.
    #[arg(long)]
    pub user: String,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}
