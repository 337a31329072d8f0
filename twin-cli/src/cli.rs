//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use http::Method;
use rust_decimal::Decimal;

/// Command-line client for TODAQ twins.
#[derive(Parser, Debug)]
#[command(name = "twin-cli")]
#[command(version)]
#[command(about = "Talk to a TODAQ twin: read info, pay, micropay, fetch and import files")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of your own twin.
    #[arg(long, env = "TWIN_URL", global = true)]
    pub url: Option<String>,

    /// API key of your own twin.
    #[arg(long, env = "TWIN_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "TWIN_TIMEOUT_SECS", global = true, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Cli {
    /// Returns the request timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the twin's public info document.
    Info,

    /// Transfer tokens directly to another twin.
    Pay {
        /// Base URL of the destination twin.
        destination: String,
        /// Token type hash.
        token_type: String,
        /// Amount to transfer.
        amount: Decimal,
    },

    /// Pay another twin's paywall with an explicit token type and amount.
    Micropay {
        /// Base URL of the destination twin.
        destination: String,
        /// Token type hash.
        token_type: String,
        /// Amount to pay.
        amount: Decimal,

        /// HTTP method used against the pay endpoint.
        #[arg(short = 'X', long, default_value = "GET")]
        method: Method,

        /// JSON body forwarded to the destination.
        #[arg(short, long, value_parser = parse_json)]
        body: Option<serde_json::Value>,
    },

    /// Pay exactly what another twin's paywall advertises.
    Unlock {
        /// Base URL of the destination twin.
        destination: String,
    },

    /// Download a binary file from the twin.
    Fetch {
        /// Hash of the file.
        id: String,

        /// Write to this path instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Upload a binary file to the twin.
    Import {
        /// Path to the file.
        file: PathBuf,
    },
}

fn parse_json(value: &str) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(value)
}
