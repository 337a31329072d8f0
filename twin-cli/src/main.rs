//! Command-line client for TODAQ twins.
//!
//! # Usage
//!
//! ```bash
//! export TWIN_URL=https://41aa.tq.biz.todaq.net
//! export TWIN_API_KEY=...
//!
//! twin-cli info
//! twin-cli micropay https://41bb.tq.biz.todaq.net 41tokentype 0.1
//! twin-cli unlock https://41bb.tq.biz.todaq.net
//! twin-cli fetch 41binderhash --output file.bin
//! twin-cli import file.bin
//! ```
//!
//! # Environment Variables
//!
//! A `.env` file in the working directory is loaded first.
//!
//! - `TWIN_URL` - Base URL of your own twin
//! - `TWIN_API_KEY` - API key of your own twin
//! - `TWIN_TIMEOUT_SECS` - Request timeout (default: `30`)
//! - `RUST_LOG` - Log level filter (default: `info`), logs go to stderr

mod cli;

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use twin::{ClientConfig, MicropayOptions, RequestBody, ResponseBody, TwinClient, TwinHash};
use twin_http::ReqwestTransport;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let url = cli
        .url
        .as_deref()
        .ok_or("missing twin URL: pass --url or set TWIN_URL")?;
    let mut config = ClientConfig::parse(url)?;
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key.clone());
    }
    tracing::debug!(?config, "loaded configuration");

    let transport = ReqwestTransport::new().with_timeout(cli.timeout());
    let client = TwinClient::new(config, transport);

    match cli.command {
        Command::Info => {
            let info = client.info().await?;
            print_json(&serde_json::to_value(&info)?)?;
        }
        Command::Pay {
            destination,
            token_type,
            amount,
        } => {
            let body = client
                .pay(&destination, &TwinHash::new(token_type), amount)
                .await?;
            tracing::info!(%destination, %amount, "transfer accepted");
            print_body(body)?;
        }
        Command::Micropay {
            destination,
            token_type,
            amount,
            method,
            body,
        } => {
            let mut options = MicropayOptions::new().with_method(method);
            if let Some(body) = body {
                options = options.with_body(RequestBody::Json(body));
            }
            let body = client
                .micropay(&destination, &TwinHash::new(token_type), amount, options)
                .await?;
            tracing::info!(%destination, %amount, "micropay accepted");
            print_body(body)?;
        }
        Command::Unlock { destination } => {
            let body = client
                .micropay_paywall(&destination, MicropayOptions::default())
                .await?;
            tracing::info!(%destination, "paywall unlocked");
            print_body(body)?;
        }
        Command::Fetch { id, output } => {
            let bytes = client.fetch(&TwinHash::new(id)).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)?;
                    tracing::info!(path = %path.display(), len = bytes.len(), "file written");
                }
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
        Command::Import { file } => {
            let bytes = std::fs::read(&file)?;
            let body = client.import(bytes).await?;
            tracing::info!(file = %file.display(), "file imported");
            print_body(body)?;
        }
    }
    Ok(())
}

fn print_body(body: ResponseBody) -> std::io::Result<()> {
    match body {
        ResponseBody::Empty => Ok(()),
        ResponseBody::Json(value) => print_json(&value),
        ResponseBody::Text(text) => writeln!(std::io::stdout(), "{text}"),
        ResponseBody::Binary(bytes) => std::io::stdout().write_all(&bytes),
    }
}

fn print_json(value: &serde_json::Value) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)
}
