//! ngramq - query an n-gram statistics service from the terminal.
//!
//! Posts a single gram query to the service and prints each result as
//! `<gram> <percent>`. When the service reports a failure its response body
//! is printed as-is and the process still exits successfully.

mod client;
mod config;
mod error;
mod protocol;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{HttpTransport, QueryClient, Transport};
use config::{Config, QueryOverrides};
use protocol::{QueryRequest, QueryResponse};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ngramq")]
#[command(author, version, about = "Query an n-gram statistics service")]
#[command(long_about = "Query an n-gram statistics service.\n\nWith no options, requests every unigram of the configured corpus with whitespace grams excluded.")]
struct Cli {
    /// Corpus to query
    #[arg(short = 'c', long, value_name = "NAME")]
    corpus: Option<String>,

    /// N-gram order (1 = unigram, 2 = bigram, ...)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    ngram: Option<u32>,

    /// Maximum number of results to request
    #[arg(long, value_name = "N")]
    count: Option<u64>,

    /// Fold shifted characters onto their unshifted keys
    #[arg(long)]
    noshift: bool,

    /// Keep grams that contain whitespace
    #[arg(long)]
    keep_space: bool,

    /// Only return grams matching this pattern
    #[arg(short = 'r', long, value_name = "PATTERN")]
    regex: Option<String>,

    /// Override the service endpoint URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the response body verbatim, even on success
    #[arg(long)]
    raw: bool,

    /// Log request details to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> QueryOverrides {
        QueryOverrides {
            corpus: self.corpus.clone(),
            ngram: self.ngram,
            count: self.count,
            noshift: self.noshift,
            keep_space: self.keep_space,
            regex: self.regex.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Config) => handle_config(),
        None => handle_query(cli).await,
    }
}

/// Log to stderr so stdout only carries query output.
fn init_logging(verbose: bool) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(verbose, env.as_deref())?)
        .init();
    Ok(())
}

/// `RUST_LOG` replaces the built-in directives when set; `-v` raises ngramq to debug on top.
fn build_filter(verbose: bool, env: Option<&str>) -> Result<EnvFilter> {
    let defaults = || EnvFilter::new("ngramq=warn,reqwest=warn");
    let filter = match env.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| defaults()),
        None => defaults(),
    };

    if verbose {
        Ok(filter.add_directive("ngramq=debug".parse()?))
    } else {
        Ok(filter)
    }
}

/// Print the effective configuration as TOML.
fn handle_config() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;

    println!("# {}", path.display());
    if !path.exists() {
        println!("# (file not found, showing defaults)");
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Send the query and print the result.
async fn handle_query(cli: Cli) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let request = config.build_request(cli.overrides());
    debug!(?request, "built request");

    let endpoint = cli
        .endpoint
        .unwrap_or_else(|| config.service.endpoint.clone());
    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout());

    let client = QueryClient::new(HttpTransport::new(endpoint, timeout)?);
    run_query(&client, &request, cli.raw, std::io::stdout().lock()).await
}

/// Send one request and write its output to `out`.
///
/// With `raw` set the body is written untouched whatever the status.
async fn run_query<T: Transport, W: Write>(
    client: &QueryClient<T>,
    request: &QueryRequest,
    raw: bool,
    out: W,
) -> Result<()> {
    if raw {
        let raw = client.send(request).await?;
        info!(status = raw.status, "raw response");
        render::write_raw(&raw.body, out).context("Failed to write output")?;
        return Ok(());
    }

    let response = client.query(request).await?;
    if let QueryResponse::Failure { status, .. } = &response {
        info!(status, "printing service failure body");
    }
    render::write_response(&response, out).context("Failed to write output")?;
    Ok(())
}
