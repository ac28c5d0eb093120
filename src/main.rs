//! `mgw-wait`: block until an API Manager / microgateway deployment converges.
//!
//! Exit status is 0 when the awaited state was observed and 1 when the
//! budget ran out or the request could not be built.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use mgw_harness::config::{
    default_config, load_config, validate_config, ConfigError, ObservabilityConfig, WaiterConfig,
};
use mgw_harness::http::parse_headers;
use mgw_harness::observability::init_logging;
use mgw_harness::waiter::{await_response_available_with, Contains};
use mgw_harness::{
    ApiPresence, DeploymentSync, EventualConsistencyWaiter, HarnessConfig, HarnessError,
    HttpClient, WaitOutcome,
};

#[derive(Parser)]
#[command(name = "mgw-wait")]
#[command(about = "Wait for an API Manager / microgateway deployment to converge", long_about = None)]
struct Cli {
    /// Harness configuration file (TOML). Defaults describe a local deployment.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset. Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a URL until its body contains a substring
    Until {
        #[arg(long)]
        url: String,

        /// Substring the response body must contain
        #[arg(long)]
        contains: String,

        /// Extra request header, `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        #[arg(long)]
        timeout_ms: Option<u64>,

        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Wait for an API to appear on (or vanish from) the gateway
    ApiSync {
        #[arg(long)]
        name: String,

        /// API version, e.g. 1.0.0
        #[arg(long)]
        version: String,

        /// Provider, `user[@tenant-domain]`. Selects the tenant path. Defaults
        /// to the configured user.
        #[arg(long)]
        provider: Option<String>,

        /// Wait for undeployment instead of deployment
        #[arg(long)]
        absent: bool,
    },
    /// Wait until an endpoint answers with any status
    Available {
        #[arg(long)]
        url: String,

        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Installed before the config is read so loader messages are kept. The
    // configured level is applied once known.
    let bootstrap_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| ObservabilityConfig::default().log_level);
    let log_handle = init_logging(&bootstrap_level);

    let config = match &cli.config {
        Some(path) => load_config(path),
        None => default_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let (None, Some(handle)) = (&cli.log_level, &log_handle) {
        if let Err(e) = handle.set_level(&config.observability.log_level) {
            tracing::warn!(error = %e, "Could not apply configured log level");
        }
    }

    let started = Instant::now();
    match run(cli.command, &config).await {
        Ok(mut summary) => {
            let matched = summary["outcome"] == "matched";
            summary["elapsed_ms"] = json!(started.elapsed().as_millis() as u64);
            println!("{}", summary);
            if matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "mgw-wait failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &HarnessConfig) -> Result<Value, HarnessError> {
    let client = HttpClient::new(&config.http)?;

    match command {
        Commands::Until {
            url,
            contains,
            headers,
            timeout_ms,
            interval_ms,
        } => {
            let headers = parse_headers(&headers)?;
            let budget = waiter_budget(config, timeout_ms, interval_ms)?;
            let waiter = EventualConsistencyWaiter::from_config(client, &budget);

            let outcome = waiter
                .wait_until(&url, &headers, &Contains::new(contains.as_str()))
                .await;
            Ok(json!({
                "command": "until",
                "url": url,
                "expected": contains,
                "outcome": outcome_label(outcome),
            }))
        }
        Commands::ApiSync {
            name,
            version,
            provider,
            absent,
        } => {
            let presence = if absent {
                ApiPresence::NotExists
            } else {
                ApiPresence::Exists
            };
            let provider = provider.unwrap_or_else(|| config.user.username.clone());

            let sync = DeploymentSync::new(client, config);
            let outcome = sync
                .wait_for_api_deployment_sync(&provider, &name, &version, presence)
                .await?;
            Ok(json!({
                "command": "api-sync",
                "url": sync.status_url(&provider, &name, &version),
                "expected": presence.expected_response(),
                "outcome": outcome_label(outcome),
            }))
        }
        Commands::Available { url, headers } => {
            let headers = parse_headers(&headers)?;
            let response =
                await_response_available_with(&client, &url, &headers, &config.waiter).await?;
            Ok(json!({
                "command": "available",
                "url": url,
                "status": response.status,
                "outcome": "matched",
            }))
        }
    }
}

/// Waiter settings with command-line overrides applied, held to the same
/// rules as the config file.
fn waiter_budget(
    config: &HarnessConfig,
    timeout_ms: Option<u64>,
    interval_ms: Option<u64>,
) -> Result<WaiterConfig, HarnessError> {
    let mut effective = config.clone();
    if let Some(ms) = timeout_ms {
        effective.waiter.timeout_ms = ms;
    }
    if let Some(ms) = interval_ms {
        effective.waiter.interval_ms = ms;
    }
    validate_config(&effective).map_err(ConfigError::Validation)?;
    Ok(effective.waiter)
}

fn outcome_label(outcome: WaitOutcome) -> &'static str {
    match outcome {
        WaitOutcome::Matched => "matched",
        WaitOutcome::TimedOut => "timed_out",
    }
}
