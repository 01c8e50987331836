// SPDX-FileCopyrightText: 2026 Conduit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conduit - operator CLI for the provider adapters.
//!
//! Probes configured providers and replays saved webhook bodies through the
//! same adapters the application uses.

mod adapters;
mod check;
mod show_config;
mod webhook;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use conduit_config::ConduitConfig;
use conduit_core::{ConduitError, Provider};

/// Conduit - third-party integration adapters.
#[derive(Parser, Debug)]
#[command(name = "conduit", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Probe a provider with its configured credentials.
    Check {
        /// msg91, telegram, whatsapp, shiprocket or cashfree.
        provider: Provider,
    },
    /// Replay a saved webhook body.
    Webhook {
        #[command(subcommand)]
        action: WebhookCommand,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[derive(Subcommand, Debug)]
enum WebhookCommand {
    /// Print the normalized event for a webhook body.
    Parse { provider: Provider, file: PathBuf },
    /// Check a webhook signature.
    Verify {
        provider: Provider,
        file: PathBuf,
        /// Signature header value as received.
        #[arg(long)]
        signature: String,
        /// Secret to verify with instead of the configured `webhook_secret`.
        #[arg(long)]
        secret: Option<String>,
        /// Cashfree signing timestamp.
        #[arg(long)]
        timestamp: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => conduit_config::load_and_validate_path(path),
        None => conduit_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            conduit_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log.level);

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("conduit: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &ConduitConfig) -> Result<ExitCode, ConduitError> {
    match command {
        Commands::Check { provider } => {
            let result = check::run_check(config, provider).await?;
            println!("{}", to_json(&result)?);
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Webhook {
            action: WebhookCommand::Parse { provider, file },
        } => {
            let body = read_body(&file)?;
            let event = webhook::parse_webhook(config, provider, &body)?;
            println!("{}", to_json(&event)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Webhook {
            action:
                WebhookCommand::Verify {
                    provider,
                    file,
                    signature,
                    secret,
                    timestamp,
                },
        } => {
            let body = read_body(&file)?;
            let options = webhook::VerifyOptions {
                secret: secret.as_deref(),
                timestamp: timestamp.as_deref(),
            };
            let valid = webhook::verify_webhook(config, provider, &body, &signature, &options)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Config => {
            print!("{}", show_config::render_config(config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_body(path: &Path) -> Result<Vec<u8>, ConduitError> {
    std::fs::read(path)
        .map_err(|e| ConduitError::Config(format!("failed to read {}: {e}", path.display())))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ConduitError> {
    serde_json::to_string_pretty(value).map_err(|e| ConduitError::Decode {
        message: e.to_string(),
    })
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("conduit={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
