// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # ERP Dashboard Gateway
//!
//! The `erp-gateway` binary serves role-specific dashboard views aggregated
//! from the ERP domain services.
//!
//! ## Commands
//!
//! - `erp-gateway` / `erp-gateway serve` - Run the HTTP gateway
//! - `erp-gateway config show|validate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use erp_gateway::commands::{self, ConfigCommand};
use erp_gateway::server::{self, ListenOverrides};
use erp_gateway_core::domain::gateway_config::GatewayConfigManifest;

/// ERP Dashboard Gateway - role-based dashboard aggregation
#[derive(Parser, Debug)]
#[command(name = "erp-gateway")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "ERP_GATEWAY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP bind host (default: spec.server.bind_address)
    #[arg(long, global = true, env = "ERP_GATEWAY_HOST")]
    host: Option<String>,

    /// HTTP port (default: spec.server.port)
    #[arg(long, global = true, env = "ERP_GATEWAY_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, env = "ERP_GATEWAY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway (default)
    #[command(name = "serve")]
    Serve,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), "text")?;
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Serve) | None => {
            let config = GatewayConfigManifest::load_or_default(cli.config)
                .context("Failed to load configuration")?;

            let logging = &config.spec.observability.logging;
            init_logging(cli.log_level.as_deref().unwrap_or(&logging.level), &logging.format)?;

            info!("Starting ERP gateway v{}", env!("CARGO_PKG_VERSION"));

            let overrides = ListenOverrides {
                host: cli.host,
                port: cli.port,
            };
            if let Err(e) = server::start_server(config, overrides).await {
                error!("Gateway failed: {:#}", e);
                return Err(e);
            }
            Ok(())
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .init();
    }

    Ok(())
}
