// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use erp_gateway_core::domain::gateway_config::{GatewayConfigManifest, CONFIG_PATH_ENV};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = GatewayConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./erp-gateway.yaml");
        println!("  4. ~/.erp-gateway/config.yaml");
        println!("  5. /etc/erp-gateway/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    print!("{}", redacted(config).to_yaml_string()?);

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = GatewayConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    config
        .spec
        .auth
        .resolve_secret()
        .context("Failed to resolve auth.jwt_secret")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

/// Hide the signing secret unless it is an `env:` reference.
fn redacted(mut config: GatewayConfigManifest) -> GatewayConfigManifest {
    if let Some(secret) = config.spec.auth.jwt_secret.as_mut() {
        if !secret.starts_with("env:") {
            *secret = "********".to_string();
        }
    }
    config
}
