// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Gateway HTTP server implementation

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use erp_gateway_core::domain::gateway_config::GatewayConfigManifest;
use erp_gateway_core::presentation::api::{app, AppState};

/// Listener overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ListenOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `host:port` the server binds, command line first, then configuration.
pub fn listen_address(config: &GatewayConfigManifest, overrides: &ListenOverrides) -> String {
    let host = overrides
        .host
        .as_deref()
        .unwrap_or(&config.spec.server.bind_address);
    let port = overrides.port.unwrap_or(config.spec.server.port);
    format!("{}:{}", host, port)
}

/// Prometheus listener address: the gateway's bind host with the metrics port.
pub fn metrics_address(
    config: &GatewayConfigManifest,
    overrides: &ListenOverrides,
) -> Result<SocketAddr> {
    let host = overrides
        .host
        .as_deref()
        .unwrap_or(&config.spec.server.bind_address);
    let port = config.spec.observability.metrics.port;
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("Failed to resolve metrics address {}:{}", host, port))?
        .next()
        .with_context(|| format!("No address found for metrics host {}", host))
}

pub async fn start_server(config: GatewayConfigManifest, overrides: ListenOverrides) -> Result<()> {
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Configuration loaded: name={} services={}",
        config.metadata.name,
        config.spec.services.len()
    );

    if config.spec.observability.metrics.enabled {
        install_metrics_exporter(metrics_address(&config, &overrides)?)?;
    }

    let state = AppState::from_config(&config.spec)?;
    let router = app(state);

    let addr = listen_address(&config, &overrides);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("ERP gateway listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("ERP gateway shutting down");

    Ok(())
}

fn install_metrics_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Prometheus metrics exposed on {}", addr);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
