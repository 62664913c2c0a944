// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Domain Source Registry
//
// Maps each domain to the source that serves it. Built once at startup from
// the gateway configuration; immutable afterwards.

use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::gateway_config::{GatewayConfigSpec, ServiceConfig};
use crate::domain::source::{Domain, DomainSource};

use super::http_source::HttpDomainSource;

#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<Domain, Arc<dyn DomainSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under the domain it reports. Replaces any previous source.
    pub fn register(&mut self, source: Arc<dyn DomainSource>) {
        self.sources.insert(source.domain(), source);
    }

    pub fn with_source(mut self, source: Arc<dyn DomainSource>) -> Self {
        self.register(source);
        self
    }

    pub fn get(&self, domain: Domain) -> Option<&Arc<dyn DomainSource>> {
        self.sources.get(&domain)
    }

    /// Domains that have a source, sorted.
    pub fn domains(&self) -> Vec<Domain> {
        let mut domains: Vec<Domain> = self.sources.keys().copied().collect();
        domains.sort();
        domains
    }

    /// Create the HTTP source registry from gateway configuration.
    ///
    /// One pooled client per upstream service; a domain whose service is not
    /// configured gets no source.
    pub fn from_config(config: &GatewayConfigSpec) -> anyhow::Result<Self> {
        info!("Initializing domain source registry");

        let mut clients: HashMap<&str, reqwest::Client> = HashMap::new();
        for (key, service) in &config.services {
            let client = Self::build_client(service)
                .with_context(|| format!("Failed to build HTTP client for service '{}'", key))?;
            clients.insert(key.as_str(), client);
        }

        let mut registry = Self::new();
        for domain in Domain::ALL {
            let service_key = config.service_for(domain);
            match (clients.get(service_key), config.services.get(service_key)) {
                (Some(client), Some(service)) => {
                    let source =
                        HttpDomainSource::new(domain, client.clone(), service.base_url.clone());
                    info!("Mapping domain '{}' -> {} ({})", domain, service_key, source.base_url());
                    registry.register(Arc::new(source));
                }
                _ => {
                    warn!(
                        "No service '{}' configured for domain '{}'; its tabs will be empty",
                        service_key, domain
                    );
                }
            }
        }

        Ok(registry)
    }

    fn build_client(service: &ServiceConfig) -> anyhow::Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .connect_timeout(service.connect_timeout())
            .timeout(service.request_timeout())
            .build()?)
    }
}
