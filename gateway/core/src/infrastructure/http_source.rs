// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP Domain Source Adapter
//
// Anti-Corruption Layer for the downstream ERP list endpoints.
// One instance per domain; instances of domains hosted by the same upstream
// service share that service's pooled client.

use async_trait::async_trait;
use std::fmt;
use tracing::debug;

use crate::domain::source::{
    Domain, DomainSource, ItemsEnvelope, SourceError, SourceOperation, SourceResult,
};

pub struct HttpDomainSource {
    domain: Domain,
    client: reqwest::Client,
    base_url: String,
}

impl HttpDomainSource {
    pub fn new(domain: Domain, client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            domain,
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, operation: SourceOperation) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), operation.path())
    }
}

#[async_trait]
impl DomainSource for HttpDomainSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    async fn fetch(&self, operation: SourceOperation, user_id: &str, limit: u32) -> SourceResult {
        if operation.domain() != self.domain {
            return Err(SourceError::InvalidInput(format!(
                "operation {} belongs to domain {}, not {}",
                operation,
                operation.domain(),
                self.domain
            )));
        }

        if limit == 0 {
            return Ok(Some(ItemsEnvelope::success(Vec::new(), "empty page", 200)));
        }

        let mut query: Vec<(&str, String)> = Vec::with_capacity(2);
        if operation.is_user_scoped() {
            if user_id.trim().is_empty() {
                return Err(SourceError::InvalidInput(format!(
                    "userId is required for {}",
                    operation
                )));
            }
            query.push(("userId", user_id.to_string()));
        }
        query.push(("size", limit.to_string()));

        let url = self.url_for(operation);
        debug!(%url, %operation, limit, "GET downstream list");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(e.to_string())
                } else {
                    SourceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status.as_u16(), response.text().await));
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::Network(e.to_string())
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<ItemsEnvelope>>(&bytes)
            .map_err(|e| SourceError::Decode(format!("{} response: {}", operation, e)))
    }
}

fn status_error<E: fmt::Display>(status: u16, body: Result<String, E>) -> SourceError {
    let body = body.unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    SourceError::Status { status, body }
}
