// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Dashboard Workflow Aggregator
//!
//! Resolves the caller's dispatch entry, fans out to the two bound domain
//! source operations and composes the two-tab workflow response.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates dispatch lookup, fan-out and null-safe composition
//!
//! A failed or empty downstream call only empties its own tab. Both calls
//! are joined in place; dropping the returned future cancels them.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::application::payload::items_or_empty;
use crate::domain::dispatch::DispatchTable;
use crate::domain::principal::Principal;
use crate::domain::source::{SourceError, SourceOperation, SourceResult};
use crate::domain::workflow::{Tab, WorkflowResponse};
use crate::infrastructure::source_registry::SourceRegistry;

/// Item count requested per tab when the caller sends no size.
pub const DEFAULT_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("Authentication required")]
    AuthRequired,
}

#[async_trait]
pub trait DashboardWorkflowService: Send + Sync {
    /// Two-tab workflow view for `principal`, `size` items per tab at most.
    async fn workflows(
        &self,
        principal: Option<&Principal>,
        size: Option<u32>,
    ) -> Result<WorkflowResponse, DashboardError>;
}

pub struct StandardDashboardWorkflowService {
    table: Arc<DispatchTable>,
    sources: Arc<SourceRegistry>,
    default_size: u32,
}

impl StandardDashboardWorkflowService {
    pub fn new(table: Arc<DispatchTable>, sources: Arc<SourceRegistry>) -> Self {
        Self {
            table,
            sources,
            default_size: DEFAULT_SIZE,
        }
    }

    pub fn with_default_size(mut self, default_size: u32) -> Self {
        self.default_size = default_size;
        self
    }

    async fn call(&self, operation: SourceOperation, user_id: &str, limit: u32) -> SourceResult {
        let domain = operation.domain();
        match self.sources.get(domain) {
            Some(source) => {
                debug!(%operation, %domain, limit, "Calling domain source");
                source.fetch(operation, user_id, limit).await
            }
            None => Err(SourceError::Unavailable(domain)),
        }
    }
}

#[async_trait]
impl DashboardWorkflowService for StandardDashboardWorkflowService {
    async fn workflows(
        &self,
        principal: Option<&Principal>,
        size: Option<u32>,
    ) -> Result<WorkflowResponse, DashboardError> {
        let Some(principal) = principal else {
            warn!("Dashboard workflow request rejected: no authenticated principal");
            metrics::counter!("gateway_dashboard_auth_rejections_total").increment(1);
            return Err(DashboardError::AuthRequired);
        };

        let started = Instant::now();
        let limit = size.unwrap_or(self.default_size);
        let role_key = principal.dispatch_key();
        let entry = self.table.resolve(&role_key);

        info!(
            user_id = %principal.user_id,
            role_key = %role_key,
            entry = entry.role_key(),
            limit,
            "Resolving dashboard workflows"
        );

        let results = join_all(
            entry
                .bindings()
                .iter()
                .map(|binding| self.call(binding.operation, &principal.user_id, limit)),
        )
        .await;

        let tabs = entry
            .bindings()
            .iter()
            .zip(results)
            .map(|(binding, result)| {
                if let Err(e) = &result {
                    warn!(
                        role_key = entry.role_key(),
                        tab_code = %binding.tab_code,
                        operation = %binding.operation,
                        error = %e,
                        "Domain source call failed, returning empty tab"
                    );
                    metrics::counter!(
                        "gateway_dashboard_source_failures_total",
                        "operation" => binding.operation.as_str(),
                        "kind" => e.kind()
                    )
                    .increment(1);
                }
                Tab::new(binding.tab_code, items_or_empty(result))
            })
            .collect();

        metrics::counter!(
            "gateway_dashboard_requests_total",
            "role_key" => entry.role_key().to_string()
        )
        .increment(1);
        metrics::histogram!("gateway_dashboard_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        Ok(WorkflowResponse { tabs })
    }
}
