// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! API
//!
//! HTTP surface of the gateway: the dashboard workflow endpoint, bearer
//! token principal extraction and the health probe.
//!
//! # Architecture
//!
//! - **Layer:** Presentation Layer
//! - **Purpose:** Maps HTTP requests onto the dashboard workflow service
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/dashboard/workflows` | two-tab workflow view (alias `/dashboard/workflow`) |
//! | GET | `/health` | liveness with uptime |

use anyhow::Context;
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::application::dashboard::{
    DashboardError, DashboardWorkflowService, StandardDashboardWorkflowService,
};
use crate::domain::gateway_config::GatewayConfigSpec;
use crate::domain::principal::Principal;
use crate::domain::source::ApiEnvelope;
use crate::infrastructure::auth::PrincipalTokenVerifier;
use crate::infrastructure::source_registry::SourceRegistry;

pub struct AppState {
    pub dashboard: Arc<dyn DashboardWorkflowService>,
    /// `None` disables token verification; every request is then anonymous.
    pub verifier: Option<Arc<PrincipalTokenVerifier>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        dashboard: Arc<dyn DashboardWorkflowService>,
        verifier: Option<Arc<PrincipalTokenVerifier>>,
    ) -> Self {
        Self {
            dashboard,
            verifier,
            start_time: Instant::now(),
        }
    }

    /// Wire the dispatch table, source registry and token verifier from configuration.
    pub fn from_config(spec: &GatewayConfigSpec) -> anyhow::Result<Self> {
        let table = spec
            .dashboard
            .dispatch_table()
            .context("Invalid dashboard role overrides")?;
        let sources =
            SourceRegistry::from_config(spec).context("Failed to initialize domain sources")?;

        let dashboard = StandardDashboardWorkflowService::new(Arc::new(table), Arc::new(sources))
            .with_default_size(spec.dashboard.default_size);

        let verifier = match spec.auth.resolve_secret()? {
            Some(secret) => Some(Arc::new(
                PrincipalTokenVerifier::new(&secret, spec.auth.issuer.as_deref())
                    .context("Failed to initialize token verifier")?,
            )),
            None => {
                warn!("No JWT secret configured: authentication is disabled and dashboard requests will be rejected");
                None
            }
        };

        Ok(Self::new(Arc::new(dashboard), verifier))
    }
}

/// Principal attached to every request by [`authenticate`]; empty when the
/// request carried no valid token.
#[derive(Debug, Clone, Default)]
pub struct RequestPrincipal(pub Option<Principal>);

pub fn app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/dashboard/workflows", get(dashboard_workflows))
        .route("/dashboard/workflow", get(dashboard_workflows))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let principal = state
        .verifier
        .as_ref()
        .and_then(|verifier| verifier.principal_from_headers(request.headers()));
    request.extensions_mut().insert(RequestPrincipal(principal));
    next.run(request).await
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowQuery {
    pub size: Option<u32>,
}

async fn dashboard_workflows(
    State(state): State<Arc<AppState>>,
    Extension(RequestPrincipal(principal)): Extension<RequestPrincipal>,
    Query(query): Query<WorkflowQuery>,
) -> Response {
    match state.dashboard.workflows(principal.as_ref(), query.size).await {
        Ok(workflows) => {
            info!(tabs = ?workflows.tab_codes(), "Dashboard workflows served");
            (
                StatusCode::OK,
                Json(ApiEnvelope::success(
                    workflows,
                    "Dashboard workflows retrieved",
                    StatusCode::OK.as_u16(),
                )),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match self {
            DashboardError::AuthRequired => StatusCode::UNAUTHORIZED,
        };
        let body: ApiEnvelope<()> = ApiEnvelope::fail(self.to_string(), status.as_u16(), None);
        (status, Json(body)).into_response()
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}
