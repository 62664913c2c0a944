// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Router-level tests for the gateway HTTP surface

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use erp_gateway_core::application::dashboard::StandardDashboardWorkflowService;
use erp_gateway_core::domain::dispatch::DispatchTable;
use erp_gateway_core::domain::source::{
    ApiEnvelope, Domain, DomainSource, SourceOperation, SourceResult,
};
use erp_gateway_core::domain::workflow::WorkflowItem;
use erp_gateway_core::infrastructure::auth::PrincipalTokenVerifier;
use erp_gateway_core::infrastructure::source_registry::SourceRegistry;
use erp_gateway_core::presentation::api::{app, AppState};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

const SECRET: &str = "router-secret";

/// Echoes the operation and limit back as a single item.
struct EchoSource {
    domain: Domain,
    limits: Arc<Mutex<Vec<u32>>>,
}

#[async_trait]
impl DomainSource for EchoSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    async fn fetch(&self, operation: SourceOperation, user_id: &str, limit: u32) -> SourceResult {
        self.limits.lock().unwrap().push(limit);
        let item = WorkflowItem {
            item_id: Some(format!("{}:{}", operation, user_id)),
            ..Default::default()
        };
        Ok(Some(ApiEnvelope::success(vec![item], "ok", 200)))
    }
}

fn router(limits: Arc<Mutex<Vec<u32>>>) -> axum::Router {
    let mut registry = SourceRegistry::new();
    for domain in Domain::ALL {
        registry.register(Arc::new(EchoSource {
            domain,
            limits: limits.clone(),
        }));
    }
    let dashboard = StandardDashboardWorkflowService::new(
        Arc::new(DispatchTable::standard()),
        Arc::new(registry),
    );
    let verifier = PrincipalTokenVerifier::new(SECRET, None).unwrap();
    app(AppState::new(Arc::new(dashboard), Some(Arc::new(verifier))))
}

fn token(user_id: &str, role: &str) -> String {
    let exp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() + 3600;
    encode(
        &Header::new(Algorithm::HS256),
        &json!({ "user_id": user_id, "user_role": role, "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn get(router: axum::Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_workflows_for_authenticated_caller() {
    let limits = Arc::new(Mutex::new(Vec::new()));
    let (status, body) = get(
        router(limits.clone()),
        "/dashboard/workflows?size=3",
        Some(&token("u1", "SUPPLIER_OPS")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["status"], json!(200));
    assert_eq!(
        body["data"],
        json!({
            "tabs": [
                { "tabCode": "PO", "items": [{ "itemId": "supplier_purchase_orders:u1" }] },
                { "tabCode": "AR", "items": [{ "itemId": "supplier_sales_invoices:u1" }] }
            ]
        })
    );
    assert_eq!(*limits.lock().unwrap(), vec![3, 3]);
}

#[tokio::test]
async fn test_singular_alias_and_default_size() {
    let limits = Arc::new(Mutex::new(Vec::new()));
    let (status, body) = get(
        router(limits.clone()),
        "/dashboard/workflow",
        Some(&token("u2", "HRM_MANAGER")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["data"]["tabs"][0]["tabCode"], json!("ATT"));
    assert_eq!(body["data"]["tabs"][1]["tabCode"], json!("LV"));
    assert_eq!(*limits.lock().unwrap(), vec![5, 5]);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let limits = Arc::new(Mutex::new(Vec::new()));
    let (status, body) = get(router(limits.clone()), "/dashboard/workflows", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["status"], json!(401));
    assert!(body.get("data").is_none());
    assert!(limits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_forged_token_is_unauthorized() {
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &json!({ "user_id": "u1", "user_role": "FCM", "exp": u64::MAX / 2 }),
        &EncodingKey::from_secret(b"not-the-secret"),
    )
    .unwrap();

    let limits = Arc::new(Mutex::new(Vec::new()));
    let (status, _) = get(router(limits.clone()), "/dashboard/workflows", Some(&forged)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(limits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_size_is_bad_request() {
    for uri in ["/dashboard/workflows?size=-1", "/dashboard/workflows?size=abc"] {
        let limits = Arc::new(Mutex::new(Vec::new()));
        let (status, _) = get(router(limits.clone()), uri, Some(&token("u1", "FCM"))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert!(limits.lock().unwrap().is_empty(), "uri {uri}");
    }
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(router(Arc::new(Mutex::new(Vec::new()))), "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], json!("healthy"));
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_auth_disabled_rejects_every_dashboard_request() {
    let dashboard = StandardDashboardWorkflowService::new(
        Arc::new(DispatchTable::standard()),
        Arc::new(SourceRegistry::new()),
    );
    let router = app(AppState::new(Arc::new(dashboard), None));

    let (status, _) = get(router, "/dashboard/workflows", Some(&token("u1", "FCM"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
