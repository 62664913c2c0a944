// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the dashboard workflow aggregator
//!
//! These tests drive `StandardDashboardWorkflowService` against scripted
//! in-memory domain sources and verify:
//! 1. Every role key yields its two tabs, in table order
//! 2. Failed, empty and null payloads collapse to empty tabs
//! 3. The requested size reaches both downstream calls
//! 4. Both calls run concurrently
//! 5. Anonymous callers are rejected before any downstream call

use async_trait::async_trait;
use erp_gateway_core::application::dashboard::{
    DashboardError, DashboardWorkflowService, StandardDashboardWorkflowService,
};
use erp_gateway_core::domain::dispatch::DispatchTable;
use erp_gateway_core::domain::principal::Principal;
use erp_gateway_core::domain::source::{
    ApiEnvelope, Domain, DomainSource, SourceError, SourceOperation, SourceResult,
};
use erp_gateway_core::domain::workflow::{TabCode, WorkflowItem};
use erp_gateway_core::infrastructure::source_registry::SourceRegistry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    /// Success envelope with items named after the operation
    Items(usize),
    /// Success envelope with an empty list
    Empty,
    /// Envelope whose `data` is null
    NullData,
    /// No envelope at all
    Absent,
    /// Downstream failure
    Fail,
    /// Sleep, then reply
    Delayed(Duration, Box<Reply>),
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    operation: SourceOperation,
    user_id: String,
    limit: u32,
}

struct ScriptedSource {
    domain: Domain,
    default_reply: Reply,
    replies: HashMap<SourceOperation, Reply>,
    calls: Arc<Mutex<Vec<Call>>>,
}

fn item(operation: SourceOperation, index: usize) -> WorkflowItem {
    WorkflowItem {
        item_id: Some(format!("{}-{}", operation.as_str(), index)),
        ..Default::default()
    }
}

fn resolve(reply: &Reply, operation: SourceOperation) -> SourceResult {
    match reply {
        Reply::Items(n) => Ok(Some(ApiEnvelope::success(
            (0..*n).map(|i| item(operation, i)).collect(),
            "ok",
            200,
        ))),
        Reply::Empty => Ok(Some(ApiEnvelope::success(Vec::new(), "ok", 200))),
        Reply::NullData => Ok(Some(ApiEnvelope::fail("no data", 200, None))),
        Reply::Absent => Ok(None),
        Reply::Fail => Err(SourceError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }),
        Reply::Delayed(_, inner) => resolve(inner, operation),
    }
}

#[async_trait]
impl DomainSource for ScriptedSource {
    fn domain(&self) -> Domain {
        self.domain
    }

    async fn fetch(&self, operation: SourceOperation, user_id: &str, limit: u32) -> SourceResult {
        self.calls.lock().unwrap().push(Call {
            operation,
            user_id: user_id.to_string(),
            limit,
        });

        let reply = self
            .replies
            .get(&operation)
            .unwrap_or(&self.default_reply)
            .clone();
        if let Reply::Delayed(delay, _) = &reply {
            tokio::time::sleep(*delay).await;
        }
        resolve(&reply, operation)
    }
}

struct Harness {
    service: StandardDashboardWorkflowService,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Harness {
    fn new(default_reply: Reply) -> Self {
        Self::with_replies(default_reply, HashMap::new())
    }

    fn with_replies(default_reply: Reply, replies: HashMap<SourceOperation, Reply>) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SourceRegistry::new();
        for domain in Domain::ALL {
            registry.register(Arc::new(ScriptedSource {
                domain,
                default_reply: default_reply.clone(),
                replies: replies.clone(),
                calls: calls.clone(),
            }));
        }

        Self {
            service: StandardDashboardWorkflowService::new(
                Arc::new(DispatchTable::standard()),
                Arc::new(registry),
            ),
            calls,
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

const ROLE_TABS: [(&str, [TabCode; 2]); 9] = [
    ("SUPPLIER_OPS", [TabCode::Po, TabCode::Ar]),
    ("CUSTOMER", [TabCode::Qt, TabCode::Ap]),
    ("MM_BUYER", [TabCode::Po, TabCode::So]),
    ("SD-SALES", [TabCode::Qt, TabCode::So]),
    ("FCM.CLERK", [TabCode::Ar, TabCode::Ap]),
    ("IM_STOCK", [TabCode::In, TabCode::Out]),
    ("HRM_MANAGER", [TabCode::Att, TabCode::Lv]),
    ("PP_PLANNER", [TabCode::Qt, TabCode::Mes]),
    ("AUDITOR", [TabCode::Ar, TabCode::Ap]),
];

#[tokio::test]
async fn test_every_role_gets_two_tabs_whatever_the_sources_return() {
    for reply in [
        Reply::Items(2),
        Reply::Empty,
        Reply::NullData,
        Reply::Absent,
        Reply::Fail,
    ] {
        for (role, codes) in ROLE_TABS {
            let harness = Harness::new(reply.clone());
            let principal = Principal::new("u1", role);

            let response = harness
                .service
                .workflows(Some(&principal), None)
                .await
                .expect("authenticated request must succeed");

            assert_eq!(response.tab_codes(), codes.to_vec(), "role {role}, reply {reply:?}");
            assert_eq!(harness.calls().len(), 2, "role {role}, reply {reply:?}");

            let expected_items = if matches!(reply, Reply::Items(_)) { 2 } else { 0 };
            for tab in &response.tabs {
                assert_eq!(tab.items.len(), expected_items, "role {role}, reply {reply:?}");
            }
        }
    }
}

#[tokio::test]
async fn test_tabs_follow_entry_order_and_bound_operations() {
    let harness = Harness::new(Reply::Items(1));
    let principal = Principal::new("u1", "MM_BUYER");

    let response = harness.service.workflows(Some(&principal), None).await.unwrap();

    assert_eq!(response.tabs[0].tab_code, TabCode::Po);
    assert_eq!(
        response.tabs[0].items[0].item_id.as_deref(),
        Some("purchase_requests-0")
    );
    assert_eq!(response.tabs[1].tab_code, TabCode::So);
    assert_eq!(
        response.tabs[1].items[0].item_id.as_deref(),
        Some("purchase_orders-0")
    );
}

#[tokio::test]
async fn test_one_failure_leaves_other_tab_intact() {
    let harness = Harness::with_replies(
        Reply::Items(3),
        HashMap::from([(SourceOperation::LeaveRequests, Reply::Fail)]),
    );
    let principal = Principal::new("u7", "HRM_MANAGER");

    let response = harness.service.workflows(Some(&principal), Some(3)).await.unwrap();

    assert_eq!(response.tabs[0].tab_code, TabCode::Att);
    assert_eq!(response.tabs[0].items.len(), 3);
    assert_eq!(response.tabs[1].tab_code, TabCode::Lv);
    assert!(response.tabs[1].items.is_empty());
}

#[tokio::test]
async fn test_missing_domain_source_yields_empty_tab() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = SourceRegistry::new().with_source(Arc::new(ScriptedSource {
        domain: Domain::Hr,
        default_reply: Reply::Items(2),
        replies: HashMap::new(),
        calls: calls.clone(),
    }));
    let service = StandardDashboardWorkflowService::new(
        Arc::new(DispatchTable::standard()),
        Arc::new(registry),
    );

    // SUPPLIER binds procurement and finance; neither is registered
    let response = service
        .workflows(Some(&Principal::new("s1", "SUPPLIER")), None)
        .await
        .unwrap();

    assert_eq!(response.tab_codes(), vec![TabCode::Po, TabCode::Ar]);
    assert!(response.tabs.iter().all(|tab| tab.items.is_empty()));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_omitted_size_uses_default_of_five() {
    let harness = Harness::new(Reply::Empty);
    let principal = Principal::new("u1", "IM_STOCK");

    harness.service.workflows(Some(&principal), None).await.unwrap();

    let limits: Vec<u32> = harness.calls().iter().map(|call| call.limit).collect();
    assert_eq!(limits, vec![5, 5]);
}

#[tokio::test]
async fn test_explicit_size_reaches_both_calls() {
    let harness = Harness::new(Reply::Empty);
    let principal = Principal::new("u1", "IM_STOCK");

    harness.service.workflows(Some(&principal), Some(12)).await.unwrap();

    let limits: Vec<u32> = harness.calls().iter().map(|call| call.limit).collect();
    assert_eq!(limits, vec![12, 12]);
}

#[tokio::test]
async fn test_configured_default_size() {
    let harness = Harness::new(Reply::Empty);
    let service = harness.service.with_default_size(9);

    service
        .workflows(Some(&Principal::new("u1", "FCM")), None)
        .await
        .unwrap();

    let limits: Vec<u32> = harness.calls.lock().unwrap().iter().map(|c| c.limit).collect();
    assert_eq!(limits, vec![9, 9]);
}

#[tokio::test(start_paused = true)]
async fn test_calls_run_concurrently() {
    let harness = Harness::with_replies(
        Reply::Empty,
        HashMap::from([
            (
                SourceOperation::InboundDeliveries,
                Reply::Delayed(Duration::from_millis(100), Box::new(Reply::Items(1))),
            ),
            (
                SourceOperation::OutboundDeliveries,
                Reply::Delayed(Duration::from_millis(250), Box::new(Reply::Items(1))),
            ),
        ]),
    );
    let principal = Principal::new("u1", "IM");

    let started = tokio::time::Instant::now();
    let response = harness.service.workflows(Some(&principal), None).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(250), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(350), "elapsed {elapsed:?}");
    assert_eq!(response.tab_codes(), vec![TabCode::In, TabCode::Out]);
    assert_eq!(response.tabs[0].items.len(), 1);
    assert_eq!(response.tabs[1].items.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_output_order_ignores_completion_order() {
    let harness = Harness::with_replies(
        Reply::Items(1),
        HashMap::from([(
            SourceOperation::AttendanceRecords,
            Reply::Delayed(Duration::from_millis(500), Box::new(Reply::Items(1))),
        )]),
    );

    let response = harness
        .service
        .workflows(Some(&Principal::new("u1", "HRM")), None)
        .await
        .unwrap();

    assert_eq!(response.tab_codes(), vec![TabCode::Att, TabCode::Lv]);
}

#[tokio::test]
async fn test_supplier_ops_end_to_end() {
    let harness = Harness::new(Reply::Items(3));
    let principal = Principal::new("u1", "SUPPLIER_OPS");

    let response = harness.service.workflows(Some(&principal), Some(3)).await.unwrap();

    let mut calls = harness.calls();
    calls.sort_by_key(|call| call.operation.as_str());
    assert_eq!(
        calls,
        vec![
            Call {
                operation: SourceOperation::SupplierPurchaseOrders,
                user_id: "u1".to_string(),
                limit: 3,
            },
            Call {
                operation: SourceOperation::SupplierSalesInvoices,
                user_id: "u1".to_string(),
                limit: 3,
            },
        ]
    );

    assert_eq!(response.tab_codes(), vec![TabCode::Po, TabCode::Ar]);
    assert_eq!(response.tabs[0].items.len(), 3);
    assert_eq!(response.tabs[1].items.len(), 3);
}

#[tokio::test]
async fn test_supplier_user_type_overrides_role() {
    let harness = Harness::new(Reply::Empty);
    let principal = Principal::new("s1", "OPS_LEAD").with_user_type("SUPPLIER");

    let response = harness.service.workflows(Some(&principal), None).await.unwrap();
    assert_eq!(response.tab_codes(), vec![TabCode::Po, TabCode::Ar]);
}

#[tokio::test]
async fn test_no_principal_is_rejected_without_calls() {
    let harness = Harness::new(Reply::Items(5));

    let result = harness.service.workflows(None, Some(3)).await;

    assert_eq!(result.unwrap_err(), DashboardError::AuthRequired);
    assert!(harness.calls().is_empty());
}
