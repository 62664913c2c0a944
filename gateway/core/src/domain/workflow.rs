// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Workflow
//!
//! Dashboard workflow response model: items, tabs and the two-tab response.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Normalized shapes moved end to end by the aggregator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single dashboard entry as produced by a downstream service.
///
/// The aggregator never inspects these fields; unknown fields survive the
/// round trip through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowItem {
    /// Source identifier (quotation id, purchase order id, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    /// One-line summary, usually the counterparty name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_title: Option<String>,

    /// Business document number (e.g. "PO-2025-001")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_number: Option<String>,

    /// Person in charge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Module status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,

    /// ISO-8601 due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Fixed tab vocabulary of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TabCode {
    /// Purchase orders
    Po,
    /// Payables / purchase invoices
    Ap,
    /// Receivables / sales invoices
    Ar,
    /// Sales orders
    So,
    /// Purchase requests
    Pr,
    /// Quotations
    Qt,
    /// Inbound deliveries
    In,
    /// Outbound deliveries
    Out,
    /// Attendance
    Att,
    /// Leave
    Lv,
    /// Manufacturing execution
    Mes,
}

impl TabCode {
    pub const ALL: [TabCode; 11] = [
        TabCode::Po,
        TabCode::Ap,
        TabCode::Ar,
        TabCode::So,
        TabCode::Pr,
        TabCode::Qt,
        TabCode::In,
        TabCode::Out,
        TabCode::Att,
        TabCode::Lv,
        TabCode::Mes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TabCode::Po => "PO",
            TabCode::Ap => "AP",
            TabCode::Ar => "AR",
            TabCode::So => "SO",
            TabCode::Pr => "PR",
            TabCode::Qt => "QT",
            TabCode::In => "IN",
            TabCode::Out => "OUT",
            TabCode::Att => "ATT",
            TabCode::Lv => "LV",
            TabCode::Mes => "MES",
        }
    }
}

impl fmt::Display for TabCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tab code: {0}")]
pub struct UnknownTabCode(pub String);

impl FromStr for TabCode {
    type Err = UnknownTabCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        TabCode::ALL
            .into_iter()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| UnknownTabCode(s.to_string()))
    }
}

/// One labelled section of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub tab_code: TabCode,
    pub items: Vec<WorkflowItem>,
}

impl Tab {
    pub fn new(tab_code: TabCode, items: Vec<WorkflowItem>) -> Self {
        Self { tab_code, items }
    }
}

/// The dashboard workflow payload. Always carries two tabs in dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub tabs: Vec<Tab>,
}

impl WorkflowResponse {
    pub fn tab_codes(&self) -> Vec<TabCode> {
        self.tabs.iter().map(|tab| tab.tab_code).collect()
    }
}
