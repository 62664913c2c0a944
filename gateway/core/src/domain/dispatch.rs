// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Role Dispatch Table
//!
//! Maps a role key to exactly two `(tab code, source operation)` bindings.
//! Built once at startup, shared read-only across requests.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Data-driven replacement for per-role branching
//!
//! | role key | tab 1 | operation | tab 2 | operation |
//! |----------|-------|-----------|-------|-----------|
//! | SUPPLIER | PO  | supplier_purchase_orders | AR  | supplier_sales_invoices |
//! | CUSTOMER | QT  | customer_quotations | AP  | customer_purchase_invoices |
//! | MM       | PO  | purchase_requests | SO  | purchase_orders |
//! | SD       | QT  | internal_quotations | SO  | internal_orders |
//! | FCM      | AR  | company_receivables | AP  | company_payables |
//! | IM       | IN  | inbound_deliveries | OUT | outbound_deliveries |
//! | HRM      | ATT | attendance_records | LV  | leave_requests |
//! | PP       | QT  | quotations_to_production | MES | production_in_progress |
//! | DEFAULT  | AR  | company_receivables | AP  | company_payables |
//!
//! The MM row labels purchase requests as `PO` and purchase orders as `SO`.
//! That mapping is kept exactly as the legacy dashboard shipped it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::principal;
use super::source::SourceOperation;
use super::workflow::TabCode;

/// Role key of the fallback entry.
pub const DEFAULT_ROLE_KEY: &str = "DEFAULT";

/// One tab of a dispatch entry and the operation that fills it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabBinding {
    pub tab_code: TabCode,
    pub operation: SourceOperation,
}

impl TabBinding {
    pub const fn new(tab_code: TabCode, operation: SourceOperation) -> Self {
        Self { tab_code, operation }
    }
}

/// Bindings for one role key. Always exactly two, with distinct tab codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    role_key: String,
    bindings: [TabBinding; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchConfigError {
    #[error("Role key cannot be empty")]
    EmptyRoleKey,

    #[error("Role key '{role_key}' must be a single segment, roles resolve as '{leading}'")]
    CompoundRoleKey { role_key: String, leading: String },

    #[error("Role '{role_key}' binds tab {tab_code} twice")]
    DuplicateTabCode { role_key: String, tab_code: TabCode },

    #[error("Role '{role_key}' must bind exactly 2 tabs, found {found}")]
    WrongBindingCount { role_key: String, found: usize },
}

impl DispatchEntry {
    pub fn new(role_key: impl Into<String>, bindings: [TabBinding; 2]) -> Result<Self, DispatchConfigError> {
        let role_key: String = role_key.into();
        let role_key = role_key.trim().to_ascii_uppercase();
        if role_key.is_empty() {
            return Err(DispatchConfigError::EmptyRoleKey);
        }
        let leading = principal::role_key(&role_key);
        if leading != role_key {
            return Err(DispatchConfigError::CompoundRoleKey { role_key, leading });
        }
        if bindings[0].tab_code == bindings[1].tab_code {
            return Err(DispatchConfigError::DuplicateTabCode {
                role_key,
                tab_code: bindings[0].tab_code,
            });
        }
        Ok(Self { role_key, bindings })
    }

    /// Build from a slice of bindings, as read from configuration.
    pub fn from_bindings(role_key: impl Into<String>, bindings: &[TabBinding]) -> Result<Self, DispatchConfigError> {
        let role_key: String = role_key.into();
        match bindings {
            [first, second] => Self::new(role_key, [*first, *second]),
            _ => Err(DispatchConfigError::WrongBindingCount {
                role_key,
                found: bindings.len(),
            }),
        }
    }

    pub fn role_key(&self) -> &str {
        &self.role_key
    }

    pub fn bindings(&self) -> &[TabBinding; 2] {
        &self.bindings
    }

    pub fn tab_codes(&self) -> [TabCode; 2] {
        [self.bindings[0].tab_code, self.bindings[1].tab_code]
    }

    // Only used for the built-in table, whose rows are known to be valid.
    fn standard(role_key: &str, first: TabBinding, second: TabBinding) -> Self {
        Self {
            role_key: role_key.to_string(),
            bindings: [first, second],
        }
    }
}

/// Total, immutable mapping from role key to dispatch entry.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: HashMap<String, DispatchEntry>,
    default_entry: DispatchEntry,
}

impl DispatchTable {
    /// The dashboard's built-in role table.
    pub fn standard() -> Self {
        use SourceOperation as Op;
        use TabCode as Tab;

        let finance_pair = (
            TabBinding::new(Tab::Ar, Op::CompanyReceivables),
            TabBinding::new(Tab::Ap, Op::CompanyPayables),
        );

        let rows = [
            DispatchEntry::standard(
                "SUPPLIER",
                TabBinding::new(Tab::Po, Op::SupplierPurchaseOrders),
                TabBinding::new(Tab::Ar, Op::SupplierSalesInvoices),
            ),
            DispatchEntry::standard(
                "CUSTOMER",
                TabBinding::new(Tab::Qt, Op::CustomerQuotations),
                TabBinding::new(Tab::Ap, Op::CustomerPurchaseInvoices),
            ),
            DispatchEntry::standard(
                "MM",
                TabBinding::new(Tab::Po, Op::PurchaseRequests),
                TabBinding::new(Tab::So, Op::PurchaseOrders),
            ),
            DispatchEntry::standard(
                "SD",
                TabBinding::new(Tab::Qt, Op::InternalQuotations),
                TabBinding::new(Tab::So, Op::InternalOrders),
            ),
            DispatchEntry::standard("FCM", finance_pair.0, finance_pair.1),
            DispatchEntry::standard(
                "IM",
                TabBinding::new(Tab::In, Op::InboundDeliveries),
                TabBinding::new(Tab::Out, Op::OutboundDeliveries),
            ),
            DispatchEntry::standard(
                "HRM",
                TabBinding::new(Tab::Att, Op::AttendanceRecords),
                TabBinding::new(Tab::Lv, Op::LeaveRequests),
            ),
            DispatchEntry::standard(
                "PP",
                TabBinding::new(Tab::Qt, Op::QuotationsToProduction),
                TabBinding::new(Tab::Mes, Op::ProductionInProgress),
            ),
        ];

        Self {
            entries: rows
                .into_iter()
                .map(|entry| (entry.role_key.clone(), entry))
                .collect(),
            default_entry: DispatchEntry::standard(DEFAULT_ROLE_KEY, finance_pair.0, finance_pair.1),
        }
    }

    /// Add or replace entries. An entry keyed `DEFAULT` replaces the fallback.
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = DispatchEntry>) -> Self {
        for entry in overrides {
            if entry.role_key == DEFAULT_ROLE_KEY {
                self.default_entry = entry;
            } else {
                self.entries.insert(entry.role_key.clone(), entry);
            }
        }
        self
    }

    /// Entry for a role string. Only the leading segment is significant;
    /// unrecognized keys fall back to the default entry.
    pub fn resolve(&self, role: &str) -> &DispatchEntry {
        self.entries
            .get(&principal::role_key(role))
            .unwrap_or(&self.default_entry)
    }

    pub fn default_entry(&self) -> &DispatchEntry {
        &self.default_entry
    }

    /// Recognized role keys, sorted.
    pub fn role_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}
