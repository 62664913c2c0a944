// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Source
//!
//! Domain Source capability: the single shape behind which every downstream
//! list endpoint is reached.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Port for downstream domain services (Anti-Corruption Layer)
//!
//! Implementations live in `infrastructure::http_source`. Each domain
//! (sales, finance, procurement, HR, inventory, production) is one
//! implementation; each list endpoint it exposes is a [`SourceOperation`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::workflow::WorkflowItem;

/// Downstream business domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Sales,
    Finance,
    Procurement,
    Hr,
    Inventory,
    Production,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Sales,
        Domain::Finance,
        Domain::Procurement,
        Domain::Hr,
        Domain::Inventory,
        Domain::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Sales => "sales",
            Domain::Finance => "finance",
            Domain::Procurement => "procurement",
            Domain::Hr => "hr",
            Domain::Inventory => "inventory",
            Domain::Production => "production",
        }
    }

    /// Upstream service that hosts this domain unless configured otherwise.
    pub fn default_service(&self) -> &'static str {
        match self {
            Domain::Sales | Domain::Finance | Domain::Hr => "business",
            Domain::Procurement | Domain::Inventory | Domain::Production => "scm",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named list-fetch operation of a domain, bound to `(user_id, limit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOperation {
    SupplierPurchaseOrders,
    SupplierSalesInvoices,
    CustomerQuotations,
    CustomerPurchaseInvoices,
    PurchaseRequests,
    PurchaseOrders,
    InternalQuotations,
    InternalOrders,
    CompanyReceivables,
    CompanyPayables,
    InboundDeliveries,
    OutboundDeliveries,
    AttendanceRecords,
    LeaveRequests,
    QuotationsToProduction,
    ProductionInProgress,
}

impl SourceOperation {
    pub const ALL: [SourceOperation; 16] = [
        SourceOperation::SupplierPurchaseOrders,
        SourceOperation::SupplierSalesInvoices,
        SourceOperation::CustomerQuotations,
        SourceOperation::CustomerPurchaseInvoices,
        SourceOperation::PurchaseRequests,
        SourceOperation::PurchaseOrders,
        SourceOperation::InternalQuotations,
        SourceOperation::InternalOrders,
        SourceOperation::CompanyReceivables,
        SourceOperation::CompanyPayables,
        SourceOperation::InboundDeliveries,
        SourceOperation::OutboundDeliveries,
        SourceOperation::AttendanceRecords,
        SourceOperation::LeaveRequests,
        SourceOperation::QuotationsToProduction,
        SourceOperation::ProductionInProgress,
    ];

    /// Domain that owns the operation.
    pub fn domain(&self) -> Domain {
        use SourceOperation::*;
        match self {
            CustomerQuotations | InternalQuotations | InternalOrders => Domain::Sales,
            SupplierSalesInvoices | CustomerPurchaseInvoices | CompanyReceivables
            | CompanyPayables => Domain::Finance,
            SupplierPurchaseOrders | PurchaseRequests | PurchaseOrders => Domain::Procurement,
            AttendanceRecords | LeaveRequests => Domain::Hr,
            InboundDeliveries | OutboundDeliveries => Domain::Inventory,
            QuotationsToProduction | ProductionInProgress => Domain::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use SourceOperation::*;
        match self {
            SupplierPurchaseOrders => "supplier_purchase_orders",
            SupplierSalesInvoices => "supplier_sales_invoices",
            CustomerQuotations => "customer_quotations",
            CustomerPurchaseInvoices => "customer_purchase_invoices",
            PurchaseRequests => "purchase_requests",
            PurchaseOrders => "purchase_orders",
            InternalQuotations => "internal_quotations",
            InternalOrders => "internal_orders",
            CompanyReceivables => "company_receivables",
            CompanyPayables => "company_payables",
            InboundDeliveries => "inbound_deliveries",
            OutboundDeliveries => "outbound_deliveries",
            AttendanceRecords => "attendance_records",
            LeaveRequests => "leave_requests",
            QuotationsToProduction => "quotations_to_production",
            ProductionInProgress => "production_in_progress",
        }
    }

    /// Downstream path, relative to the owning service's base URL.
    pub fn path(&self) -> &'static str {
        use SourceOperation::*;
        match self {
            SupplierPurchaseOrders => "/scm-pp/dashboard/purchase-orders/supplier",
            SupplierSalesInvoices => "/fcm/invoice/ap/supplier",
            CustomerQuotations => "/sd/dashboard/quotation/customer",
            CustomerPurchaseInvoices => "/fcm/invoice/ar/supplier",
            PurchaseRequests => "/scm-pp/dashboard/purchase-requests",
            PurchaseOrders => "/scm-pp/dashboard/purchase-orders",
            InternalQuotations => "/sd/dashboard/quotation/mm",
            InternalOrders => "/sd/dashboard/orders/mm",
            CompanyReceivables => "/fcm/dashboard/ar/company",
            CompanyPayables => "/fcm/dashboard/ap/company",
            InboundDeliveries => "/scm-pp/dashboard/inbound",
            OutboundDeliveries => "/scm-pp/dashboard/outbound",
            AttendanceRecords => "/hrm/dashboard/attendance",
            LeaveRequests => "/hrm/dashboard/leave-requests",
            QuotationsToProduction => "/scm-pp/dashboard/quotations-to-production",
            ProductionInProgress => "/scm-pp/dashboard/production-in-progress",
        }
    }

    /// Whether the downstream call is filtered by the caller's user id.
    ///
    /// The internal sales lists are company-wide and only take a size.
    pub fn is_user_scoped(&self) -> bool {
        !matches!(
            self,
            SourceOperation::InternalQuotations | SourceOperation::InternalOrders
        )
    }
}

impl fmt::Display for SourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown source operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for SourceOperation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        SourceOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == needle)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Success/data wrapper used by every downstream service and by the gateway's own replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T, message: impl Into<String>, status: u16) -> Self {
        Self {
            status: Some(status),
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }

    pub fn fail(message: impl Into<String>, status: u16, errors: Option<serde_json::Value>) -> Self {
        Self {
            status: Some(status),
            success: false,
            message: Some(message.into()),
            data: None,
            errors,
        }
    }
}

/// Items envelope as returned by a list endpoint.
pub type ItemsEnvelope = ApiEnvelope<Vec<WorkflowItem>>;

/// Uniform result of every domain source call. `Ok(None)` is an absent body.
pub type SourceResult = Result<Option<ItemsEnvelope>, SourceError>;

/// Why a single downstream call produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Downstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed downstream payload: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No source configured for domain '{0}'")]
    Unavailable(Domain),
}

impl SourceError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Network(_) => "network",
            SourceError::Timeout(_) => "timeout",
            SourceError::Status { .. } => "status",
            SourceError::Decode(_) => "decode",
            SourceError::InvalidInput(_) => "invalid_input",
            SourceError::Unavailable(_) => "unavailable",
        }
    }
}

/// Capability exposed by each downstream domain service.
#[async_trait]
pub trait DomainSource: Send + Sync {
    /// Domain served by this source.
    fn domain(&self) -> Domain;

    /// Fetch up to `limit` items for `operation` on behalf of `user_id`.
    ///
    /// Implementations must return a `SourceError` rather than panic on any
    /// transport, status or decoding failure. A `limit` of zero yields an
    /// empty success.
    async fn fetch(&self, operation: SourceOperation, user_id: &str, limit: u32) -> SourceResult;
}
