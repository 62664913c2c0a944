// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod dashboard;
pub mod payload;

// Re-export use cases for convenience
pub use dashboard::{DashboardError, DashboardWorkflowService, StandardDashboardWorkflowService};
pub use payload::items_or_empty;
