// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Principal
//!
//! The authenticated caller as seen by the dashboard aggregator.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Carries the caller identity and derives its dispatch key

use serde::{Deserialize, Serialize};

/// Characters that terminate the leading segment of a role string.
pub const ROLE_DELIMITERS: [char; 3] = ['_', '.', '-'];

/// External user types that dispatch on the user type itself rather than the role.
const EXTERNAL_USER_TYPES: [&str; 2] = ["SUPPLIER", "CUSTOMER"];

/// Authenticated caller supplied by the transport boundary. Never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub role: String,
    /// `SUPPLIER`, `CUSTOMER` or an internal type; optional in tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
            user_type: None,
        }
    }

    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = Some(user_type.into());
        self
    }

    /// Key used to look up the dispatch table.
    ///
    /// Supplier and customer accounts are keyed by their user type; everyone
    /// else by the leading segment of their role.
    pub fn dispatch_key(&self) -> String {
        if let Some(user_type) = self.user_type.as_deref() {
            let user_type = user_type.trim().to_ascii_uppercase();
            if EXTERNAL_USER_TYPES.contains(&user_type.as_str()) {
                return user_type;
            }
        }
        role_key(&self.role)
    }
}

/// Leading segment of a role string, upper-cased.
///
/// `"HRM_MANAGER"`, `"hrm.admin"` and `"HRM"` all yield `"HRM"`.
pub fn role_key(role: &str) -> String {
    role.trim()
        .split(ROLE_DELIMITERS)
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}
