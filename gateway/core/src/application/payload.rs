// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::source::SourceResult;
use crate::domain::workflow::WorkflowItem;

/// Collapse a source result into a never-null item list.
///
/// An error, an absent envelope and an absent `data` all become an empty
/// list. The `success` flag is not consulted.
pub fn items_or_empty(result: SourceResult) -> Vec<WorkflowItem> {
    match result {
        Ok(Some(envelope)) => envelope.data.unwrap_or_default(),
        Ok(None) | Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source::{ApiEnvelope, ItemsEnvelope, SourceError};

    fn item(id: &str) -> WorkflowItem {
        WorkflowItem {
            item_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_error_yields_empty() {
        let result: SourceResult = Err(SourceError::Timeout("10s".to_string()));
        assert!(items_or_empty(result).is_empty());
    }

    #[test]
    fn test_absent_envelope_yields_empty() {
        assert!(items_or_empty(Ok(None)).is_empty());
    }

    #[test]
    fn test_absent_data_yields_empty() {
        let envelope: ItemsEnvelope = ApiEnvelope::fail("nothing", 200, None);
        assert!(items_or_empty(Ok(Some(envelope))).is_empty());
    }

    #[test]
    fn test_payload_passes_through_in_order() {
        let envelope = ApiEnvelope::success(vec![item("a"), item("b")], "ok", 200);
        let items = items_or_empty(Ok(Some(envelope)));
        assert_eq!(items, vec![item("a"), item("b")]);
    }

    #[test]
    fn test_success_flag_is_ignored() {
        let mut envelope = ApiEnvelope::success(vec![item("x")], "partial", 200);
        envelope.success = false;
        assert_eq!(items_or_empty(Ok(Some(envelope))).len(), 1);
    }
}
