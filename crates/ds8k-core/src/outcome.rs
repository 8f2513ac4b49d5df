// ── Reconciliation results ──
//
// Managers return `Outcome<T>` values instead of mutating shared
// changed/failed flags; callers compose them and render a `Report`.

use std::fmt;

use ds8k_api::models::BatchItem;
use serde::Serialize;
use tracing::warn;

use crate::error::CoreError;

/// Result of one reconciliation: whether anything changed (or would have,
/// in check mode) plus the representations worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub changed: bool,
    pub facts: Vec<T>,
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<T> Outcome<T> {
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            facts: Vec::new(),
        }
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            facts: Vec::new(),
        }
    }

    /// Unchanged result carrying facts (info collectors).
    pub fn facts(facts: Vec<T>) -> Self {
        Self {
            changed: false,
            facts,
        }
    }

    pub fn with_fact(mut self, fact: T) -> Self {
        self.facts.push(fact);
        self
    }

    /// Fold another outcome into this one.
    pub fn absorb(&mut self, other: Self) {
        self.changed |= other.changed;
        self.facts.extend(other.facts);
    }
}

// ── Batch interpretation ────────────────────────────────────────────

/// Per-item result line of a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMessage {
    /// 1-based position of the item in the request.
    pub index: usize,
    /// The requested locator at that position, or `unknown`.
    pub locator: String,
    pub message: String,
}

impl fmt::Display for ItemMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.locator, self.message)
    }
}

/// Inspect a batch response item by item.
///
/// Item `i` maps back to `locators[i]`. Only failed items are reported;
/// if any failed the whole batch is an error, otherwise the created
/// representations are returned.
pub fn interpret_batch<T>(
    locators: &[String],
    items: Vec<BatchItem<T>>,
) -> Result<Vec<T>, CoreError> {
    let mut failures = Vec::new();
    let mut created = Vec::new();

    for (i, item) in items.into_iter().enumerate() {
        if let Some(status) = item.failure() {
            let index = i + 1;
            let locator = locators
                .get(i)
                .cloned()
                .unwrap_or_else(|| "unknown".into());
            warn!(index, %locator, code = %status.code, "batch item failed");
            failures.push(ItemMessage {
                index,
                locator,
                message: format!("Failed. ERR: {} {}", status.code, status.message),
            });
        } else if let Some(obj) = item.into_object() {
            created.push(obj);
        }
    }

    if failures.is_empty() {
        Ok(created)
    } else {
        Err(CoreError::BatchFailed { items: failures })
    }
}

// ── Rendered report ─────────────────────────────────────────────────

/// Final `{changed, failed, msg, items, facts}` document handed to the
/// caller of a manager or collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub changed: bool,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemMessage>,
    pub facts: Vec<serde_json::Value>,
}

impl Report {
    pub fn from_outcome<T: Serialize>(outcome: &Outcome<T>) -> Result<Self, CoreError> {
        let facts = outcome
            .facts
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Internal(format!("failed to encode facts: {e}")))?;
        Ok(Self {
            changed: outcome.changed,
            failed: false,
            msg: None,
            items: Vec::new(),
            facts,
        })
    }

    pub fn from_error(err: &CoreError) -> Self {
        let items = match err {
            CoreError::BatchFailed { items } => items.clone(),
            _ => Vec::new(),
        };
        Self {
            changed: false,
            failed: true,
            msg: Some(err.to_string()),
            items,
            facts: Vec::new(),
        }
    }

    pub fn from_result<T: Serialize>(result: &Result<Outcome<T>, CoreError>) -> Self {
        match result {
            Ok(outcome) => Self::from_outcome(outcome).unwrap_or_else(|e| Self::from_error(&e)),
            Err(err) => Self::from_error(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ds8k_api::models::ServerStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    fn failed(code: &str, message: &str) -> BatchItem<String> {
        BatchItem::Status(ServerStatus {
            status: "failed".into(),
            code: code.into(),
            message: message.into(),
        })
    }

    #[test]
    fn only_failed_items_are_reported() {
        let locators = vec!["1000".to_owned(), "1001".to_owned(), "1002".to_owned()];
        let items = vec![
            BatchItem::Object("1000".to_owned()),
            failed("BE586005", "volume exists"),
            BatchItem::Object("1002".to_owned()),
        ];

        let err = interpret_batch(&locators, items).unwrap_err();
        let CoreError::BatchFailed { items } = err else {
            panic!("expected BatchFailed");
        };
        assert_eq!(
            items,
            vec![ItemMessage {
                index: 2,
                locator: "1001".into(),
                message: "Failed. ERR: BE586005 volume exists".into(),
            }]
        );
    }

    #[test]
    fn all_succeeded_returns_objects() {
        let items = vec![BatchItem::Object(1), BatchItem::Object(2)];
        assert_eq!(interpret_batch(&[], items).unwrap(), vec![1, 2]);
    }

    #[test]
    fn missing_locator_is_unknown() {
        let err = interpret_batch::<String>(&[], vec![failed("X", "boom")]).unwrap_err();
        assert!(err.to_string().contains("unknown: Failed. ERR: X boom"));
    }

    #[test]
    fn absorb_accumulates() {
        let mut total = Outcome::<u8>::unchanged();
        total.absorb(Outcome::unchanged().with_fact(1));
        assert!(!total.changed);
        total.absorb(Outcome::changed().with_fact(2));
        assert!(total.changed);
        assert_eq!(total.facts, vec![1, 2]);
    }

    #[test]
    fn report_from_batch_error_keeps_items() {
        let result: Result<Outcome<u8>, CoreError> = Err(CoreError::BatchFailed {
            items: vec![ItemMessage {
                index: 2,
                locator: "1002".into(),
                message: "Failed. ERR: A B".into(),
            }],
        });
        let report = Report::from_result(&result);
        assert!(report.failed);
        assert!(!report.changed);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].index, 2);
    }
}
