//! Structural validation of a work item collection.
//!
//! Validation never fails on bad data: every problem found becomes a
//! [`Violation`] and the caller decides what to do with the report.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::models::{WorkItem, WorkItemStatus, WorkItemStore, WorkItemType};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub severity: Severity,
    pub message: String,
    /// Id of the offending item, absent when the item has no id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_item_id: Option<String>,
}

impl Violation {
    fn error(item_id: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            work_item_id: (!item_id.is_empty()).then(|| item_id.to_string()),
        }
    }
}

/// Result of validating a whole collection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

/// `^\d{5}$`
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 5 && id.bytes().all(|b| b.is_ascii_digit())
}

/// `^\d{4}-\d{2}-\d{2}$`, shape only
pub fn is_valid_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Checks one item, using `all_items` to resolve a story's parent feature.
/// Returns every violation found.
pub fn validate_item(item: &WorkItem, all_items: &[WorkItem]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let id = item.id.as_str();

    let required = [
        ("id", item.id.is_empty()),
        ("type", item.item_type.as_ref().map_or(true, WorkItemType::is_blank)),
        ("title", item.title.is_empty()),
        ("created_by", item.created_by.is_empty()),
        ("created_date", item.created_date.is_empty()),
        ("status", item.status.as_ref().map_or(true, WorkItemStatus::is_blank)),
    ];
    for (field, missing) in required {
        if missing {
            violations.push(Violation::error(
                id,
                format!("Work item missing required field: {}", field),
            ));
        }
    }

    if !id.is_empty() && !is_valid_id(id) {
        violations.push(Violation::error(
            id,
            format!("Invalid ID format: {}. Must be 5 digits (e.g., \"00001\")", id),
        ));
    }

    if let Some(status) = item.status.as_ref().filter(|s| !s.is_blank()) {
        if !status.is_known() {
            violations.push(Violation::error(
                id,
                format!(
                    "Invalid status: {}. Must be one of: {}",
                    status,
                    WorkItemStatus::ALLOWED
                ),
            ));
        }
    }

    if !item.created_date.is_empty() && !is_valid_date(&item.created_date) {
        violations.push(Violation::error(
            id,
            format!("Invalid date format: {}. Must be YYYY-MM-DD", item.created_date),
        ));
    }

    if let Some(updated) = item.updated_date.as_deref().filter(|d| !d.is_empty()) {
        if !is_valid_date(updated) {
            violations.push(Violation::error(
                id,
                format!("Invalid date format: {}. Must be YYYY-MM-DD", updated),
            ));
        }
    }

    if item.item_type == Some(WorkItemType::Story) {
        match item.parent_feature.as_deref().filter(|p| !p.is_empty()) {
            None => violations.push(Violation::error(id, "Story must have parent_feature field")),
            Some(parent) => {
                let resolves = all_items
                    .iter()
                    .any(|other| other.id == parent && other.is_feature());
                if !resolves {
                    violations.push(Violation::error(
                        id,
                        format!("Story references non-existent parent feature: {}", parent),
                    ));
                }
            }
        }
    }

    violations
}

/// Validates a whole collection: duplicate ids first, then each item in order
/// against the full collection.
pub fn validate_items(items: &[WorkItem]) -> ValidationReport {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        if !seen.insert(item.id.as_str()) {
            violations.push(Violation::error(
                &item.id,
                format!("duplicate ID found: {}", item.id),
            ));
        }
    }

    for item in items {
        violations.extend(validate_item(item, items));
    }

    ValidationReport {
        valid: violations.is_empty(),
        violations,
    }
}

impl WorkItemStore {
    pub fn validate(&self) -> ValidationReport {
        validate_items(&self.work_items)
    }
}
