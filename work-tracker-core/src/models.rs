use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// The kind of a work item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemType {
    Feature,
    Story,
    /// Any other value found in the file, kept verbatim for validation
    #[serde(untagged)]
    Unknown(String),
}

impl WorkItemType {
    pub const ALLOWED: &'static str = "feature, story";

    pub fn as_str(&self) -> &str {
        match self {
            WorkItemType::Feature => "feature",
            WorkItemType::Story => "story",
            WorkItemType::Unknown(s) => s,
        }
    }

    /// An empty value in the file counts as no type at all
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkItemType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feature" => Ok(WorkItemType::Feature),
            "story" => Ok(WorkItemType::Story),
            _ => Err(TrackerError::invalid_value("type", s, Self::ALLOWED)),
        }
    }
}

/// Workflow status of a work item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WorkItemStatus {
    Todo,
    InProgress,
    Done,
    Blocked,
    #[serde(untagged)]
    Unknown(String),
}

impl WorkItemStatus {
    pub const ALLOWED: &'static str = "todo, in-progress, done, blocked";

    pub fn as_str(&self) -> &str {
        match self {
            WorkItemStatus::Todo => "todo",
            WorkItemStatus::InProgress => "in-progress",
            WorkItemStatus::Done => "done",
            WorkItemStatus::Blocked => "blocked",
            WorkItemStatus::Unknown(s) => s,
        }
    }

    /// Returns true for the four statuses the tracker knows about
    pub fn is_known(&self) -> bool {
        !matches!(self, WorkItemStatus::Unknown(_))
    }

    /// An empty value in the file counts as no status at all
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkItemStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(WorkItemStatus::Todo),
            "in-progress" | "in_progress" => Ok(WorkItemStatus::InProgress),
            "done" => Ok(WorkItemStatus::Done),
            "blocked" => Ok(WorkItemStatus::Blocked),
            _ => Err(TrackerError::invalid_value("status", s, Self::ALLOWED)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALLOWED: &'static str = "low, medium, high";
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(TrackerError::invalid_value("priority", s, Self::ALLOWED)),
        }
    }
}

/// T-shirt size estimate for a story
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Estimate {
    S,
    M,
    L,
    XL,
}

impl Estimate {
    pub const ALLOWED: &'static str = "S, M, L, XL";
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::S => write!(f, "S"),
            Estimate::M => write!(f, "M"),
            Estimate::L => write!(f, "L"),
            Estimate::XL => write!(f, "XL"),
        }
    }
}

impl FromStr for Estimate {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "S" => Ok(Estimate::S),
            "M" => Ok(Estimate::M),
            "L" => Ok(Estimate::L),
            "XL" => Ok(Estimate::XL),
            _ => Err(TrackerError::invalid_value("estimate", s, Self::ALLOWED)),
        }
    }
}

/// A single feature or story record as it is stored in the work items file.
///
/// Required text fields default to an empty string when they are missing from
/// the file, and `type`/`status` are optional, so that a hand-edited file still
/// loads and the validator can report what is wrong with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkItem {
    /// 5-digit zero-padded identifier (e.g. "00001")
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<WorkItemType>,

    #[serde(default)]
    pub title: String,

    /// Path to a markdown file with the long description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_file: Option<String>,

    /// Role that created the item
    #[serde(default)]
    pub created_by: String,

    /// YYYY-MM-DD
    #[serde(default)]
    pub created_date: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkItemStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    // Story fields
    /// Id of the owning feature (stories only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_feature: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Estimate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<Vec<String>>,

    /// YYYY-MM-DD, refreshed on every update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
}

impl WorkItem {
    pub fn is_feature(&self) -> bool {
        self.item_type == Some(WorkItemType::Feature)
    }

    pub fn is_story(&self) -> bool {
        self.item_type == Some(WorkItemType::Story)
    }
}

/// The whole work items document: `{ work_items: [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkItemStore {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub work_items: Vec<WorkItem>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<WorkItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<WorkItem>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorkItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.work_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.work_items.is_empty()
    }
}

/// Input for creating a feature
#[derive(Debug, Clone, Default)]
pub struct NewFeature {
    pub title: String,
    pub created_by: String,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub description_file: Option<String>,
}

/// Input for creating a story under an existing feature
#[derive(Debug, Clone, Default)]
pub struct NewStory {
    pub title: String,
    pub parent_feature: String,
    pub created_by: String,
    pub estimate: Option<Estimate>,
    pub acceptance_criteria: Option<Vec<String>>,
    pub description_file: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

/// Partial update for an existing work item.
///
/// Only the mutable attributes are present: `id`, `type`, `created_by` and
/// `created_date` cannot be changed through an update. Every `Some` field
/// overwrites the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemUpdate {
    pub title: Option<String>,
    pub status: Option<WorkItemStatus>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub description_file: Option<String>,
    pub parent_feature: Option<String>,
    pub assigned_to: Option<String>,
    pub estimate: Option<Estimate>,
    pub acceptance_criteria: Option<Vec<String>>,
}

impl WorkItemUpdate {
    pub fn assign(role: impl Into<String>) -> Self {
        Self {
            assigned_to: Some(role.into()),
            ..Default::default()
        }
    }

    pub fn status(status: WorkItemStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Overwrites the fields of `item` that are set in this update
    pub fn apply_to(self, item: &mut WorkItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(status) = self.status {
            item.status = Some(status);
        }
        if let Some(priority) = self.priority {
            item.priority = Some(priority);
        }
        if let Some(tags) = self.tags {
            item.tags = Some(tags);
        }
        if let Some(description_file) = self.description_file {
            item.description_file = Some(description_file);
        }
        if let Some(parent_feature) = self.parent_feature {
            item.parent_feature = Some(parent_feature);
        }
        if let Some(assigned_to) = self.assigned_to {
            item.assigned_to = Some(assigned_to);
        }
        if let Some(estimate) = self.estimate {
            item.estimate = Some(estimate);
        }
        if let Some(acceptance_criteria) = self.acceptance_criteria {
            item.acceptance_criteria = Some(acceptance_criteria);
        }
    }
}

/// Filters for listing work items; unset filters match everything
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub item_type: Option<WorkItemType>,
    pub status: Option<WorkItemStatus>,
    pub assigned_to: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &WorkItem) -> bool {
        if let Some(t) = &self.item_type {
            if item.item_type.as_ref() != Some(t) {
                return false;
            }
        }
        if let Some(s) = &self.status {
            if item.status.as_ref() != Some(s) {
                return false;
            }
        }
        if let Some(role) = &self.assigned_to {
            if item.assigned_to.as_deref() != Some(role.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Today's local date as YYYY-MM-DD
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
