use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by work item creation and mutation.
///
/// These fail fast on the first problem, unlike validation which collects
/// every violation into a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Parent feature {0} does not exist")]
    ParentNotFound(String),

    #[error("Parent {0} is not a feature")]
    ParentNotFeature(String),

    #[error("Work item {0} does not exist")]
    ItemNotFound(String),

    #[error("Invalid {field} \"{value}\". Must be one of: {allowed}")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

impl TrackerError {
    pub(crate) fn invalid_value(field: &'static str, value: &str, allowed: &'static str) -> Self {
        TrackerError::InvalidValue {
            field,
            value: value.to_string(),
            allowed,
        }
    }
}

/// Errors from reading or writing the work items file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid YAML in {}: {message}", path.display())]
    InvalidYaml { path: PathBuf, message: String },

    #[error("File {} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Failed to write work items to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize work items: {0}")]
    Serialize(#[from] serde_yaml::Error),
}
