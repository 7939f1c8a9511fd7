pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::{
    determine_work_items_path, get_config_path, Config, DEFAULT_WORK_ITEMS_FILE,
    WORK_ITEMS_FILE_ENV,
};
pub use error::{StorageError, TrackerError};
pub use identity::ID_WIDTH;
pub use models::{
    today, Estimate, ItemFilter, NewFeature, NewStory, Priority, WorkItem, WorkItemStatus,
    WorkItemStore, WorkItemType, WorkItemUpdate,
};
pub use storage::Storage;
pub use validation::{
    is_valid_date, is_valid_id, validate_item, validate_items, Severity, ValidationReport,
    Violation,
};
