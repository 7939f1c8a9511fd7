use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::models::WorkItemStore;

/// Loads and saves the work items YAML file.
///
/// The whole document is read and written at once. There is no locking, so
/// two processes writing the same file can lose each other's changes.
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    /// Creates a new Storage instance
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn exists(&self) -> bool {
        self.file_path.exists()
    }

    /// Loads the work items.
    ///
    /// A missing or blank file, or a document without `work_items`, yields an
    /// empty store. Malformed YAML is an error.
    pub fn load(&self) -> Result<WorkItemStore, StorageError> {
        if !self.exists() {
            log::debug!("{:?} does not exist, starting empty", self.file_path);
            return Ok(WorkItemStore::new());
        }

        let content = fs::read_to_string(&self.file_path).map_err(|source| StorageError::Read {
            path: self.file_path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(WorkItemStore::new());
        }

        let store: Option<WorkItemStore> =
            serde_yaml::from_str(&content).map_err(|e| StorageError::InvalidYaml {
                path: self.file_path.clone(),
                message: e.to_string(),
            })?;
        let store = store.unwrap_or_default();

        log::debug!(
            "Loaded {} work item(s) from {:?}",
            store.len(),
            self.file_path
        );
        Ok(store)
    }

    /// Writes the whole store, creating parent directories as needed
    pub fn save(&self, store: &WorkItemStore) -> Result<(), StorageError> {
        let write_err = |source: std::io::Error| StorageError::Write {
            path: self.file_path.clone(),
            source,
        };

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let yaml = serde_yaml::to_string(store)?;
        fs::write(&self.file_path, yaml).map_err(write_err)?;

        log::debug!("Saved {} work item(s) to {:?}", store.len(), self.file_path);
        Ok(())
    }

    /// Creates an empty work items file if none exists. Never overwrites.
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        if !self.exists() {
            log::info!("Creating work items file {:?}", self.file_path);
            self.save(&WorkItemStore::new())?;
        }
        Ok(())
    }

    /// Creates a new empty work items file, failing if one is already there
    pub fn init(&self) -> Result<(), StorageError> {
        if self.exists() {
            return Err(StorageError::AlreadyExists {
                path: self.file_path.clone(),
            });
        }
        self.save(&WorkItemStore::new())
    }
}
