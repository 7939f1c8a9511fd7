use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Work items file used when nothing else is configured
pub const DEFAULT_WORK_ITEMS_FILE: &str = "docs/work/work-items.yaml";

/// Environment variable that overrides the work items file
pub const WORK_ITEMS_FILE_ENV: &str = "WORK_TRACKER_FILE";

/// User-level settings read from `<config dir>/work-tracker/config.yaml`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Work items file to use when `--file` and the environment are unset
    pub default_file: Option<PathBuf>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Loads the user config, or the default one if the file is not there
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Returns the path to the user config file
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("work-tracker").join("config.yaml"))
}

/// Determines the work items file to use.
///
/// Priority: the `--file` option, then `WORK_TRACKER_FILE`, then
/// `default_file` from the user config, then `docs/work/work-items.yaml`.
pub fn determine_work_items_path(file_option: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = file_option {
        return Ok(path.to_path_buf());
    }

    let env_file = env::var_os(WORK_ITEMS_FILE_ENV).map(PathBuf::from);
    let config = match get_config_path() {
        Some(path) => Config::load_or_default(path)?,
        None => Config::default(),
    };
    Ok(resolve_work_items_path(env_file, &config))
}

fn resolve_work_items_path(env_file: Option<PathBuf>, config: &Config) -> PathBuf {
    if let Some(path) = env_file.filter(|p| !p.as_os_str().is_empty()) {
        log::debug!("Using work items file from {}", WORK_ITEMS_FILE_ENV);
        return path;
    }

    if let Some(path) = &config.default_file {
        log::debug!("Using work items file from user config");
        return path.clone();
    }

    PathBuf::from(DEFAULT_WORK_ITEMS_FILE)
}
