//! Configuration for Boardsync
//!
//! One `Config` is constructed per run and handed to every component.
//! Hierarchy, highest priority first:
//! 1. CLI flags
//! 2. Project config (`boardsync.toml` in the working directory)
//! 3. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bundle::{default_registry, BundleSource};
use crate::error::{BoardsyncError, BoardsyncResult};

/// Config file name looked up in the working directory
pub const CONFIG_FILENAME: &str = "boardsync.toml";

/// Name of the per-project dependency manifest
pub const MANIFEST_FILENAME: &str = "requirements.txt";

fn default_projects_dir() -> PathBuf {
    PathBuf::from("./projects")
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("/Volumes/CIRCUITPY")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./untracked_downloads")
}

fn default_delete_cap() -> usize {
    50
}

fn default_debounce_secs() -> u64 {
    5
}

/// Runtime configuration, deserializable from `boardsync.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the deployable projects
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,

    /// Mounted target volume files are deployed to
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    /// Directory bundles are downloaded and extracted into
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Maximum number of top-level target entries a full sync will delete
    #[serde(default = "default_delete_cap")]
    pub delete_cap: usize,

    /// Minimum seconds between accepted watch events
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,

    /// Bundle registry; when absent the built-in Adafruit releases are used
    #[serde(default = "default_registry")]
    pub bundles: Vec<BundleSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            target_dir: default_target_dir(),
            cache_dir: default_cache_dir(),
            delete_cap: default_delete_cap(),
            debounce_secs: default_debounce_secs(),
            bundles: default_registry(),
        }
    }
}

impl Config {
    /// Load config from a specific TOML file
    pub fn load(path: &Path) -> BoardsyncResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| BoardsyncError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `boardsync.toml` from `dir` when present, defaults otherwise.
    ///
    /// A present-but-invalid file is an error, not a silent fallback.
    pub fn load_or_default(dir: &Path) -> BoardsyncResult<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Debounce window as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }
}
