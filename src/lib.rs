//! Boardsync - deploy and live-sync CircuitPython projects
//!
//! Boardsync replaces the contents of a mounted board volume with a
//! named project tree, resolves the project's declared dependencies
//! against locally cached bundle releases, and can keep the board up
//! to date by watching the project tree for changes.

pub mod bundle;
pub mod config;
pub mod error;
pub mod fsops;
pub mod manifest;
pub mod project;
pub mod sync;
pub mod ui;
pub mod watcher;

// Re-exports for convenience
pub use bundle::{default_registry, ensure_cache, locate_requirement, BundleSource, ResolvedRequirement};
pub use config::Config;
pub use error::{BoardsyncError, BoardsyncResult};
pub use project::Project;
pub use sync::{AutoConfirm, Confirmation, SyncEngine, SyncEvent, SyncReport};
pub use watcher::{watch, WatchEvent, WatchOptions};
