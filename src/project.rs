//! Project resolution
//!
//! A project is nothing more than a directory under the projects root;
//! its name is its identity. Resolution happens at the start of every
//! run and has no side effects.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BoardsyncError, BoardsyncResult};

/// A resolved project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Directory name under the projects root
    pub name: String,
    /// Absolute or caller-relative path to the project tree
    pub root: PathBuf,
}

/// Resolve a named project against the projects root.
///
/// Fails with [`BoardsyncError::ProjectNotFound`] listing every valid
/// project name when the joined path is not a directory.
pub fn resolve(projects_dir: &Path, name: &str) -> BoardsyncResult<Project> {
    let root = projects_dir.join(name);
    if !root.is_dir() {
        return Err(BoardsyncError::ProjectNotFound {
            name: name.to_string(),
            path: root,
            available: list(projects_dir)?,
        });
    }
    Ok(Project {
        name: name.to_string(),
        root,
    })
}

/// List valid project names (immediate subdirectories), sorted.
pub fn list(projects_dir: &Path) -> BoardsyncResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(projects_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
