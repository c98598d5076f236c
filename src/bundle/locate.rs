//! Requirement lookup against the bundle cache
//!
//! Search order policy: bundle directories are visited in sorted
//! (lexicographic byte-order) name order and the first match wins.
//! Directory enumeration order is platform-dependent, so the sort is
//! what makes resolution reproducible. No ambiguity detection is done
//! when several bundles provide the same name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BoardsyncError, BoardsyncResult};

/// A successful requirement lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequirement {
    /// The requested dependency name
    pub name: String,
    /// Package directory or single-file module under some bundle's `lib`
    pub source_path: PathBuf,
}

/// Search the cached bundles for a requirement.
///
/// Every bundle directory must contain a `lib` subdirectory; a bundle
/// without one means the cache is corrupt, which is fatal and distinct
/// from the requirement merely not being found.
pub fn locate_requirement(name: &str, cache_dir: &Path) -> BoardsyncResult<ResolvedRequirement> {
    for bundle_dir in bundle_dirs(cache_dir)? {
        let lib_dir = bundle_dir.join("lib");
        if !lib_dir.is_dir() {
            return Err(BoardsyncError::CacheCorrupt { path: bundle_dir });
        }

        let package_dir = lib_dir.join(name);
        if package_dir.is_dir() {
            return Ok(ResolvedRequirement {
                name: name.to_string(),
                source_path: package_dir,
            });
        }

        let module_file = lib_dir.join(format!("{name}.py"));
        if module_file.is_file() {
            return Ok(ResolvedRequirement {
                name: name.to_string(),
                source_path: module_file,
            });
        }
    }

    Err(BoardsyncError::RequirementNotFound {
        name: name.to_string(),
    })
}

/// Immediate subdirectories of the cache root, sorted by name.
///
/// Non-directories (the retained `.zip` archives) are skipped.
fn bundle_dirs(cache_dir: &Path) -> BoardsyncResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(cache_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
