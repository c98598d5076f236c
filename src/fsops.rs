//! Filesystem helpers
//!
//! Recursive copies preserve file permissions (via `fs::copy`) and
//! modification times, matching what `cp -rp` would do on the target
//! volume. Conflicting destination files are overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BoardsyncResult;

/// Copy the *contents* of `src_dir` into `dst_dir`.
///
/// `dst_dir` must already exist. Directories are created as needed.
pub fn copy_tree(src_dir: &Path, dst_dir: &Path) -> BoardsyncResult<Vec<PathBuf>> {
    let mut copied = Vec::new();
    for entry in WalkDir::new(src_dir).min_depth(1).follow_links(false) {
        let entry = entry.map_err(io_from_walkdir)?;
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .expect("walkdir yields paths under its root");
        let dst = dst_dir.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst)?;
        } else {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            copy_file(entry.path(), &dst)?;
            copied.push(dst);
        }
    }
    Ok(copied)
}

/// Copy a file or directory *into* `dst_dir` under its own name.
pub fn copy_into(source: &Path, dst_dir: &Path) -> BoardsyncResult<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| std::io::Error::other(format!("no file name in {}", source.display())))?;
    let dst = dst_dir.join(name);

    if source.is_dir() {
        fs::create_dir_all(&dst)?;
        copy_tree(source, &dst)?;
    } else {
        copy_file(source, &dst)?;
    }
    Ok(dst)
}

fn copy_file(src: &Path, dst: &Path) -> BoardsyncResult<()> {
    fs::copy(src, dst)?;
    if let Ok(mtime) = fs::metadata(src).and_then(|m| m.modified()) {
        let file = fs::File::options().write(true).open(dst)?;
        file.set_modified(mtime)?;
    }
    Ok(())
}

/// Top-level entries of `dir`, dotfiles excluded, sorted by name.
pub fn top_level_entries(dir: &Path) -> BoardsyncResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Remove a file or directory tree.
pub fn remove_entry(path: &Path) -> BoardsyncResult<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn io_from_walkdir(e: walkdir::Error) -> std::io::Error {
    e.into_io_error()
        .unwrap_or_else(|| std::io::Error::other("walkdir loop"))
}
