//! Requirements manifest parsing
//!
//! The manifest is a plain UTF-8 text file, one dependency name per
//! line. Blank lines and `#` comments are ignored. No version
//! constraints; order is preserved and duplicates are kept.

use std::fs;
use std::path::Path;

use crate::error::BoardsyncResult;

/// Read a requirements manifest and return the declared names.
pub fn read_manifest(path: &Path) -> BoardsyncResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse(&content))
}

fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
