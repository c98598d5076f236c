//! Bundle download and extraction
//!
//! `ensure_cache` is idempotent on directory presence: an existing
//! cache directory means every bundle is assumed extracted and no
//! network request is made. Deleting the directory is the only way to
//! force a refresh.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BoardsyncError, BoardsyncResult};

use super::BundleSource;

/// Timeout applied to every bundle download request
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Populate the bundle cache unless it already exists.
///
/// Returns `true` when the cache was freshly downloaded, `false` when
/// the directory was already present and nothing was done. Download or
/// extraction failures propagate unrecovered; a partially extracted
/// cache may remain on disk.
pub fn ensure_cache(cache_dir: &Path, sources: &[BundleSource]) -> BoardsyncResult<bool> {
    if cache_dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(cache_dir)?;

    for source in sources {
        let archive = download_archive(source, cache_dir)?;
        extract_zip(&archive, cache_dir)?;
    }
    Ok(true)
}

/// Download one bundle archive into the cache directory.
///
/// The response streams into a temp file in the cache directory, then
/// persists under the archive's basename. The zip is kept on disk next
/// to its extraction.
fn download_archive(source: &BundleSource, cache_dir: &Path) -> BoardsyncResult<PathBuf> {
    let network_err = |e: reqwest::Error| BoardsyncError::Network {
        name: source.name.clone(),
        url: source.url.clone(),
        source: e,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(network_err)?;

    let mut response = client
        .get(&source.url)
        .send()
        .map_err(network_err)?
        .error_for_status()
        .map_err(network_err)?;

    let mut temp = tempfile::NamedTempFile::new_in(cache_dir)?;
    let mut buffer = [0u8; 8192];
    loop {
        let n = response.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        temp.write_all(&buffer[..n])?;
    }
    temp.as_file().sync_all()?;

    let archive_path = cache_dir.join(archive_basename(&source.url));
    temp.persist(&archive_path).map_err(|e| e.error)?;
    Ok(archive_path)
}

/// Extract a zip archive's full contents into `dest_dir`.
pub(crate) fn extract_zip(archive_path: &Path, dest_dir: &Path) -> BoardsyncResult<()> {
    let archive_err = |message: String| BoardsyncError::Archive {
        path: archive_path.to_path_buf(),
        message,
    };

    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_err(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| archive_err(e.to_string()))?;
        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => continue,
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&outpath)?;
            io::copy(&mut entry, &mut outfile)?;
        }
    }
    Ok(())
}

/// Last path segment of a bundle URL, e.g. the `*.zip` release name.
fn archive_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
