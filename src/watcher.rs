//! Continuous incremental sync daemon
//!
//! Watches the project tree via `notify` and copies changed files onto
//! the target volume. Event delivery happens on the notification
//! subsystem's own thread; paths cross an mpsc channel into a single
//! consumer loop that exclusively owns the debounce timestamp and
//! content-hash state, so no shared mutable state is touched from two
//! threads.
//!
//! Changed files land flat in the target root, not under their
//! relative subdirectory - the behavior the deploy workflow expects
//! for single-directory CircuitPython projects.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};

use crate::error::{BoardsyncError, BoardsyncResult};
use crate::fsops;

/// Capacity of the channel between notify's thread and the consumer
const EVENT_CHANNEL_BOUND: usize = 1024;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Project tree to watch recursively
    pub project_root: PathBuf,
    /// Mounted target volume changed files are copied to
    pub target_dir: PathBuf,
    /// Minimum elapsed time between accepted change events
    pub debounce: Duration,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted { project: String, target: String },
    /// A changed file was copied to the target
    FileCopied { path: String },
    /// Error occurred
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Render as one NDJSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Consumer-side acceptance state: debounce timestamp plus per-file
/// content hashes used to drop editor auto-save noise.
struct WatchState {
    window: Duration,
    last_accepted: Option<Instant>,
    content_hashes: HashMap<PathBuf, String>,
}

impl WatchState {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
            content_hashes: HashMap::new(),
        }
    }

    /// Decide on one delivered path and copy it if accepted.
    ///
    /// Returns the destination path when a copy happened. Directory
    /// paths, paths that no longer exist, events inside the debounce
    /// window and unchanged file content are all discarded.
    fn process(&mut self, path: &Path, target_dir: &Path) -> BoardsyncResult<Option<PathBuf>> {
        if !path.is_file() {
            return Ok(None);
        }

        if let Some(last) = self.last_accepted {
            if last.elapsed() < self.window {
                return Ok(None);
            }
        }

        let Ok(content) = std::fs::read(path) else {
            // File vanished between the event and the read.
            return Ok(None);
        };
        let hash = format!("{:x}", Sha256::digest(&content));
        if self.content_hashes.get(path) == Some(&hash) {
            return Ok(None);
        }

        let dst = fsops::copy_into(path, target_dir)?;
        self.content_hashes.insert(path.to_path_buf(), hash);
        self.last_accepted = Some(Instant::now());
        Ok(Some(dst))
    }
}

/// Start watching (blocking).
///
/// Blocks until the running flag is cleared, then drops the notify
/// subscription and emits a shutdown event.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    on_event: impl Fn(WatchEvent),
) -> BoardsyncResult<()> {
    if !options.target_dir.is_dir() {
        return Err(BoardsyncError::TargetNotMounted {
            path: options.target_dir.clone(),
        });
    }

    on_event(WatchEvent::WatchStarted {
        project: options.project_root.display().to_string(),
        target: options.target_dir.display().to_string(),
    });

    let (tx, rx) = sync_channel::<PathBuf>(EVENT_CHANNEL_BOUND);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    // A full channel means the consumer is far behind;
                    // dropping is safer than blocking notify's thread.
                    let _ = tx.try_send(path);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| BoardsyncError::Io(std::io::Error::other(e.to_string())))?;

    watcher
        .watch(&options.project_root, RecursiveMode::Recursive)
        .map_err(|e| BoardsyncError::Io(std::io::Error::other(e.to_string())))?;

    let mut state = WatchState::new(options.debounce);

    while running.load(Ordering::SeqCst) {
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            match state.process(&path, &options.target_dir) {
                Ok(Some(dst)) => on_event(WatchEvent::FileCopied {
                    path: dst.display().to_string(),
                }),
                Ok(None) => {}
                Err(e) => {
                    on_event(WatchEvent::Error {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            }
        }
    }

    on_event(WatchEvent::Shutdown);
    Ok(())
}
