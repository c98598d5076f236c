//! Terminal output and interactive confirmation
//!
//! The confirmation prompt uses `dialoguer` on a real terminal and
//! falls back to reading y/n lines from stdin on a pipe, so scripted
//! runs can drive it.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::Confirm;
use is_terminal::IsTerminal;

use crate::error::{BoardsyncError, BoardsyncResult};
use crate::sync::{Confirmation, SyncEvent};
use crate::watcher::WatchEvent;

/// Interactive per-entry deletion confirmation
pub struct PromptConfirm;

impl Confirmation for PromptConfirm {
    fn confirm_removal(&mut self, path: &Path) -> BoardsyncResult<bool> {
        let prompt = format!("remove {}?", path.display());
        if std::io::stdin().is_terminal() {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .map_err(|e| BoardsyncError::Io(std::io::Error::other(e.to_string())))
        } else {
            confirm_from_lines(&prompt, std::io::stdin().lock())
        }
    }
}

/// Ask for a project name when none was given on the command line.
pub fn ask_project_name() -> BoardsyncResult<String> {
    if std::io::stdin().is_terminal() {
        dialoguer::Input::<String>::new()
            .with_prompt("project name")
            .interact_text()
            .map_err(|e| BoardsyncError::Io(std::io::Error::other(e.to_string())))
    } else {
        print!("provide project name: ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// y/n loop over a line reader. EOF counts as a decline.
fn confirm_from_lines(prompt: &str, reader: impl BufRead) -> BoardsyncResult<bool> {
    print!("{prompt} [y/n]: ");
    std::io::stdout().flush()?;
    for line in reader.lines() {
        match line?.trim() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {
                print!("enter [y]es or [n]o: ");
                std::io::stdout().flush()?;
            }
        }
    }
    Ok(false)
}

/// Render one sync progress event for humans.
pub fn print_sync_event(event: &SyncEvent) {
    match event {
        SyncEvent::RemovingEntries { target, count } => {
            if *count > 0 {
                eprintln!("warning: removing {count} entries from {target}");
            }
        }
        SyncEvent::EntryRemoved { path } => println!("  removed {path}"),
        SyncEvent::ProjectCopied { files } => println!("copied {files} project files"),
        SyncEvent::BundleCacheReady { refreshed } => {
            if *refreshed {
                println!("downloaded bundle cache");
            }
        }
        SyncEvent::RequirementInstalled { name, path } => {
            println!("  installed {name} from {path}");
        }
        SyncEvent::NoRequirements => println!("no requirements declared"),
    }
}

/// Render one watch event for humans, timestamped.
pub fn print_watch_event(event: &WatchEvent) {
    let stamp = wall_clock();
    match event {
        WatchEvent::WatchStarted { project, target } => {
            println!("[{stamp}] watching {project} -> {target}");
        }
        WatchEvent::FileCopied { path } => println!("[{stamp}] copied {path}"),
        WatchEvent::Error { message } => eprintln!("[{stamp}] error: {message}"),
        WatchEvent::Shutdown => println!("[{stamp}] stopped"),
    }
}

fn wall_clock() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 86_400;
            format!(
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            )
        })
        .unwrap_or_else(|_| "00:00:00".to_string())
}
