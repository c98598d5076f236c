//! Boardsync CLI - deploy and live-sync CircuitPython projects
//!
//! Usage: boardsync <COMMAND>
//!
//! Commands:
//!   deploy    Replace the board's contents with a project and its requirements
//!   watch     Copy changed project files to the board continuously
//!   projects  List deployable projects
//!
//! Exit codes: 0 success, 1 user declined a deletion, 2 any other error.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use boardsync::sync::{AutoConfirm, SyncEngine, SyncEvent};
use boardsync::ui::{self, PromptConfirm};
use boardsync::watcher::{watch, WatchOptions};
use boardsync::{project, BoardsyncError, Config, Project};

use cli::{Cli, Commands};

mod cli;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let result = match cli.command {
        Commands::Deploy {
            project,
            yes,
            output,
            projects_dir,
            cache_dir,
        } => cmd_deploy(project, yes, output, projects_dir, cache_dir, json),
        Commands::Watch {
            project,
            output,
            projects_dir,
            debounce,
        } => cmd_watch(project, output, projects_dir, debounce, json),
        Commands::Projects { projects_dir } => cmd_projects(projects_dir, json),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        let code = err
            .downcast_ref::<BoardsyncError>()
            .map(BoardsyncError::exit_code)
            .unwrap_or(2);
        std::process::exit(code);
    }
}

/// Config file + defaults, overridden by CLI flags.
fn load_config(
    output: Option<PathBuf>,
    projects_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    debounce: Option<u64>,
) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let mut config = Config::load_or_default(&cwd)?;
    if let Some(dir) = output {
        config.target_dir = dir;
    }
    if let Some(dir) = projects_dir {
        config.projects_dir = dir;
    }
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }
    if let Some(secs) = debounce {
        config.debounce_secs = secs;
    }
    Ok(config)
}

fn resolve_project(config: &Config, name: Option<String>) -> Result<Project> {
    let name = match name {
        Some(name) => name,
        None => ui::ask_project_name()?,
    };
    Ok(project::resolve(&config.projects_dir, &name)?)
}

fn cmd_deploy(
    name: Option<String>,
    yes: bool,
    output: Option<PathBuf>,
    projects_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(output, projects_dir, cache_dir, None)?;
    let project = resolve_project(&config, name)?;

    let emit = |event: SyncEvent| {
        if json {
            println!("{}", event.to_json());
        } else {
            ui::print_sync_event(&event);
        }
    };

    let report = if yes {
        SyncEngine::new(&config, AutoConfirm).run(&project, emit)?
    } else {
        SyncEngine::new(&config, PromptConfirm).run(&project, emit)?
    };

    if !json {
        println!(
            "deployed {} to {} ({} files, {} requirements)",
            project.name,
            config.target_dir.display(),
            report.copied.len(),
            report.requirements.len()
        );
    }
    Ok(())
}

fn cmd_watch(
    name: Option<String>,
    output: Option<PathBuf>,
    projects_dir: Option<PathBuf>,
    debounce: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = load_config(output, projects_dir, None, debounce)?;
    let project = resolve_project(&config, name)?;

    let options = WatchOptions {
        project_root: project.root,
        target_dir: config.target_dir.clone(),
        debounce: config.debounce(),
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            ui::print_watch_event(&event);
        }
    })?;
    Ok(())
}

fn cmd_projects(projects_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(None, projects_dir, None, None)?;
    let names = project::list(&config.projects_dir)?;

    if json {
        println!("{}", serde_json::to_string(&names)?);
    } else if names.is_empty() {
        println!("no projects in {}", config.projects_dir.display());
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
