use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Boardsync - deploy and live-sync CircuitPython projects
#[derive(Parser, Debug)]
#[command(name = "boardsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON for machine consumption
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a project onto the mounted board, replacing its contents
    Deploy {
        /// Project name under the projects directory (prompted if omitted)
        project: Option<String>,

        /// Answer yes to every deletion prompt
        #[arg(short, long)]
        yes: bool,

        /// Directory the board volume is mounted at
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Projects directory
        #[arg(short = 'p', long)]
        projects_dir: Option<PathBuf>,

        /// Directory bundle archives are downloaded into
        #[arg(long = "requirements-cache-dir")]
        cache_dir: Option<PathBuf>,
    },

    /// Watch a project and copy changed files to the board continuously
    Watch {
        /// Project name under the projects directory (prompted if omitted)
        project: Option<String>,

        /// Directory the board volume is mounted at
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Projects directory
        #[arg(short = 'p', long)]
        projects_dir: Option<PathBuf>,

        /// Minimum seconds between accepted change events
        #[arg(long)]
        debounce: Option<u64>,
    },

    /// List deployable projects
    Projects {
        /// Projects directory
        #[arg(short = 'p', long)]
        projects_dir: Option<PathBuf>,
    },
}
