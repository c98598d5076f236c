//! Isolated test environment with temp directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// One isolated projects/target/cache layout plus a preconfigured
/// `boardsync` command pointed at it.
pub struct TestEnv {
    pub dir: TempDir,
    pub projects: PathBuf,
    pub target: PathBuf,
    pub cache: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let projects = dir.path().join("projects");
        let target = dir.path().join("CIRCUITPY");
        let cache = dir.path().join("downloads");
        fs::create_dir(&projects).unwrap();
        fs::create_dir(&target).unwrap();
        Self {
            dir,
            projects,
            target,
            cache,
        }
    }

    /// Create a project directory with the given relative files.
    pub fn add_project(&self, name: &str, files: &[(&str, &str)]) {
        let root = self.projects.join(name);
        fs::create_dir_all(&root).unwrap();
        for (rel, content) in files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
    }

    /// Pre-populate the bundle cache with an extracted bundle.
    pub fn add_cached_bundle(&self, bundle: &str, packages: &[&str], modules: &[&str]) {
        let lib = self.cache.join(bundle).join("lib");
        fs::create_dir_all(&lib).unwrap();
        for package in packages {
            fs::create_dir_all(lib.join(package)).unwrap();
            fs::write(lib.join(package).join("__init__.py"), "").unwrap();
        }
        for module in modules {
            fs::write(lib.join(format!("{module}.py")), "").unwrap();
        }
    }

    /// Drop a file into the target volume.
    pub fn add_target_entry(&self, name: &str) {
        fs::write(self.target.join(name), "stale").unwrap();
    }

    /// `boardsync` command wired to this environment's directories.
    pub fn boardsync(&self, subcommand: &str) -> Command {
        let bin = env!("CARGO_BIN_EXE_boardsync");
        let mut cmd = Command::new(bin);
        cmd.current_dir(self.dir.path());
        cmd.arg(subcommand);
        cmd.args(["--projects-dir", self.projects.to_str().unwrap()]);
        if subcommand != "projects" {
            cmd.args(["--output", self.target.to_str().unwrap()]);
        }
        if subcommand == "deploy" {
            cmd.args(["--requirements-cache-dir", self.cache.to_str().unwrap()]);
        }
        cmd
    }

    /// Sorted non-dotfile names at the top level of the target.
    pub fn target_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.target)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| !n.starts_with('.'))
            .collect();
        names.sort();
        names
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert a path exists relative to a root.
pub fn assert_exists(root: &Path, rel: &str) {
    assert!(
        root.join(rel).exists(),
        "missing {rel} under {}",
        root.display()
    );
}
