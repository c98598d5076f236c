//! Full destructive sync of a project onto the target volume
//!
//! Phases: validate -> delete -> copy -> requirements. Every phase
//! failure is fatal and leaves the target in whatever partial state it
//! reached; there is no rollback. The engine is strictly sequential and
//! provides no locking - callers must not run two full syncs against
//! the same target concurrently.

use std::fs;
use std::path::Path;

use crate::bundle::{ensure_cache, locate_requirement, ResolvedRequirement};
use crate::config::{Config, MANIFEST_FILENAME};
use crate::error::{BoardsyncError, BoardsyncResult};
use crate::fsops;
use crate::manifest::read_manifest;
use crate::project::Project;

/// Per-entry deletion confirmation capability.
///
/// Injected so the engine is testable without real console input. The
/// interactive implementation lives in [`crate::ui`].
pub trait Confirmation {
    /// Ask whether `path` may be removed from the target.
    fn confirm_removal(&mut self, path: &Path) -> BoardsyncResult<bool>;
}

/// Confirmation that always answers yes (`--yes` / force mode)
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm_removal(&mut self, _path: &Path) -> BoardsyncResult<bool> {
        Ok(true)
    }
}

/// Progress events emitted during a sync, NDJSON-ready
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// Deletion phase starting
    RemovingEntries { target: String, count: usize },
    /// One top-level entry removed from the target
    EntryRemoved { path: String },
    /// Project tree copied
    ProjectCopied { files: usize },
    /// Bundle cache checked; `refreshed` is true when it was downloaded
    BundleCacheReady { refreshed: bool },
    /// One requirement resolved and copied into the target lib dir
    RequirementInstalled { name: String, path: String },
    /// Project declares no manifest; requirements phase skipped
    NoRequirements,
}

impl SyncEvent {
    /// Render as one NDJSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Summary of one completed sync
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Top-level entries removed from the target
    pub deleted: Vec<std::path::PathBuf>,
    /// Files copied from the project tree
    pub copied: Vec<std::path::PathBuf>,
    /// Requirements resolved and installed
    pub requirements: Vec<ResolvedRequirement>,
    /// Whether the bundle cache was downloaded during this run
    pub cache_refreshed: bool,
}

/// Orchestrates one full destructive resync
pub struct SyncEngine<'a, C: Confirmation> {
    config: &'a Config,
    confirm: C,
}

impl<'a, C: Confirmation> SyncEngine<'a, C> {
    pub fn new(config: &'a Config, confirm: C) -> Self {
        Self { config, confirm }
    }

    /// Run the full sync for `project`.
    pub fn run(
        &mut self,
        project: &Project,
        mut on_event: impl FnMut(SyncEvent),
    ) -> BoardsyncResult<SyncReport> {
        let target = &self.config.target_dir;
        if !target.is_dir() {
            return Err(BoardsyncError::TargetNotMounted {
                path: target.clone(),
            });
        }

        let mut report = SyncReport::default();

        self.delete_target_entries(&mut report, &mut on_event)?;

        report.copied = fsops::copy_tree(&project.root, target)?;
        on_event(SyncEvent::ProjectCopied {
            files: report.copied.len(),
        });

        self.install_requirements(project, &mut report, &mut on_event)?;

        Ok(report)
    }

    /// Deletion phase.
    ///
    /// The safety-cap check runs on the full entry list before the
    /// first removal, so an over-cap target loses nothing. A declined
    /// prompt aborts the run; entries confirmed earlier stay deleted.
    fn delete_target_entries(
        &mut self,
        report: &mut SyncReport,
        on_event: &mut impl FnMut(SyncEvent),
    ) -> BoardsyncResult<()> {
        let target = &self.config.target_dir;
        let entries = fsops::top_level_entries(target)?;

        if entries.len() > self.config.delete_cap {
            return Err(BoardsyncError::SafetyLimitExceeded {
                path: target.clone(),
                count: entries.len(),
                cap: self.config.delete_cap,
            });
        }

        on_event(SyncEvent::RemovingEntries {
            target: target.display().to_string(),
            count: entries.len(),
        });

        for entry in entries {
            if !self.confirm.confirm_removal(&entry)? {
                return Err(BoardsyncError::UserAborted);
            }
            fsops::remove_entry(&entry)?;
            on_event(SyncEvent::EntryRemoved {
                path: entry.display().to_string(),
            });
            report.deleted.push(entry);
        }
        Ok(())
    }

    /// Requirements phase. A missing manifest skips the phase entirely.
    fn install_requirements(
        &mut self,
        project: &Project,
        report: &mut SyncReport,
        on_event: &mut impl FnMut(SyncEvent),
    ) -> BoardsyncResult<()> {
        let manifest_path = project.root.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            on_event(SyncEvent::NoRequirements);
            return Ok(());
        }

        let lib_dir = self.config.target_dir.join("lib");
        fs::create_dir_all(&lib_dir)?;

        report.cache_refreshed = ensure_cache(&self.config.cache_dir, &self.config.bundles)?;
        on_event(SyncEvent::BundleCacheReady {
            refreshed: report.cache_refreshed,
        });

        for name in read_manifest(&manifest_path)? {
            let resolved = locate_requirement(&name, &self.config.cache_dir)?;
            fsops::copy_into(&resolved.source_path, &lib_dir)?;
            on_event(SyncEvent::RequirementInstalled {
                name: resolved.name.clone(),
                path: resolved.source_path.display().to_string(),
            });
            report.requirements.push(resolved);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Answers removal prompts from a fixed script.
    struct ScriptedConfirm {
        answers: Vec<bool>,
        asked: Vec<PathBuf>,
    }

    impl ScriptedConfirm {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: answers.to_vec(),
                asked: Vec::new(),
            }
        }
    }

    impl Confirmation for ScriptedConfirm {
        fn confirm_removal(&mut self, path: &Path) -> BoardsyncResult<bool> {
            self.asked.push(path.to_path_buf());
            Ok(self.answers.remove(0))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
        project: Project,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let target = dir.path().join("CIRCUITPY");
        let projects = dir.path().join("projects");
        fs::create_dir_all(projects.join("demo")).unwrap();
        fs::create_dir(&target).unwrap();
        fs::write(projects.join("demo/code.py"), "print('demo')").unwrap();

        let config = Config {
            projects_dir: projects.clone(),
            target_dir: target,
            cache_dir: dir.path().join("downloads"),
            ..Config::default()
        };
        let project = crate::project::resolve(&projects, "demo").unwrap();
        Fixture {
            _dir: dir,
            config,
            project,
        }
    }

    fn make_cached_bundle(cache: &Path, bundle: &str, package: &str) {
        let lib = cache.join(bundle).join("lib").join(package);
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("__init__.py"), "").unwrap();
    }

    #[test]
    fn test_run_fails_when_target_not_mounted() {
        let fx = fixture();
        let mut config = fx.config.clone();
        config.target_dir = config.target_dir.join("missing");

        let mut engine = SyncEngine::new(&config, AutoConfirm);
        let err = engine.run(&fx.project, |_| {}).unwrap_err();
        assert!(matches!(err, BoardsyncError::TargetNotMounted { .. }));
    }

    #[test]
    fn test_run_copies_project_tree() {
        let fx = fixture();
        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        let report = engine.run(&fx.project, |_| {}).unwrap();

        assert!(fx.config.target_dir.join("code.py").exists());
        assert_eq!(report.copied.len(), 1);
        assert!(report.requirements.is_empty());
    }

    #[test]
    fn test_safety_cap_aborts_before_any_deletion() {
        let fx = fixture();
        for i in 0..51 {
            fs::write(fx.config.target_dir.join(format!("f{i:02}.txt")), "").unwrap();
        }

        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        let err = engine.run(&fx.project, |_| {}).unwrap_err();
        assert!(matches!(
            err,
            BoardsyncError::SafetyLimitExceeded { count: 51, cap: 50, .. }
        ));
        // Nothing was removed.
        assert_eq!(fsops::top_level_entries(&fx.config.target_dir).unwrap().len(), 51);
    }

    #[test]
    fn test_exactly_cap_entries_is_allowed() {
        let fx = fixture();
        for i in 0..50 {
            fs::write(fx.config.target_dir.join(format!("f{i:02}.txt")), "").unwrap();
        }

        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        let report = engine.run(&fx.project, |_| {}).unwrap();
        assert_eq!(report.deleted.len(), 50);
    }

    #[test]
    fn test_decline_stops_run_and_keeps_remaining_entries() {
        let fx = fixture();
        fs::write(fx.config.target_dir.join("a.txt"), "").unwrap();
        fs::write(fx.config.target_dir.join("b.txt"), "").unwrap();
        fs::write(fx.config.target_dir.join("c.txt"), "").unwrap();

        let confirm = ScriptedConfirm::new(&[true, false]);
        let mut engine = SyncEngine::new(&fx.config, confirm);
        let err = engine.run(&fx.project, |_| {}).unwrap_err();
        assert!(matches!(err, BoardsyncError::UserAborted));

        // Entries are visited in sorted order: a removed, b declined,
        // c never reached. The project was not copied.
        assert!(!fx.config.target_dir.join("a.txt").exists());
        assert!(fx.config.target_dir.join("b.txt").exists());
        assert!(fx.config.target_dir.join("c.txt").exists());
        assert!(!fx.config.target_dir.join("code.py").exists());
    }

    #[test]
    fn test_dotfiles_survive_deletion_phase() {
        let fx = fixture();
        fs::write(fx.config.target_dir.join(".metadata_never_index"), "").unwrap();
        fs::write(fx.config.target_dir.join("old.py"), "").unwrap();

        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        let report = engine.run(&fx.project, |_| {}).unwrap();

        assert!(fx.config.target_dir.join(".metadata_never_index").exists());
        assert_eq!(report.deleted, vec![fx.config.target_dir.join("old.py")]);
    }

    #[test]
    fn test_requirements_installed_from_prepopulated_cache() {
        let fx = fixture();
        fs::write(
            fx.project.root.join(MANIFEST_FILENAME),
            "# deps\nlibfoo\n",
        )
        .unwrap();
        make_cached_bundle(&fx.config.cache_dir, "bundle-1.0", "libfoo");

        let mut events = Vec::new();
        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        let report = engine
            .run(&fx.project, |e| events.push(e.to_json()))
            .unwrap();

        // Pre-populated cache means no refresh happened.
        assert!(!report.cache_refreshed);
        assert_eq!(report.requirements.len(), 1);
        assert!(fx.config.target_dir.join("lib/libfoo/__init__.py").exists());
        assert!(events.iter().any(|e| e.contains("requirement_installed")));
    }

    #[test]
    fn test_unresolvable_requirement_fails_before_copying_it() {
        let fx = fixture();
        fs::write(fx.project.root.join(MANIFEST_FILENAME), "libmissing\n").unwrap();
        make_cached_bundle(&fx.config.cache_dir, "bundle-1.0", "libfoo");

        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        let err = engine.run(&fx.project, |_| {}).unwrap_err();
        assert!(matches!(err, BoardsyncError::RequirementNotFound { .. }));
        assert!(!fx.config.target_dir.join("lib/libmissing").exists());
    }

    #[test]
    fn test_missing_manifest_skips_requirements_phase() {
        let fx = fixture();
        let mut events = Vec::new();
        let mut engine = SyncEngine::new(&fx.config, AutoConfirm);
        engine.run(&fx.project, |e| events.push(e.to_json())).unwrap();

        assert!(events.iter().any(|e| e.contains("no_requirements")));
        // No lib dir is created for a manifest-less project.
        assert!(!fx.config.target_dir.join("lib").exists());
    }
}
