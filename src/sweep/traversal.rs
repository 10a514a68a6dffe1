//! Traversal engine: walks one target root and applies the deletion policy.
//!
//! Two modes, fixed once per run by the extension filter:
//!
//! - **Wildcard**: shallow and aggressive. Direct child files are deleted
//!   (gated by age only when `wildcard_checks_age` is set); direct child
//!   directories are removed wholesale as a single subtree, without
//!   descending file-by-file. This models "purge everything in this scratch
//!   directory".
//! - **Filtered**: recursive. The extension+age decision applies to every
//!   file at every depth; after a directory's subtree has been processed the
//!   directory itself is removed only if a fresh listing shows it empty.
//!
//! Entries are visited exactly once and in filesystem-listing order, which
//! is unspecified; nothing here depends on ordering. Symlinks are never
//! followed: classification uses the non-following entry file type, so a
//! symlink is handled as a file-like entry (the link itself is removed) and
//! cyclic links cannot cause unbounded recursion.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::sweep::age::AgePolicy;
use crate::sweep::deletion::DeletionExecutor;
use crate::sweep::filter::ExtensionFilter;
use crate::sweep::report::DirectoryResult;

/// Walks one root per call, producing its [`DirectoryResult`].
pub struct TraversalEngine {
    filter: ExtensionFilter,
    age: AgePolicy,
    executor: DeletionExecutor,
    wildcard_checks_age: bool,
    logger: Option<ActivityLoggerHandle>,
}

impl TraversalEngine {
    pub fn new(
        filter: ExtensionFilter,
        age: AgePolicy,
        executor: DeletionExecutor,
        wildcard_checks_age: bool,
        logger: Option<ActivityLoggerHandle>,
    ) -> Self {
        Self {
            filter,
            age,
            executor,
            wildcard_checks_age,
            logger,
        }
    }

    /// Process one target root.
    ///
    /// A root that does not exist, is not a directory, or cannot be listed
    /// yields an all-zero result and a warning-level log — never an error;
    /// roots are independent and one bad root must not stop the run.
    pub fn clean_root(&self, root: &Path) -> DirectoryResult {
        let mut result = DirectoryResult::default();

        // Roots follow symlinks (a configured root may itself be a link);
        // anything below the root does not.
        let meta = match fs::metadata(root) {
            Ok(meta) => meta,
            Err(_) => {
                self.skip_root(root, "does not exist");
                return result;
            }
        };
        if !meta.is_dir() {
            self.skip_root(root, "not a directory");
            return result;
        }

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                self.skip_root(root, &format!("cannot list: {err}"));
                return result;
            }
        };

        if self.filter.is_wildcard() {
            self.clean_wildcard(entries, &mut result);
        } else {
            self.clean_filtered_level(entries, &mut result);
        }
        result
    }

    fn skip_root(&self, root: &Path, reason: &str) {
        self.log(ActivityEvent::RootSkipped {
            path: root.display().to_string(),
            reason: reason.to_string(),
        });
    }

    // ──────────────────── wildcard mode ────────────────────

    fn clean_wildcard(&self, entries: fs::ReadDir, result: &mut DirectoryResult) {
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                match self.executor.delete_dir_tree(&path) {
                    Ok(()) => result.deleted_dirs += 1,
                    Err(_) => result.failed_dirs += 1,
                }
            } else {
                self.process_file(&path, true, result);
            }
        }
    }

    // ──────────────────── filtered mode ────────────────────

    fn clean_filtered_level(&self, entries: fs::ReadDir, result: &mut DirectoryResult) {
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                self.clean_subdirectory(&path, result);
            } else {
                self.process_file(&path, false, result);
            }
        }
    }

    /// Recurse into a subdirectory, then prune it if it ended up empty.
    fn clean_subdirectory(&self, dir: &Path, result: &mut DirectoryResult) {
        if let Ok(entries) = fs::read_dir(dir) {
            self.clean_filtered_level(entries, result);
        }

        // Emptiness is re-checked by listing, not inferred from counters:
        // a file that failed to delete, appeared concurrently, or was skipped
        // all leave the directory in place.
        match fs::read_dir(dir) {
            Ok(mut remaining) => {
                if remaining.next().is_none() {
                    match self.executor.delete_empty_dir(dir) {
                        Ok(()) => result.deleted_dirs += 1,
                        Err(_) => result.failed_dirs += 1,
                    }
                } else {
                    self.log(ActivityEvent::DirKept {
                        path: dir.display().to_string(),
                    });
                }
            }
            Err(_) => {
                self.log(ActivityEvent::DirKept {
                    path: dir.display().to_string(),
                });
            }
        }
    }

    // ──────────────────── per-file decision ────────────────────

    fn process_file(&self, path: &Path, wildcard: bool, result: &mut DirectoryResult) {
        let skip_reason = if !wildcard && !self.filter.matches(path) {
            Some("extension not in filter")
        } else if (!wildcard || self.wildcard_checks_age) && !self.age.is_old_enough(path) {
            Some("not old enough")
        } else {
            None
        };

        if let Some(reason) = skip_reason {
            result.skipped_files += 1;
            self.log(ActivityEvent::FileSkipped {
                path: path.display().to_string(),
                reason: reason.to_string(),
            });
            return;
        }

        match self.executor.delete_file(path) {
            Ok(()) => result.deleted_files += 1,
            Err(_) => result.failed_files += 1,
        }
    }

    fn log(&self, event: ActivityEvent) {
        if let Some(logger) = &self.logger {
            logger.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::age::RunClock;
    use chrono::{Duration, Utc};
    use filetime::FileTime;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn engine(filter: &str, cutoff_hours: i64) -> TraversalEngine {
        engine_with(filter, cutoff_hours, true, false)
    }

    fn engine_with(
        filter: &str,
        cutoff_hours: i64,
        wildcard_checks_age: bool,
        dry_run: bool,
    ) -> TraversalEngine {
        let clock = RunClock::now();
        TraversalEngine::new(
            ExtensionFilter::parse(filter).unwrap(),
            AgePolicy::new(&clock, cutoff_hours, None),
            DeletionExecutor::new(dry_run, None),
            wildcard_checks_age,
            None,
        )
    }

    fn write_aged(path: &PathBuf, hours_old: i64) {
        std::fs::write(path, "data").unwrap();
        let mtime = Utc::now() - Duration::hours(hours_old);
        filetime::set_file_mtime(path, FileTime::from_system_time(SystemTime::from(mtime)))
            .unwrap();
    }

    #[test]
    fn filtered_deletes_old_and_skips_recent() {
        // Scenario A: old.pdf (26h) deleted, recent.pdf (1h) skipped.
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("old.pdf"), 26);
        write_aged(&dir.path().join("recent.pdf"), 1);

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.skipped_files, 1);
        assert_eq!(result.failed_files, 0);
        assert!(!dir.path().join("old.pdf").exists());
        assert!(dir.path().join("recent.pdf").exists());
    }

    #[test]
    fn filtered_prunes_directory_emptied_by_the_sweep() {
        // Scenario B: sub/ holding only an old deep.pdf is removed after it.
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        write_aged(&sub.join("deep.pdf"), 26);

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.deleted_dirs, 1);
        assert!(!sub.exists());
    }

    #[test]
    fn filtered_keeps_directory_that_still_has_entries() {
        // Scenario C: sub/ holding a recent file stays.
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        write_aged(&sub.join("recent.pdf"), 1);

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 0);
        assert_eq!(result.skipped_files, 1);
        assert_eq!(result.deleted_dirs, 0);
        assert!(sub.exists());
    }

    #[test]
    fn wildcard_removes_subdirectory_wholesale() {
        // Scenario D: subtree with recent contents goes as one unit.
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("scratch");
        std::fs::create_dir_all(sub.join("nested")).unwrap();
        write_aged(&sub.join("nested/fresh.txt"), 1);

        let result = engine("*", 24).clean_root(dir.path());
        assert_eq!(result.deleted_dirs, 1);
        assert_eq!(result.deleted_files, 0, "no per-file counting inside the subtree");
        assert_eq!(result.skipped_files, 0);
        assert!(!sub.exists());
    }

    #[test]
    fn missing_root_yields_all_zero_result() {
        // Scenario E.
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never_existed");
        let result = engine("pdf", 24).clean_root(&missing);
        assert!(result.is_empty());
    }

    #[test]
    fn file_root_yields_all_zero_result() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a_file.txt");
        std::fs::write(&file, "x").unwrap();
        let result = engine("pdf", 24).clean_root(&file);
        assert!(result.is_empty());
        assert!(file.exists());
    }

    #[test]
    fn wildcard_age_gate_skips_recent_files() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("old.tmp"), 30);
        write_aged(&dir.path().join("fresh.tmp"), 1);

        let result = engine("*", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.skipped_files, 1);
        assert!(dir.path().join("fresh.tmp").exists());
    }

    #[test]
    fn wildcard_without_age_gate_deletes_everything() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("fresh.tmp"), 1);

        let result = engine_with("*", 24, false, false).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.skipped_files, 0);
    }

    #[test]
    fn filtered_prunes_nested_chain_bottom_up() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("outer/inner");
        std::fs::create_dir_all(&inner).unwrap();
        write_aged(&inner.join("deep.pdf"), 26);

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.deleted_dirs, 2, "inner then outer both pruned");
        assert!(!dir.path().join("outer").exists());
    }

    #[test]
    fn filtered_recursion_applies_policy_at_every_depth() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("docs");
        std::fs::create_dir(&sub).unwrap();
        write_aged(&sub.join("stale.pdf"), 26);
        write_aged(&sub.join("stale.txt"), 26);
        write_aged(&dir.path().join("top.pdf"), 26);

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 2);
        assert_eq!(result.skipped_files, 1);
        assert_eq!(result.deleted_dirs, 0, "docs still holds stale.txt");
        assert!(sub.join("stale.txt").exists());
    }

    #[test]
    fn second_run_on_clean_root_is_all_zero_except_survivors() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("old.pdf"), 26);

        let first = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(first.deleted_files, 1);

        let second = engine("pdf", 24).clean_root(dir.path());
        assert!(second.is_empty(), "idempotent once nothing is eligible");
    }

    #[test]
    fn pre_existing_empty_directory_is_pruned() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("hollow")).unwrap();

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_dirs, 1);
        assert!(!dir.path().join("hollow").exists());
    }

    #[test]
    fn dry_run_counts_without_deleting() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("old.pdf"), 26);
        let sub = dir.path().join("scratch");
        std::fs::create_dir(&sub).unwrap();

        let result = engine_with("*", 24, true, true).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
        assert_eq!(result.deleted_dirs, 1);
        assert!(dir.path().join("old.pdf").exists());
        assert!(sub.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_recursed_in_filtered_mode() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        write_aged(&outside.path().join("victim.pdf"), 26);

        let link = dir.path().join("portal");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();

        // The link is file-like under non-following classification; with a
        // recent mtime it is merely skipped and the target stays intact.
        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 0);
        assert!(outside.path().join("victim.pdf").exists());
        assert!(result.failures() == 0);
    }

    #[test]
    fn unicode_file_names_are_handled() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(&dir.path().join("請求書.pdf"), 26);

        let result = engine("pdf", 24).clean_root(dir.path());
        assert_eq!(result.deleted_files, 1);
    }
}
