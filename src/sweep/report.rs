//! Per-root and aggregated sweep statistics.

use serde::Serialize;

/// Counters for one target root.
///
/// Every processed entry contributes to exactly one counter within its
/// category (file or directory); counters only increase during a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryResult {
    /// Files removed (or, in a dry run, that would have been removed).
    pub deleted_files: u64,
    /// Files that matched policy but could not be removed.
    pub failed_files: u64,
    /// Files that did not match the deletion policy.
    pub skipped_files: u64,
    /// Directories removed, whether wholesale or as empty-dir prunes.
    pub deleted_dirs: u64,
    /// Directories whose removal was attempted and failed.
    pub failed_dirs: u64,
}

impl DirectoryResult {
    /// Fold a subtree's counters into this result.
    pub fn absorb(&mut self, other: &Self) {
        self.deleted_files += other.deleted_files;
        self.failed_files += other.failed_files;
        self.skipped_files += other.skipped_files;
        self.deleted_dirs += other.deleted_dirs;
        self.failed_dirs += other.failed_dirs;
    }

    /// True when nothing was deleted, skipped, or failed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Total failed deletions across both categories.
    pub fn failures(&self) -> u64 {
        self.failed_files + self.failed_dirs
    }
}

/// Outcome of a full run: one entry per configured root, in configuration
/// order. Roots are keyed by the path string as configured, not canonicalized;
/// duplicate roots produce duplicate entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    entries: Vec<(String, DirectoryResult)>,
}

impl RunReport {
    /// Record the result for the next root.
    pub fn push(&mut self, root: String, result: DirectoryResult) {
        self.entries.push((root, result));
    }

    /// Per-root results in configuration order.
    pub fn entries(&self) -> &[(String, DirectoryResult)] {
        &self.entries
    }

    /// Sum of every counter across all roots.
    pub fn totals(&self) -> DirectoryResult {
        let mut total = DirectoryResult::default();
        for (_, result) in &self.entries {
            total.absorb(result);
        }
        total
    }
}
