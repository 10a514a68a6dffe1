//! Deletion executor: removes single files or whole subtrees with dry-run
//! support, collapsing OS failures into a value the traversal can count.
//!
//! Failures never unwind past this boundary. Permission denials are kept
//! distinct from other OS failures only so the activity log can carry the
//! right error code; callers see both as one failed deletion.

#![allow(missing_docs)]

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};

/// Why a deletion failed, by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteFailure {
    PermissionDenied,
    Other(String),
}

impl DeleteFailure {
    /// Stable error code for the activity log.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "DSW-3001",
            Self::Other(_) => "DSW-3002",
        }
    }

    fn from_io(err: &std::io::Error) -> Self {
        if err.kind() == ErrorKind::PermissionDenied {
            Self::PermissionDenied
        } else {
            Self::Other(err.to_string())
        }
    }

    fn message(&self) -> String {
        match self {
            Self::PermissionDenied => "permission denied".to_string(),
            Self::Other(msg) => msg.clone(),
        }
    }
}

/// Performs the actual removals.
pub struct DeletionExecutor {
    dry_run: bool,
    logger: Option<ActivityLoggerHandle>,
}

impl DeletionExecutor {
    /// Create an executor. In dry-run mode nothing is removed; every
    /// would-be deletion reports success and is logged as such.
    pub fn new(dry_run: bool, logger: Option<ActivityLoggerHandle>) -> Self {
        Self { dry_run, logger }
    }

    /// Remove exactly one file (or symlink — the link itself, not its target).
    pub fn delete_file(&self, path: &Path) -> Result<(), DeleteFailure> {
        if self.dry_run {
            self.log_file_deleted(path);
            return Ok(());
        }
        match fs::remove_file(path) {
            Ok(()) => {
                self.log_file_deleted(path);
                Ok(())
            }
            Err(err) => {
                let failure = DeleteFailure::from_io(&err);
                self.log(ActivityEvent::FileDeleteFailed {
                    path: path.display().to_string(),
                    error_code: failure.code().to_string(),
                    error_message: failure.message(),
                });
                Err(failure)
            }
        }
    }

    /// Remove a directory and everything beneath it, non-interactively.
    pub fn delete_dir_tree(&self, path: &Path) -> Result<(), DeleteFailure> {
        self.delete_dir_inner(path, true, |p: &Path| fs::remove_dir_all(p))
    }

    /// Remove a directory expected to be empty.
    pub fn delete_empty_dir(&self, path: &Path) -> Result<(), DeleteFailure> {
        self.delete_dir_inner(path, false, |p: &Path| fs::remove_dir(p))
    }

    fn delete_dir_inner(
        &self,
        path: &Path,
        recursive: bool,
        remove: impl Fn(&Path) -> std::io::Result<()>,
    ) -> Result<(), DeleteFailure> {
        if self.dry_run {
            self.log_dir_deleted(path, recursive);
            return Ok(());
        }
        match remove(path) {
            Ok(()) => {
                self.log_dir_deleted(path, recursive);
                Ok(())
            }
            Err(err) => {
                let failure = DeleteFailure::from_io(&err);
                self.log(ActivityEvent::DirDeleteFailed {
                    path: path.display().to_string(),
                    error_code: failure.code().to_string(),
                    error_message: failure.message(),
                });
                Err(failure)
            }
        }
    }

    fn log_file_deleted(&self, path: &Path) {
        self.log(ActivityEvent::FileDeleted {
            path: path.display().to_string(),
            dry_run: self.dry_run,
        });
    }

    fn log_dir_deleted(&self, path: &Path, recursive: bool) {
        self.log(ActivityEvent::DirDeleted {
            path: path.display().to_string(),
            recursive,
            dry_run: self.dry_run,
        });
    }

    fn log(&self, event: ActivityEvent) {
        if let Some(logger) = &self.logger {
            logger.send(event);
        }
    }
}
