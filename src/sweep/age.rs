//! Age policy: is a file's mtime old enough, relative to a run-anchored cutoff.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};

/// A single timestamp captured once per run.
///
/// All age comparisons within a run anchor to this value; the system clock is
/// never re-read mid-run, so a long sweep treats every file consistently.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started: DateTime<Utc>,
}

impl RunClock {
    /// Capture the current time as the run anchor.
    pub fn now() -> Self {
        Self {
            started: Utc::now(),
        }
    }

    /// Anchor to a known instant. Useful for deterministic tests.
    pub fn fixed(started: DateTime<Utc>) -> Self {
        Self { started }
    }

    /// The run anchor timestamp.
    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    /// The deletion threshold: files modified strictly before this are stale.
    pub fn cutoff(&self, hours: i64) -> DateTime<Utc> {
        self.started - Duration::hours(hours)
    }
}

/// Decides whether a file is old enough to delete.
pub struct AgePolicy {
    cutoff: DateTime<Utc>,
    logger: Option<ActivityLoggerHandle>,
}

impl AgePolicy {
    /// Build from the run clock and the configured cutoff in hours.
    pub fn new(clock: &RunClock, cutoff_hours: i64, logger: Option<ActivityLoggerHandle>) -> Self {
        Self {
            cutoff: clock.cutoff(cutoff_hours),
            logger,
        }
    }

    /// True iff the file's mtime is strictly before the cutoff.
    ///
    /// Equality at the exact boundary is not old enough. Unreadable metadata
    /// (entry vanished, permission denied) is fail-closed: the file is
    /// reported as not old enough and the failure is logged at debug level,
    /// never counted as a deletion failure. Symlinks are not followed; the
    /// link's own mtime is what ages.
    pub fn is_old_enough(&self, path: &Path) -> bool {
        let modified = fs::symlink_metadata(path).and_then(|meta| meta.modified());
        match modified {
            Ok(mtime) => DateTime::<Utc>::from(mtime) < self.cutoff,
            Err(err) => {
                if let Some(logger) = &self.logger {
                    logger.send(ActivityEvent::AgeCheckFailed {
                        path: path.display().to_string(),
                        details: err.to_string(),
                    });
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::time::SystemTime;

    fn set_age_hours(path: &Path, hours: i64) {
        let mtime = Utc::now() - Duration::hours(hours);
        filetime::set_file_mtime(path, FileTime::from_system_time(SystemTime::from(mtime)))
            .unwrap();
    }

    #[test]
    fn old_file_is_old_enough() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("old.pdf");
        std::fs::write(&file, "x").unwrap();
        set_age_hours(&file, 26);

        let policy = AgePolicy::new(&RunClock::now(), 24, None);
        assert!(policy.is_old_enough(&file));
    }

    #[test]
    fn recent_file_is_not_old_enough() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("recent.pdf");
        std::fs::write(&file, "x").unwrap();
        set_age_hours(&file, 1);

        let policy = AgePolicy::new(&RunClock::now(), 24, None);
        assert!(!policy.is_old_enough(&file));
    }

    #[test]
    fn exact_cutoff_boundary_is_not_old_enough() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("boundary.pdf");
        std::fs::write(&file, "x").unwrap();

        let clock = RunClock::fixed(Utc::now());
        let cutoff = clock.cutoff(24);
        filetime::set_file_mtime(
            &file,
            FileTime::from_system_time(SystemTime::from(cutoff)),
        )
        .unwrap();

        let policy = AgePolicy::new(&clock, 24, None);
        assert!(!policy.is_old_enough(&file), "strict less-than required");
    }

    #[test]
    fn one_second_before_cutoff_is_old_enough() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("barely.pdf");
        std::fs::write(&file, "x").unwrap();

        let clock = RunClock::fixed(Utc::now());
        let mtime = clock.cutoff(24) - Duration::seconds(1);
        filetime::set_file_mtime(
            &file,
            FileTime::from_system_time(SystemTime::from(mtime)),
        )
        .unwrap();

        let policy = AgePolicy::new(&clock, 24, None);
        assert!(policy.is_old_enough(&file));
    }

    #[test]
    fn vanished_file_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone.pdf");

        let policy = AgePolicy::new(&RunClock::now(), 24, None);
        assert!(!policy.is_old_enough(&gone));
    }

    #[test]
    fn run_clock_cutoff_is_anchor_minus_hours() {
        let started = Utc::now();
        let clock = RunClock::fixed(started);
        assert_eq!(clock.cutoff(24), started - Duration::hours(24));
        assert_eq!(clock.started(), started);
    }
}
