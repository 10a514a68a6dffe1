//! The cleanup engine: age policy, extension filter, deletion executor,
//! traversal, and the per-run orchestrator.

pub mod age;
pub mod deletion;
pub mod filter;
pub mod report;
pub mod traversal;

use std::time::Instant;

use crate::core::config::Config;
use crate::core::errors::{DswError, Result};
use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle};
use crate::sweep::age::{AgePolicy, RunClock};
use crate::sweep::deletion::DeletionExecutor;
use crate::sweep::report::RunReport;
use crate::sweep::traversal::TraversalEngine;

/// Run orchestrator: sweeps every configured root once, in order.
///
/// The run clock is captured at construction and shared by every age
/// comparison of the run. Roots are independent; a root that fails or is
/// missing never prevents later roots from being processed.
pub struct Sweeper {
    config: Config,
    clock: RunClock,
    logger: Option<ActivityLoggerHandle>,
}

impl Sweeper {
    /// Build a sweeper over a resolved configuration, anchoring the run clock.
    pub fn new(config: Config, logger: Option<ActivityLoggerHandle>) -> Self {
        Self {
            config,
            clock: RunClock::now(),
            logger,
        }
    }

    /// Replace the run anchor. Intended for deterministic tests.
    #[must_use]
    pub fn with_clock(mut self, clock: RunClock) -> Self {
        self.clock = clock;
        self
    }

    /// The run anchor.
    pub fn clock(&self) -> &RunClock {
        &self.clock
    }

    /// Sweep all configured roots, returning one result per root in
    /// configuration order.
    ///
    /// An empty root list is the one configuration condition escalated to
    /// the caller; everything else degrades to per-root or per-entry
    /// outcomes inside the report.
    pub fn run(&self) -> Result<RunReport> {
        if self.config.sweep.roots.is_empty() {
            return Err(DswError::NoTargetRoots);
        }
        let filter = self.config.extension_filter()?;
        let dry_run = self.config.sweep.dry_run;

        if let Some(logger) = &self.logger {
            logger.send(ActivityEvent::SweepStarted {
                config_hash: self.config.stable_hash().unwrap_or_default(),
                dry_run,
            });
        }

        let engine = TraversalEngine::new(
            filter,
            AgePolicy::new(&self.clock, self.config.sweep.cutoff_hours, self.logger.clone()),
            DeletionExecutor::new(dry_run, self.logger.clone()),
            self.config.sweep.wildcard_checks_age,
            self.logger.clone(),
        );

        let start = Instant::now();
        let mut report = RunReport::default();
        for root in &self.config.sweep.roots {
            let result = engine.clean_root(root);
            report.push(root.display().to_string(), result);
        }

        if let Some(logger) = &self.logger {
            let totals = report.totals();
            logger.send(ActivityEvent::SweepCompleted {
                deleted_files: totals.deleted_files,
                deleted_dirs: totals.deleted_dirs,
                skipped_files: totals.skipped_files,
                failed_files: totals.failed_files,
                failed_dirs: totals.failed_dirs,
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                dry_run,
            });
        }

        Ok(report)
    }
}
