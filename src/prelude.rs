//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use dirsweep::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{DswError, Result};

// Logging
pub use crate::logger::activity::{ActivityEvent, ActivityLoggerHandle, spawn_logger};

// Sweep engine
pub use crate::sweep::Sweeper;
pub use crate::sweep::age::{AgePolicy, RunClock};
pub use crate::sweep::deletion::{DeleteFailure, DeletionExecutor};
pub use crate::sweep::filter::ExtensionFilter;
pub use crate::sweep::report::{DirectoryResult, RunReport};
pub use crate::sweep::traversal::TraversalEngine;
