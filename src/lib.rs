#![forbid(unsafe_code)]

//! dirsweep — scheduled housekeeping for directories that collect junk.
//!
//! Each invocation performs one synchronous sweep: stale files (and, in
//! wildcard mode, whole subdirectories) are removed from a configured set of
//! target roots based on file age and extension filters, a per-root summary
//! is reported, and the process exits.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use dirsweep::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use dirsweep::core::config::Config;
//! use dirsweep::sweep::Sweeper;
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod sweep;
