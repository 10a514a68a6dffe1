//! Activity log coordinator: a dedicated thread owns the JSONL writer.
//!
//! Components send [`ActivityEvent`] via a bounded crossbeam channel.
//! Non-blocking `try_send()` ensures the sweep is never stalled by logging
//! back-pressure; components hold an [`ActivityLoggerHandle`] capability
//! rather than reaching for a global logger.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::core::errors::{DswError, Result};
use crate::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};

/// Default bounded channel capacity for log events.
const CHANNEL_CAPACITY: usize = 1024;

/// Events emitted from every decision point of a sweep.
#[derive(Debug, Clone)]
pub enum ActivityEvent {
    SweepStarted {
        config_hash: String,
        dry_run: bool,
    },
    SweepCompleted {
        deleted_files: u64,
        deleted_dirs: u64,
        skipped_files: u64,
        failed_files: u64,
        failed_dirs: u64,
        duration_ms: u64,
        dry_run: bool,
    },
    RootSkipped {
        path: String,
        reason: String,
    },
    FileDeleted {
        path: String,
        dry_run: bool,
    },
    FileSkipped {
        path: String,
        reason: String,
    },
    FileDeleteFailed {
        path: String,
        error_code: String,
        error_message: String,
    },
    DirDeleted {
        path: String,
        recursive: bool,
        dry_run: bool,
    },
    DirKept {
        path: String,
    },
    DirDeleteFailed {
        path: String,
        error_code: String,
        error_message: String,
    },
    AgeCheckFailed {
        path: String,
        details: String,
    },
    ConfigFallback {
        field: String,
        given: String,
        substituted: String,
    },
    /// Sentinel to request graceful shutdown of the logger thread.
    Shutdown,
}

/// Thread-safe, cheaply-cloneable handle for sending log events.
///
/// Internally wraps a bounded crossbeam `Sender`. The `send()` method uses
/// `try_send()` so callers are never blocked by logging back-pressure.
#[derive(Clone)]
pub struct ActivityLoggerHandle {
    tx: Sender<ActivityEvent>,
    dropped_events: Arc<AtomicU64>,
}

impl ActivityLoggerHandle {
    /// Send an event to the logger thread. Non-blocking.
    ///
    /// If the channel is full the event is dropped and the dropped-events
    /// counter is incremented.
    pub fn send(&self, event: ActivityEvent) {
        if let Err(TrySendError::Full(_)) = self.tx.try_send(event) {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
        // Disconnected is fine during shutdown.
    }

    /// Number of events dropped due to channel back-pressure.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Request graceful shutdown of the logger thread.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ActivityEvent::Shutdown);
    }
}

/// Spawn the logger thread and return a handle plus its join handle.
///
/// The handle is `Clone + Send` and can be shared freely. The thread runs
/// until `handle.shutdown()` is called or all senders are dropped.
pub fn spawn_logger(
    jsonl_path: PathBuf,
) -> Result<(ActivityLoggerHandle, thread::JoinHandle<()>)> {
    let (tx, rx) = bounded::<ActivityEvent>(CHANNEL_CAPACITY);
    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_clone = Arc::clone(&dropped);

    let handle = ActivityLoggerHandle {
        tx,
        dropped_events: dropped,
    };

    let join = thread::Builder::new()
        .name("dirsweep-logger".to_string())
        .spawn(move || {
            logger_thread_main(&rx, jsonl_path, &dropped_clone);
        })
        .map_err(|e| DswError::Runtime {
            details: format!("failed to spawn logger thread: {e}"),
        })?;

    Ok((handle, join))
}

fn logger_thread_main(rx: &Receiver<ActivityEvent>, jsonl_path: PathBuf, dropped: &AtomicU64) {
    let mut jsonl = JsonlWriter::open(&jsonl_path);

    while let Ok(event) = rx.recv() {
        // Report dropped events before processing the next one.
        let d = dropped.swap(0, Ordering::Relaxed);
        if d > 0 {
            let mut warn = LogEntry::new(EventType::Error, Severity::Warning);
            warn.details = Some(format!("{d} log events dropped due to back-pressure"));
            jsonl.write_entry(&warn);
        }

        if matches!(event, ActivityEvent::Shutdown) {
            break;
        }

        jsonl.write_entry(&event_to_log_entry(&event));
    }

    jsonl.flush();
}

fn event_to_log_entry(event: &ActivityEvent) -> LogEntry {
    match event {
        ActivityEvent::SweepStarted { config_hash, dry_run } => {
            let mut e = LogEntry::new(EventType::SweepStart, Severity::Info);
            e.config_hash = Some(config_hash.clone());
            e.dry_run = Some(*dry_run);
            e
        }
        ActivityEvent::SweepCompleted {
            deleted_files,
            deleted_dirs,
            skipped_files,
            failed_files,
            failed_dirs,
            duration_ms,
            dry_run,
        } => {
            let mut e = LogEntry::new(EventType::SweepComplete, Severity::Info);
            e.deleted_files = Some(*deleted_files);
            e.deleted_dirs = Some(*deleted_dirs);
            e.skipped_files = Some(*skipped_files);
            e.failed_files = Some(*failed_files);
            e.failed_dirs = Some(*failed_dirs);
            e.duration_ms = Some(*duration_ms);
            e.dry_run = Some(*dry_run);
            e
        }
        ActivityEvent::RootSkipped { path, reason } => {
            let mut e = LogEntry::new(EventType::RootSkipped, Severity::Warning);
            e.path = Some(path.clone());
            e.reason = Some(reason.clone());
            e
        }
        ActivityEvent::FileDeleted { path, dry_run } => {
            let mut e = LogEntry::new(EventType::FileDeleted, Severity::Info);
            e.path = Some(path.clone());
            e.dry_run = Some(*dry_run);
            e
        }
        ActivityEvent::FileSkipped { path, reason } => {
            let mut e = LogEntry::new(EventType::FileSkipped, Severity::Debug);
            e.path = Some(path.clone());
            e.reason = Some(reason.clone());
            e
        }
        ActivityEvent::FileDeleteFailed {
            path,
            error_code,
            error_message,
        } => {
            let mut e = LogEntry::new(EventType::FileDeleteFailed, Severity::Error);
            e.path = Some(path.clone());
            e.error_code = Some(error_code.clone());
            e.error_message = Some(error_message.clone());
            e
        }
        ActivityEvent::DirDeleted {
            path,
            recursive,
            dry_run,
        } => {
            let mut e = LogEntry::new(EventType::DirDeleted, Severity::Info);
            e.path = Some(path.clone());
            e.reason = Some(if *recursive { "subtree" } else { "empty" }.to_string());
            e.dry_run = Some(*dry_run);
            e
        }
        ActivityEvent::DirKept { path } => {
            let mut e = LogEntry::new(EventType::DirKept, Severity::Debug);
            e.path = Some(path.clone());
            e.reason = Some("not empty".to_string());
            e
        }
        ActivityEvent::DirDeleteFailed {
            path,
            error_code,
            error_message,
        } => {
            let mut e = LogEntry::new(EventType::DirDeleteFailed, Severity::Error);
            e.path = Some(path.clone());
            e.error_code = Some(error_code.clone());
            e.error_message = Some(error_message.clone());
            e
        }
        ActivityEvent::AgeCheckFailed { path, details } => {
            let mut e = LogEntry::new(EventType::AgeCheckFailed, Severity::Debug);
            e.path = Some(path.clone());
            e.details = Some(details.clone());
            e
        }
        ActivityEvent::ConfigFallback {
            field,
            given,
            substituted,
        } => {
            let mut e = LogEntry::new(EventType::ConfigFallback, Severity::Warning);
            e.details = Some(format!("{field}: {given:?} replaced with {substituted}"));
            e
        }
        ActivityEvent::Shutdown => LogEntry::new(EventType::Error, Severity::Debug),
    }
}
