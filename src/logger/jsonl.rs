//! JSONL activity log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object. Lines are assembled in memory
//! and written atomically via `write_all` so another process tailing the file
//! never sees interleaved partial lines.
//!
//! Degradation chain: primary file path, then silent discard. A sweep must
//! never fail because its log could not be written; open failure is reported
//! once on stderr.

#![allow(missing_docs)]

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use chrono::Utc;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Log event types matching the sweep activity model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SweepStart,
    SweepComplete,
    RootSkipped,
    FileDeleted,
    FileSkipped,
    FileDeleteFailed,
    DirDeleted,
    DirKept,
    DirDeleteFailed,
    AgeCheckFailed,
    ConfigFallback,
    Error,
}

/// A single JSONL log entry — all fields optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Severity level.
    pub severity: Severity,
    /// Affected filesystem path (when applicable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Why an entry was skipped or kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// DSW error code if an action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Run totals, present on sweep completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_dirs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_files: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_dirs: Option<u64>,
    /// Duration of the action in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Whether this run was a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    /// Effective config hash for correlating entries across runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            event,
            severity,
            path: None,
            reason: None,
            error_code: None,
            error_message: None,
            deleted_files: None,
            deleted_dirs: None,
            skipped_files: None,
            failed_files: None,
            failed_dirs: None,
            duration_ms: None,
            dry_run: None,
            config_hash: None,
            details: None,
        }
    }
}

/// Append-only JSONL log writer.
pub struct JsonlWriter {
    writer: Option<BufWriter<File>>,
}

impl JsonlWriter {
    /// Open the JSONL log file for append, creating parent directories.
    ///
    /// On failure the writer degrades to silent discard after a single
    /// stderr notice.
    pub fn open(path: &Path) -> Self {
        let writer = Self::try_open(path);
        if writer.is_none() {
            let _ = writeln!(
                io::stderr(),
                "[DSW-JSONL] cannot open {}, activity log disabled for this run",
                path.display()
            );
        }
        Self { writer }
    }

    fn try_open(path: &Path) -> Option<BufWriter<File>> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).ok()?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
        Some(BufWriter::new(file))
    }

    /// Write a single log entry as one atomic JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let Some(w) = self.writer.as_mut() else {
            return;
        };
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                // Serialization failure is a programming error; note and bail.
                let _ = writeln!(io::stderr(), "[DSW-JSONL] serialize error: {e}");
                return;
            }
        };
        if w.write_all(line.as_bytes()).is_err() {
            self.writer = None;
        }
    }

    /// Flush buffers and sync file data.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
            let _ = w.get_ref().sync_data();
        }
    }

    /// Whether the writer is still attached to its file.
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

}
