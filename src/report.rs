//! Per-file result records, the run-level collector, and the serialized
//! console sink.
//!
//! Workers build a [`FileResult`] in thread-local memory and publish it with
//! exactly one lock acquisition ([`Report::push`]). The collector is passed
//! explicitly into the executor rather than living in module-level state, so
//! independent runs (and tests) never share results.
//!
//! Console output follows the same discipline: [`emit_console_block`] takes a
//! dedicated mutex and writes a whole pre-formatted block, so lines from
//! concurrent workers never interleave.

use std::sync::Mutex;

// ─────────────────────────────────────────────────────────────────────────────
// Per-file records
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Every stage of the chain completed and the destination was produced.
    Ok,
    /// A stage failed; the message names the failing operation and cause.
    Failed(String),
}

impl FileStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FileStatus::Ok)
    }
}

/// Aggregated record for one processed file.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source path as displayed to the user.
    pub filename: String,
    /// Size of the source file in bytes.
    pub original_size: u64,
    /// Size of the destination file in bytes (0 when it was not produced).
    pub final_size: u64,
    /// `100 · (original − final) / original`; 0 when the original is empty.
    /// Negative when the output grew.
    pub ratio_percent: f64,
    /// Wall-clock time across all stages, in milliseconds.
    pub elapsed_ms: u64,
    pub status: FileStatus,
}

impl FileResult {
    /// Size-change ratio in percent. Zero for an empty original.
    pub fn ratio(original_size: u64, final_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            100.0 * (original_size as f64 - final_size as f64) / original_size as f64
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collector
// ─────────────────────────────────────────────────────────────────────────────

/// Thread-safe accumulator of [`FileResult`] records for one run.
#[derive(Default)]
pub struct Report {
    results: Mutex<Vec<FileResult>>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    /// Publishes one record. Single lock acquisition; no other lock is held
    /// while calling this.
    pub fn push(&self, result: FileResult) {
        self.results.lock().unwrap().push(result);
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of records with [`FileStatus::Ok`].
    pub fn files_ok(&self) -> usize {
        self.results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status.is_ok())
            .count()
    }

    /// Count of records with a failure status.
    pub fn files_failed(&self) -> usize {
        self.len() - self.files_ok()
    }

    /// Total original bytes across successfully processed files.
    pub fn bytes_processed(&self) -> u64 {
        self.results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.status.is_ok())
            .map(|r| r.original_size)
            .sum()
    }

    /// Snapshot of all records collected so far.
    pub fn snapshot(&self) -> Vec<FileResult> {
        self.results.lock().unwrap().clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Console sink
// ─────────────────────────────────────────────────────────────────────────────

static CONSOLE: Mutex<()> = Mutex::new(());

/// Writes a pre-formatted multi-line block to stderr at display level 2.
///
/// The block appears contiguously even when called from concurrent workers.
pub fn emit_console_block(block: &str) {
    let _guard = CONSOLE.lock().unwrap();
    crate::displaylevel!(2, "{}", block);
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
