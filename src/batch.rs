//! Run orchestration: work list → journal → worker pool → summary.
//!
//! [`process_batch`] is the single entry point the driver calls after
//! argument validation. It expands the input into work items, opens the
//! per-run journal, submits one pipeline task per file to a fixed-size
//! worker pool, waits for quiescence, and condenses the collected records
//! into a [`BatchSummary`].
//!
//! Shared-sink discipline: each worker builds its per-file block in local
//! memory, then takes exactly one lock per sink (journal, console, report)
//! to publish: never two locks at once, and never a lock around codec work.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};

use crate::config::{ENV_NBWORKERS, JOURNAL_DIR, NB_WORKERS_MAX, QUEUE_SLACK};
use crate::journal::{self, Journal};
use crate::pipeline::{self, ChainSpec};
use crate::report::{emit_console_block, FileResult, Report};
use crate::threadpool::WorkerPool;
use crate::util::{collect_work_items, count_cores, get_total_file_size};

/// Knobs the driver exposes for one run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker thread count; 0 means auto (environment override, then
    /// hardware parallelism).
    pub nb_workers: usize,
    /// When set, any failed file makes the process exit non-zero.
    pub strict: bool,
    /// Journal directory override; defaults to `journal/` under the cwd.
    pub journal_dir: Option<PathBuf>,
}

/// Condensed outcome of one run.
#[derive(Debug)]
pub struct BatchSummary {
    pub total_files: usize,
    pub files_ok: usize,
    pub files_failed: usize,
    /// Original bytes across successfully processed files.
    pub bytes_processed: u64,
    pub journal_path: PathBuf,
    pub results: Vec<FileResult>,
}

/// Resolves the effective worker count: explicit request, then the
/// environment override, then hardware parallelism; clamped to
/// `1..=NB_WORKERS_MAX`.
pub fn resolve_nb_workers(requested: usize) -> usize {
    let n = if requested > 0 {
        requested
    } else {
        std::env::var(ENV_NBWORKERS)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or_else(count_cores)
    };
    n.clamp(1, NB_WORKERS_MAX)
}

/// Runs `chain` over every regular file under `input`, mirroring results
/// under `output`, and returns the aggregated summary.
///
/// Fails before any work when the input yields no regular files or the
/// journal cannot be created. Per-file codec failures do not fail the run;
/// they are recorded, journaled, and counted in the summary.
pub fn process_batch(
    input: &Path,
    output: &Path,
    chain: &ChainSpec,
    opts: &BatchOptions,
) -> anyhow::Result<BatchSummary> {
    let items = collect_work_items(input, output)
        .with_context(|| format!("cannot enumerate '{}'", input.display()))?;
    if items.is_empty() {
        bail!("no regular files to process under '{}'", input.display());
    }

    let srcs: Vec<&Path> = items.iter().map(|i| i.src.as_path()).collect();
    let total_size = get_total_file_size(&srcs);
    let total_files = items.len();

    let op_string = chain.op_string();
    let target_name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    let journal_dir = opts
        .journal_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(JOURNAL_DIR));
    let journal = Journal::create_in(&journal_dir, &op_string, &target_name)
        .context("cannot create journal file")?;
    journal.write_header(
        &op_string,
        &target_name,
        &input.display().to_string(),
        &output.display().to_string(),
        total_files,
        total_size,
    )?;

    let nb_workers = resolve_nb_workers(opts.nb_workers);
    crate::displaylevel!(3, "Using {} worker threads \n", nb_workers);
    let pool = WorkerPool::new(nb_workers, QUEUE_SLACK)
        .ok_or_else(|| anyhow!("cannot create worker pool ({} threads)", nb_workers))?;

    let journal = Arc::new(journal);
    let report = Arc::new(Report::new());
    let chain = Arc::new(chain.clone());

    for (index, item) in items.into_iter().enumerate() {
        let journal = Arc::clone(&journal);
        let report = Arc::clone(&report);
        let chain = Arc::clone(&chain);
        pool.submit_job(Box::new(move || {
            let separator = journal::file_separator(
                index + 1,
                total_files,
                &item.src.display().to_string(),
            );
            let outcome = pipeline::run_chain(&item, &chain);
            let block = format!("{}{}", separator, outcome.log_block);
            // Journal writes are best-effort once the run is underway; a
            // full disk must not abort sibling files.
            let _ = journal.log_block(&block);
            emit_console_block(&block);
            report.push(outcome.result);
        }));
    }

    pool.wait_until_idle();
    drop(pool);

    let files_ok = report.files_ok();
    let files_failed = report.files_failed();
    let bytes_processed = report.bytes_processed();
    let status = if files_failed == 0 {
        "OK"
    } else {
        "COMPLETED WITH ERRORS"
    };
    let _ = journal.write_summary(status, files_ok, bytes_processed);

    Ok(BatchSummary {
        total_files,
        files_ok,
        files_failed,
        bytes_processed,
        journal_path: journal.path().to_path_buf(),
        results: report.snapshot(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
