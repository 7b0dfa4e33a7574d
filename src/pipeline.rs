//! Per-file pipeline engine.
//!
//! Executes one operation chain against one work item. Every stage except the
//! last writes to a unique temporary file next to the destination; the final
//! stage writes the destination itself. Temporaries are removed on every exit
//! path by a scope guard, per-stage wall-clock time is accumulated, and the
//! outcome is condensed into one [`FileResult`] plus a pre-formatted log
//! block the caller flushes atomically to the journal and console.
//!
//! Temporary names embed both the stage index and an XXH32 hash of the
//! source path (`<dest>.tmp.<index>.<hash>`), so concurrent workers writing
//! into the same output directory can never collide.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use xxhash_rust::xxh32::xxh32;

use crate::codec::{self, CodecError, CompressionAlg, EncryptionAlg, OpCode};
use crate::report::{FileResult, FileStatus};
use crate::util::{get_file_size, WorkItem};

// ─────────────────────────────────────────────────────────────────────────────
// Chain specification
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the pipeline needs to run one chain: the ordered operations,
/// the two algorithm selectors, and optional key material.
///
/// Selectors apply to every occurrence of their operation class; `ce` with
/// RLE + AES compresses with RLE and then encrypts with AES.
#[derive(Debug, Clone)]
pub struct ChainSpec {
    pub ops: Vec<OpCode>,
    pub compression: Option<CompressionAlg>,
    pub encryption: Option<EncryptionAlg>,
    pub key: Option<String>,
}

impl ChainSpec {
    /// The chain as its character string, e.g. `ce`.
    pub fn op_string(&self) -> String {
        self.ops.iter().map(|op| op.as_char()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure of a single stage, recorded into the per-file result.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A `c`/`d` stage ran without a compression algorithm selected.
    #[error("no compression algorithm selected")]
    MissingCompressionAlg,
    /// An `e`/`u` stage ran without an encryption algorithm selected.
    #[error("no encryption algorithm selected")]
    MissingEncryptionAlg,
}

// ─────────────────────────────────────────────────────────────────────────────
// Temporary-file scope guard
// ─────────────────────────────────────────────────────────────────────────────

/// Removes every registered path on drop, best-effort.
///
/// Owned by the worker running the pipeline; cleanup therefore happens on the
/// same thread that created the files, on success and failure alike.
struct TempGuard {
    files: Vec<PathBuf>,
}

impl TempGuard {
    fn new() -> Self {
        TempGuard { files: Vec::new() }
    }

    fn register(&mut self, path: PathBuf) {
        self.files.push(path);
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        for path in &self.files {
            let _ = fs::remove_file(path);
        }
    }
}

/// Path of the intermediate file written by stage `index`.
fn stage_temp_path(dest: &Path, index: usize, src: &Path) -> PathBuf {
    let hash = xxh32(src.to_string_lossy().as_bytes(), 0);
    let mut name = dest.as_os_str().to_owned();
    name.push(format!(".tmp.{}.{:08x}", index, hash));
    PathBuf::from(name)
}

// ─────────────────────────────────────────────────────────────────────────────
// Execution
// ─────────────────────────────────────────────────────────────────────────────

/// Result record plus the per-file log block rendered during execution.
pub struct PipelineOutcome {
    pub result: FileResult,
    /// Timestamped stage lines and the completion marker; ends with `\n`.
    pub log_block: String,
}

fn push_log_line(block: &mut String, message: &str) {
    let _ = writeln!(
        block,
        "[{}] {}",
        Local::now().format("%H:%M:%S"),
        message
    );
}

fn dispatch(op: OpCode, chain: &ChainSpec, input: &Path, output: &Path) -> Result<(), StageError> {
    match op {
        OpCode::Compress => {
            let alg = chain.compression.ok_or(StageError::MissingCompressionAlg)?;
            codec::compress(alg, input, output)?;
        }
        OpCode::Decompress => {
            let alg = chain.compression.ok_or(StageError::MissingCompressionAlg)?;
            codec::decompress(alg, input, output)?;
        }
        OpCode::Encrypt => {
            let alg = chain.encryption.ok_or(StageError::MissingEncryptionAlg)?;
            let key = chain.key.as_deref().unwrap_or("");
            codec::encrypt(alg, input, output, key)?;
        }
        OpCode::Decrypt => {
            let alg = chain.encryption.ok_or(StageError::MissingEncryptionAlg)?;
            let key = chain.key.as_deref().unwrap_or("");
            codec::decrypt(alg, input, output, key)?;
        }
    }
    Ok(())
}

/// Human-readable stage description for log lines, e.g. `compress (RLE)`.
fn stage_label(op: OpCode, chain: &ChainSpec) -> String {
    let alg = match op {
        OpCode::Compress | OpCode::Decompress => chain.compression.map(CompressionAlg::name),
        OpCode::Encrypt | OpCode::Decrypt => chain.encryption.map(EncryptionAlg::name),
    };
    match alg {
        Some(name) => format!("{} ({})", op.label(), name),
        None => op.label().to_owned(),
    }
}

/// Runs the whole chain for one work item.
///
/// Stages execute in declared order on the calling thread. The output of
/// stage *i* feeds stage *i + 1*; the final stage writes `item.dst`. On any
/// stage failure the remaining stages are skipped, temporaries are removed,
/// and a failure record is returned; siblings in the same run are
/// unaffected. This function never panics on codec errors and acquires no
/// locks, so callers may invoke it from pool workers freely.
pub fn run_chain(item: &WorkItem, chain: &ChainSpec) -> PipelineOutcome {
    let filename = item.src.display().to_string();
    let original_size = get_file_size(&item.src);

    let mut block = String::new();
    push_log_line(
        &mut block,
        &format!("Processing: {} ({} bytes)", filename, original_size),
    );

    let mut temps = TempGuard::new();
    let mut current = item.src.clone();
    let mut elapsed_ms: u64 = 0;

    let last_index = chain.ops.len().saturating_sub(1);
    for (index, &op) in chain.ops.iter().enumerate() {
        let is_last = index == last_index;
        let stage_output = if is_last {
            item.dst.clone()
        } else {
            stage_temp_path(&item.dst, index, &item.src)
        };

        let started = Instant::now();
        let outcome = dispatch(op, chain, &current, &stage_output);
        let stage_ms = started.elapsed().as_millis() as u64;
        elapsed_ms += stage_ms;

        match outcome {
            Ok(()) => {
                push_log_line(
                    &mut block,
                    &format!(
                        "Stage {}/{}: {} -> {} ({} ms)",
                        index + 1,
                        chain.ops.len(),
                        stage_label(op, chain),
                        stage_output.display(),
                        stage_ms
                    ),
                );
            }
            Err(err) => {
                let message = format!("{}: {}", stage_label(op, chain), err);
                push_log_line(&mut block, &format!("FAILED: {}", message));
                push_log_line(&mut block, "Completed: FAILED");
                // TempGuard removes the intermediates on return.
                return PipelineOutcome {
                    result: FileResult {
                        filename,
                        original_size,
                        final_size: get_file_size(&item.dst),
                        ratio_percent: 0.0,
                        elapsed_ms,
                        status: FileStatus::Failed(message),
                    },
                    log_block: block,
                };
            }
        }

        if !is_last {
            temps.register(stage_output.clone());
            current = stage_output;
        }
    }

    let final_size = get_file_size(&item.dst);
    let ratio_percent = FileResult::ratio(original_size, final_size);
    push_log_line(
        &mut block,
        &format!(
            "Completed: OK ({} -> {} bytes, {:.2}%, {} ms)",
            original_size, final_size, ratio_percent, elapsed_ms
        ),
    );

    PipelineOutcome {
        result: FileResult {
            filename,
            original_size,
            final_size,
            ratio_percent,
            elapsed_ms,
            status: FileStatus::Ok,
        },
        log_block: block,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
