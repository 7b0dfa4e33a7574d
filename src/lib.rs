//! `codecpipe` — a batch file-transformation utility that applies an ordered
//! chain of codec operations (compress, decompress, encrypt, decrypt) to a
//! single file or to every regular file of a directory tree, in parallel,
//! producing a mirrored output tree and a per-run journal.
//!
//! # Crate layout
//!
//! | Module       | Contents |
//! |--------------|----------|
//! | `codec`      | Byte-exact codecs: RLE, LZW-16, static Huffman, Vigenère, AES-128-CBC. |
//! | `pipeline`   | Per-file chain execution through ephemeral temp files. |
//! | `batch`      | Run orchestration: work list, journal, worker pool, summary. |
//! | `threadpool` | Fixed-size worker pool with bounded submit and idle wait. |
//! | `journal`    | Append-only per-run log with atomic per-file blocks. |
//! | `report`     | Per-file result records, run collector, console sink. |
//! | `io`         | Byte I/O primitives shared by the codecs. |
//! | `util`       | Directory walking, file sizing, core counting. |
//! | `cli`        | Argument parsing, validation, help text, display macros. |
//! | `config`     | Compile-time defaults. |

pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod io;
pub mod journal;
pub mod pipeline;
pub mod report;
pub mod threadpool;
pub mod util;

// ── Top-level re-exports ──────────────────────────────────────────────────────

pub use batch::{process_batch, BatchOptions, BatchSummary};
pub use codec::{CodecError, CompressionAlg, EncryptionAlg, OpCode};
pub use journal::Journal;
pub use pipeline::{run_chain, ChainSpec};
pub use report::{FileResult, FileStatus, Report};
pub use threadpool::WorkerPool;
pub use util::WorkItem;
