//! Compile-time configuration constants for the `codecpipe` programs layer.
//!
//! These constants govern defaults for worker-pool sizing, codec streaming
//! buffers, and on-disk naming.  Most can be overridden at runtime via CLI
//! flags or environment variables; see the individual constants for details.

/// Default number of worker threads when hardware parallelism cannot be
/// determined (the platform reports zero cores).
pub const NB_WORKERS_DEFAULT: usize = 4;

/// Hard upper bound on the number of worker threads.
///
/// Requests exceeding this value are silently clamped.
pub const NB_WORKERS_MAX: usize = 200;

/// Name of the environment variable that overrides the default worker count.
///
/// Ignored when `--workers` / `-T` is given explicitly.
pub const ENV_NBWORKERS: &str = "CODECPIPE_NBWORKERS";

/// Streaming buffer size used by the codecs for file reads and writes (64 KiB).
///
/// Codecs never hold more than a few of these in flight per worker, so peak
/// memory stays bounded regardless of input size.
pub const IO_BUFFER_SIZE: usize = 64 * 1024;

/// Subdirectory of the current working directory that receives journal files.
pub const JOURNAL_DIR: &str = "journal";

/// Maximum length of the sanitised target name embedded in a journal filename.
pub const JOURNAL_NAME_MAX: usize = 50;

/// Extra queue capacity of the worker pool beyond the worker count.
///
/// Submitting more tasks than `workers + QUEUE_SLACK` blocks the submitter
/// until a slot frees up, which bounds the number of buffered closures for
/// very large directory trees.
pub const QUEUE_SLACK: usize = 64;
