//! File enumeration and sizing utilities shared by the pipeline and driver.
//!
//! Submodules:
//! - [`cores`]     — CPU core counting for worker-pool sizing
//! - [`file_size`] — path-based size queries (`0` on failure)
//! - [`work_list`] — directory traversal producing mirrored (src, dst) pairs

pub mod cores;
pub mod file_size;
pub mod work_list;

// ── Re-exports at `util::` level ─────────────────────────────────────────────

pub use cores::count_cores;
pub use file_size::{get_file_size, get_total_file_size};
pub use work_list::{collect_work_items, ensure_directory_exists, WorkItem};
