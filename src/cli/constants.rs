//! CLI constants, globals, and display macros.
//!
//! This module centralises the values and shared mutable state needed across
//! the CLI layer:
//!
//! - Identity strings (`PROGRAM_NAME`, `VERSION_STRING`)
//! - Binary size multipliers (`KB`, `MB`, `GB`)
//! - The verbosity level used by [`displaylevel!`] and friends
//! - The [`displayout!`], [`display!`] and [`displaylevel!`] output macros
//!   used throughout the CLI

use std::sync::atomic::{AtomicU32, Ordering};

// ── Identity strings ────────────────────────────────────────────────────────
/// Program name, reported in `--version` output and usage text.
pub const PROGRAM_NAME: &str = "codecpipe";
/// Program version reported by `--version`.
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

// ── Binary size multipliers ─────────────────────────────────────────────────
/// 1 KiB (1 024 bytes).
pub const KB: u64 = 1 << 10;
/// 1 MiB (1 048 576 bytes).
pub const MB: u64 = 1 << 20;
/// 1 GiB (1 073 741 824 bytes).
pub const GB: u64 = 1 << 30;

// ── Verbosity level ──────────────────────────────────────────────────────────
//
// Controls how much output the CLI produces.  Semantics:
//   0 — completely silent
//   1 — errors only
//   2 — normal informational output (default; can be suppressed with -q)
//   3 — non-suppressible informational messages
//   4 — verbose / diagnostic
//
// Stored as a process-wide atomic so it is accessible from any module without
// threading through a context struct.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current verbosity level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the verbosity level.  Values outside 0–4 are accepted but have no
/// additional effect beyond level 4.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

// ── Output macros ────────────────────────────────────────────────────────────
//
// Three tiers of CLI output:
//   displayout!  — output that belongs on stdout
//   display!     — diagnostic output that always goes to stderr
//   displaylevel! — conditional stderr output gated on the current verbosity level

/// Write a formatted message to **stdout**.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Write a formatted message to **stderr** unconditionally.
///
/// Prefer [`displaylevel!`] when the message should be suppressible.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Write a formatted message to **stderr** if the current verbosity level is
/// at least `level`.
///
/// | `level` | meaning |
/// |---------|----------------------------|
/// | 1       | errors only |
/// | 2       | normal (default) |
/// | 3       | non-suppressible info |
/// | 4       | verbose / diagnostic |
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
