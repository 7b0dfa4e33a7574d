//! Command-line interface for the `codecpipe` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, size multipliers, and the shared `DISPLAY_LEVEL` atomic with its output macros. |
//! | [`help`]      | Usage, long help, and version printers. |
//! | [`args`]      | `ParsedArgs` — the argument-parsing loop plus post-parse validation and the key-strength gate. |
//!
//! Typical call sequence: `args::parse_args` → `args::validate` → dispatch to
//! [`crate::batch::process_batch`].

pub mod args;
pub mod constants;
pub mod help;
