//! Command-line argument parsing for the `codecpipe` binary.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit testing).
//! Both return a [`ParsedArgs`] value; [`validate`] performs the post-parse
//! checks that must pass before any work starts.
//!
//! Grammar: the reserved forms `-i`, `-o`, `-k`, `--comp-alg`, `--enc-alg`,
//! `-T`/`--workers`, `--strict`, `-q`, `-v`, `-h`/`--help`, `-V`/`--version`
//! are consumed as options (long options accept both `--option VALUE` and
//! `--option=VALUE`). Any other token starting with `-` contributes its
//! suffix characters to the operation chain, so `-ce` and `-c -e` both
//! produce the chain `ce`; dashes inside such a token are ignored. A chain
//! character outside `{c, d, e, u}` is a usage error.
//!
//! Bad or unrecognised input returns an `Err` whose message begins with
//! `"bad usage: "`.

use std::path::PathBuf;

use anyhow::{anyhow, bail};

use crate::cli::help;
use crate::codec::{CompressionAlg, EncryptionAlg, OpCode};

/// Complete set of options produced by the argument-parsing loop.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    /// Input file or directory (`-i`).
    pub input: Option<PathBuf>,
    /// Output file or directory (`-o`).
    pub output: Option<PathBuf>,
    /// Compression selector (`--comp-alg`).
    pub comp_alg: Option<CompressionAlg>,
    /// Encryption selector (`--enc-alg`).
    pub enc_alg: Option<EncryptionAlg>,
    /// Key material (`-k`).
    pub key: Option<String>,
    /// Ordered operation chain accumulated from chain tokens.
    pub chain: Vec<OpCode>,
    /// Worker thread count (`-T`/`--workers`); 0 = auto.
    pub nb_workers: usize,
    /// Map per-file failures onto the exit code (`--strict`).
    pub strict: bool,
    /// When `true`, `--help`/`--version` was handled; the caller should exit 0.
    pub exit_early: bool,
}

/// Parses `std::env::args()` (skipping argv[0]).
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let exe_name = std::env::args().next().unwrap_or_else(|| "codecpipe".to_owned());
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&exe_name, &argv)
}

/// Parses an explicit argument list. `exe_name` is argv[0] (used for help
/// text); `argv` is argv[1..]. Callable from tests without touching
/// `std::env`.
pub fn parse_args_from(exe_name: &str, argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut args = ParsedArgs::default();

    let mut i = 0;
    while i < argv.len() {
        let arg = argv[i].as_str();
        match arg {
            "-i" => args.input = Some(PathBuf::from(option_value(argv, &mut i, "-i")?)),
            "-o" => args.output = Some(PathBuf::from(option_value(argv, &mut i, "-o")?)),
            "-k" => args.key = Some(option_value(argv, &mut i, "-k")?),
            "--comp-alg" => {
                let name = option_value(argv, &mut i, "--comp-alg")?;
                args.comp_alg = Some(parse_comp_alg(&name)?);
            }
            "--enc-alg" => {
                let name = option_value(argv, &mut i, "--enc-alg")?;
                args.enc_alg = Some(parse_enc_alg(&name)?);
            }
            "-T" | "--workers" => {
                let value = option_value(argv, &mut i, arg)?;
                args.nb_workers = parse_workers(&value)?;
            }
            "--strict" => args.strict = true,
            "-q" => {
                let level = crate::cli::constants::display_level();
                crate::cli::constants::set_display_level(level.saturating_sub(1));
            }
            "-v" => {
                let level = crate::cli::constants::display_level();
                crate::cli::constants::set_display_level(level + 1);
            }
            "-h" | "--help" => {
                help::print_help(exe_name);
                args.exit_early = true;
                return Ok(args);
            }
            "-V" | "--version" => {
                help::print_version();
                args.exit_early = true;
                return Ok(args);
            }
            _ => {
                if let Some(name) = arg.strip_prefix("--comp-alg=") {
                    args.comp_alg = Some(parse_comp_alg(name)?);
                } else if let Some(name) = arg.strip_prefix("--enc-alg=") {
                    args.enc_alg = Some(parse_enc_alg(name)?);
                } else if let Some(value) = arg.strip_prefix("--workers=") {
                    args.nb_workers = parse_workers(value)?;
                } else if let Some(suffix) = arg.strip_prefix('-') {
                    // Chain token: every non-dash character is an op code.
                    for c in suffix.chars() {
                        if c == '-' {
                            continue;
                        }
                        match OpCode::from_char(c) {
                            Some(op) => args.chain.push(op),
                            None => bail!("bad usage: unknown operation '{}' in '{}'", c, arg),
                        }
                    }
                } else {
                    bail!("bad usage: unexpected argument '{}'", arg);
                }
            }
        }
        i += 1;
    }

    Ok(args)
}

/// Post-parse validation; every failure here exits before any work begins.
pub fn validate(args: &ParsedArgs) -> anyhow::Result<()> {
    if args.input.is_none() {
        bail!("bad usage: input path required (-i PATH)");
    }
    if args.output.is_none() {
        bail!("bad usage: output path required (-o PATH)");
    }
    if args.chain.is_empty() {
        bail!("bad usage: no operations given (e.g. -ce)");
    }

    let has_compression = args
        .chain
        .iter()
        .any(|op| matches!(op, OpCode::Compress | OpCode::Decompress));
    if has_compression && args.comp_alg.is_none() {
        bail!("bad usage: --comp-alg is required for compression stages");
    }

    let has_cipher = args.chain.iter().any(|op| op.is_cipher());
    if has_cipher {
        if args.enc_alg.is_none() {
            bail!("bad usage: --enc-alg is required for cipher stages");
        }
        match args.key.as_deref() {
            None | Some("") => {
                bail!("bad usage: a non-empty key (-k STRING) is required for cipher stages")
            }
            Some(key) => {
                if args.chain.contains(&OpCode::Encrypt) {
                    check_key_strength(key)?;
                }
            }
        }
    }
    Ok(())
}

/// Minimal key-strength gate applied before encryption runs.
///
/// Keys shorter than 4 characters are rejected outright; keys shorter than 8
/// are accepted with a warning at the normal display level.
pub fn check_key_strength(key: &str) -> anyhow::Result<()> {
    if key.chars().count() < 4 {
        bail!("key rejected: shorter than 4 characters");
    }
    if key.chars().count() < 8 {
        crate::displaylevel!(2, "warning: key is shorter than 8 characters \n");
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

fn option_value(argv: &[String], i: &mut usize, flag: &str) -> anyhow::Result<String> {
    *i += 1;
    argv.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("bad usage: {} requires a value", flag))
}

fn parse_comp_alg(name: &str) -> anyhow::Result<CompressionAlg> {
    CompressionAlg::from_name(name)
        .ok_or_else(|| anyhow!("bad usage: unknown compression algorithm '{}'", name))
}

fn parse_enc_alg(name: &str) -> anyhow::Result<EncryptionAlg> {
    EncryptionAlg::from_name(name)
        .ok_or_else(|| anyhow!("bad usage: unknown encryption algorithm '{}'", name))
}

fn parse_workers(value: &str) -> anyhow::Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| anyhow!("bad usage: invalid worker count '{}'", value))
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
