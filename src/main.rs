//! Binary entry point for the `codecpipe` command-line tool.
//!
//! Control flow:
//!
//! 1. [`parse_args`] processes all flags and chain tokens into a
//!    [`ParsedArgs`] value.
//! 2. [`validate`] enforces the pre-work invariants (paths present, chain
//!    non-empty, selectors and key material consistent with the chain, key
//!    strength for encryption).
//! 3. [`run`] dispatches to the batch executor and maps the summary onto the
//!    process exit code.
//!
//! Exit codes: 0 on success, 1 on configuration errors and policy-gate
//! failures. Per-file codec failures leave the exit code at 0 unless
//! `--strict` was given.

use codecpipe::batch::{process_batch, BatchOptions};
use codecpipe::cli::args::{parse_args, validate, ParsedArgs};
use codecpipe::cli::help::print_usage;
use codecpipe::displaylevel;
use codecpipe::pipeline::ChainSpec;

/// Execute the run described by the parsed arguments.
///
/// Returns the process exit code.
fn run(args: ParsedArgs) -> i32 {
    // Presence of both paths is guaranteed by `validate`.
    let (input, output) = match (&args.input, &args.output) {
        (Some(i), Some(o)) => (i.clone(), o.clone()),
        _ => return 1,
    };

    let chain = ChainSpec {
        ops: args.chain,
        compression: args.comp_alg,
        encryption: args.enc_alg,
        key: args.key,
    };
    let opts = BatchOptions {
        nb_workers: args.nb_workers,
        strict: args.strict,
        journal_dir: None,
    };

    match process_batch(&input, &output, &chain, &opts) {
        Ok(summary) => {
            displaylevel!(
                2,
                "{} of {} files processed ({} bytes), journal: {}\n",
                summary.files_ok,
                summary.total_files,
                summary.bytes_processed,
                summary.journal_path.display()
            );
            if summary.files_failed > 0 {
                displaylevel!(1, "{} files failed; see the journal\n", summary.files_failed);
                if opts.strict {
                    return 1;
                }
            }
            0
        }
        Err(err) => {
            displaylevel!(1, "codecpipe: {:#}\n", err);
            1
        }
    }
}

fn main() {
    let exe_name = std::env::args().next().unwrap_or_else(|| "codecpipe".to_owned());

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("codecpipe: {}", e);
            print_usage(&exe_name);
            std::process::exit(1);
        }
    };

    // --help / --version already produced their output.
    if args.exit_early {
        std::process::exit(0);
    }

    if let Err(e) = validate(&args) {
        eprintln!("codecpipe: {}", e);
        print_usage(&exe_name);
        std::process::exit(1);
    }

    std::process::exit(run(args));
}
