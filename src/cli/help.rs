//! Help, usage, and version text for the `codecpipe` CLI.

use crate::cli::constants::{PROGRAM_NAME, VERSION_STRING};
use crate::{display, displayout};

/// One-line usage synopsis, written to stderr.
pub fn print_usage(exe_name: &str) {
    display!(
        "Usage: {} -<operations> -i INPUT -o OUTPUT [options]\n",
        exe_name
    );
    display!("Try `{} --help` for more information.\n", exe_name);
}

/// Full option listing, written to stdout.
pub fn print_help(exe_name: &str) {
    displayout!("{} v{}\n", PROGRAM_NAME, VERSION_STRING);
    displayout!(
        "Applies an ordered chain of codec operations to a file or to every\n\
         regular file of a directory tree, in parallel, mirroring the input\n\
         structure under the output root and writing a per-run journal.\n\n"
    );
    displayout!("Usage: {} -<operations> -i INPUT -o OUTPUT [options]\n\n", exe_name);
    displayout!("Operations (combined or separate, e.g. -ce or -c -e):\n");
    displayout!("  c   compress with the selected compression algorithm\n");
    displayout!("  d   decompress with the selected compression algorithm\n");
    displayout!("  e   encrypt with the selected encryption algorithm\n");
    displayout!("  u   decrypt with the selected encryption algorithm\n\n");
    displayout!("Options:\n");
    displayout!("  -i PATH           input file or directory (required)\n");
    displayout!("  -o PATH           output file or directory (required)\n");
    displayout!("  --comp-alg NAME   compression algorithm: RLE, LZW, Huff, Huffman\n");
    displayout!("  --enc-alg NAME    encryption algorithm: VIG, Vigenere, AES, AES128, AES-128\n");
    displayout!("  -k STRING         key material for cipher operations\n");
    displayout!("  -T, --workers N   worker threads (default: hardware parallelism)\n");
    displayout!("  --strict          exit non-zero when any file fails\n");
    displayout!("  -q                decrease verbosity\n");
    displayout!("  -v                increase verbosity\n");
    displayout!("  -h, --help        print this help and exit\n");
    displayout!("  -V, --version     print the version and exit\n\n");
    displayout!("Journals are written under journal/ in the current directory.\n");
}

/// Version banner, written to stdout.
pub fn print_version() {
    displayout!("{} v{}\n", PROGRAM_NAME, VERSION_STRING);
}
