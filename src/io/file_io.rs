//! File I/O primitives for the codec pipeline.
//!
//! This module provides the byte-level entry points shared by every codec:
//!
//! - [`open_src_file`] — opens a path for buffered sequential reads,
//!   rejecting directories.
//! - [`create_dst_file`] — truncate-creates the destination for buffered
//!   sequential writes.
//! - [`read_to_capacity`] — fills a buffer from a reader, looping over
//!   partial reads until the buffer is full or EOF is reached.
//!
//! Kernel-level reads and writes may transfer fewer bytes than requested for
//! large buffers; callers must loop until the intended count is transferred
//! or an error is observed. `read_to_capacity` and `Write::write_all` embody
//! that loop on the two sides.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::Path;

/// Opens a source file for reading, wrapped in a [`BufReader`] for efficient
/// sequential access.
///
/// Directories are rejected with [`io::ErrorKind::InvalidInput`] so a codec
/// never attempts byte reads on a directory handle.
pub fn open_src_file(path: &Path) -> io::Result<BufReader<File>> {
    if path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path.display()),
        ));
    }
    let f = File::open(path)?;
    Ok(BufReader::new(f))
}

/// Truncate-creates the destination file for writing, wrapped in a
/// [`BufWriter`].
///
/// An existing file at `path` is truncated to zero length; a missing file is
/// created with default permissions.
pub fn create_dst_file(path: &Path) -> io::Result<BufWriter<File>> {
    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(BufWriter::new(f))
}

/// Fills `buf` from `reader`, looping over partial reads.
///
/// Returns the number of bytes placed in `buf`; a value smaller than
/// `buf.len()` means EOF was reached. `ErrorKind::Interrupted` is retried.
pub fn read_to_capacity(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
