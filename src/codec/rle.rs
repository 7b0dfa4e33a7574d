//! Run-length codec.
//!
//! Container: a concatenation of `(count: i32 little-endian, value: u8)`
//! pairs. The encoder emits a new pair whenever the current byte differs from
//! the previous one, or at EOF; `count` is the run length, minimum 1. Empty
//! input produces empty output.
//!
//! The count is always written little-endian so encoded files round-trip
//! across hosts of different endianness. A run longer than `i32::MAX` is
//! split across consecutive pairs, which decodes identically.

use std::io::Write;
use std::path::Path;

use crate::codec::{CodecError, Result};
use crate::config::IO_BUFFER_SIZE;
use crate::io::{create_dst_file, open_src_file, read_to_capacity};

/// Size in bytes of one encoded `(count, value)` pair.
pub const PAIR_SIZE: usize = 5;

fn write_pair(writer: &mut dyn Write, count: i32, value: u8) -> Result<()> {
    writer.write_all(&count.to_le_bytes())?;
    writer.write_all(&[value])?;
    Ok(())
}

/// Run-length encodes `input` into `output`.
pub fn compress(input: &Path, output: &Path) -> Result<()> {
    let mut reader = open_src_file(input)?;
    let mut writer = create_dst_file(output)?;

    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    // Current run, if any: (value, length so far).
    let mut run: Option<(u8, i32)> = None;

    loop {
        let n = read_to_capacity(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        for &b in &buf[..n] {
            run = match run {
                Some((value, count)) if value == b && count < i32::MAX => {
                    Some((value, count + 1))
                }
                Some((value, count)) => {
                    write_pair(&mut writer, count, value)?;
                    Some((b, 1))
                }
                None => Some((b, 1)),
            };
        }
    }

    if let Some((value, count)) = run {
        write_pair(&mut writer, count, value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Decodes a run-length stream from `input` into `output`.
///
/// A trailing fragment shorter than one pair, or a non-positive count, is
/// reported as [`CodecError::Corrupt`]; pairs decoded before the corruption
/// are retained in the output.
pub fn decompress(input: &Path, output: &Path) -> Result<()> {
    let mut reader = open_src_file(input)?;
    let mut writer = create_dst_file(output)?;

    let mut pair = [0u8; PAIR_SIZE];
    let mut fill = vec![0u8; IO_BUFFER_SIZE];

    loop {
        let n = read_to_capacity(&mut reader, &mut pair)?;
        if n == 0 {
            break;
        }
        if n < PAIR_SIZE {
            writer.flush()?;
            return Err(CodecError::Corrupt("truncated run pair"));
        }
        let count = i32::from_le_bytes([pair[0], pair[1], pair[2], pair[3]]);
        if count <= 0 {
            writer.flush()?;
            return Err(CodecError::Corrupt("non-positive run length"));
        }
        let value = pair[4];

        let mut remaining = count as usize;
        while remaining > 0 {
            let chunk = remaining.min(fill.len());
            fill[..chunk].fill(value);
            writer.write_all(&fill[..chunk])?;
            remaining -= chunk;
        }
    }
    writer.flush()?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
