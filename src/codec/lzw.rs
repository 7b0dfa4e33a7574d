//! LZW codec with fixed 16-bit codes.
//!
//! Container: a dense sequence of `u16` codes in little-endian order.
//!
//! The dictionary is seeded with entries 0..=255 mapping each byte to its
//! one-byte string; the first free code is 256. The code width is fixed at
//! 16 bits, and once code 65535 has been assigned the dictionary is frozen;
//! it is never reset, so long inputs keep encoding with the frozen table.
//!
//! The decoder mirrors the encoder, including the classic `code == next_code`
//! case (emit the previous entry followed by its own first byte). A code
//! strictly greater than the next free code cannot have been produced by the
//! encoder and aborts decoding with the output as produced so far.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::codec::{CodecError, Result};
use crate::config::IO_BUFFER_SIZE;
use crate::io::{create_dst_file, open_src_file, read_to_capacity};

/// Highest assignable dictionary code; the dictionary freezes once assigned.
const MAX_CODE: u32 = u16::MAX as u32;

/// LZW-encodes `input` into `output`.
pub fn compress(input: &Path, output: &Path) -> Result<()> {
    let mut reader = open_src_file(input)?;
    let mut writer = create_dst_file(output)?;

    // (prefix code, extension byte) → code of the extended string.
    let mut dict: HashMap<(u16, u8), u16> = HashMap::new();
    let mut next_code: u32 = 256;

    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    // Code of the working prefix; None until the first byte is read.
    let mut w: Option<u16> = None;

    loop {
        let n = read_to_capacity(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        for &c in &buf[..n] {
            w = match w {
                None => Some(c as u16),
                Some(prefix) => match dict.get(&(prefix, c)) {
                    Some(&extended) => Some(extended),
                    None => {
                        writer.write_all(&prefix.to_le_bytes())?;
                        if next_code <= MAX_CODE {
                            dict.insert((prefix, c), next_code as u16);
                            next_code += 1;
                        }
                        Some(c as u16)
                    }
                },
            };
        }
    }

    if let Some(prefix) = w {
        writer.write_all(&prefix.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Decodes an LZW stream from `input` into `output`.
///
/// An odd trailing byte or a code beyond the next free dictionary slot is
/// reported as [`CodecError::Corrupt`]; everything decoded up to that point
/// is retained in the output.
pub fn decompress(input: &Path, output: &Path) -> Result<()> {
    let mut reader = open_src_file(input)?;
    let mut writer = create_dst_file(output)?;

    // Dictionary as an arena of byte strings; index == code.
    let mut entries: Vec<Vec<u8>> = (0u16..=255).map(|b| vec![b as u8]).collect();
    let mut prev: Option<u16> = None;

    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    // A lone byte carried across read-buffer boundaries (codes are 2 bytes).
    let mut carry: Option<u8> = None;

    loop {
        let n = read_to_capacity(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        let mut pos = 0;
        while pos < n {
            let code = match carry.take() {
                Some(lo) => {
                    let hi = buf[pos];
                    pos += 1;
                    u16::from_le_bytes([lo, hi])
                }
                None => {
                    if pos + 1 >= n {
                        carry = Some(buf[pos]);
                        break;
                    }
                    let code = u16::from_le_bytes([buf[pos], buf[pos + 1]]);
                    pos += 2;
                    code
                }
            };

            match prev {
                None => {
                    // The first code of a stream is always a literal.
                    if code > 255 {
                        writer.flush()?;
                        return Err(CodecError::Corrupt("leading code is not a literal"));
                    }
                    writer.write_all(&entries[code as usize])?;
                }
                Some(p) => {
                    let cur: Vec<u8> = if (code as usize) < entries.len() {
                        entries[code as usize].clone()
                    } else if code as usize == entries.len() {
                        // code == next_code: the entry being defined right
                        // now, i.e. the previous string plus its first byte.
                        let p_entry = &entries[p as usize];
                        let mut e = p_entry.clone();
                        e.push(p_entry[0]);
                        e
                    } else {
                        writer.flush()?;
                        return Err(CodecError::Corrupt("code beyond dictionary"));
                    };
                    writer.write_all(&cur)?;
                    if entries.len() as u32 <= MAX_CODE {
                        let mut e = entries[p as usize].clone();
                        e.push(cur[0]);
                        entries.push(e);
                    }
                }
            }
            prev = Some(code);
        }
    }

    if carry.is_some() {
        writer.flush()?;
        return Err(CodecError::Corrupt("odd trailing byte"));
    }
    writer.flush()?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
