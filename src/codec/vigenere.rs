//! Byte-level Vigenère cipher over the ASCII-letter alphabet.
//!
//! Each input byte in `A..=Z` or `a..=z` is shifted by the value of the
//! current key character modulo 26, preserving case; the key index advances
//! only when a letter is transformed. Every other byte passes through
//! unchanged without consuming key material, so interleaved punctuation and
//! binary data never desynchronise the key stream between encryption and
//! decryption.
//!
//! Output size always equals input size.

use std::io::Write;
use std::path::Path;

use crate::codec::{CodecError, Result};
use crate::config::IO_BUFFER_SIZE;
use crate::io::{create_dst_file, open_src_file, read_to_capacity};

/// Maps a key character to a shift in 0..=25.
///
/// `A..=Z` and `a..=z` map uniformly; any other character maps to 0.
#[inline]
fn key_value(c: u8) -> u8 {
    match c {
        b'A'..=b'Z' => c - b'A',
        b'a'..=b'z' => c - b'a',
        _ => 0,
    }
}

fn transform(input: &Path, output: &Path, key: &str, forward: bool) -> Result<()> {
    if key.is_empty() {
        return Err(CodecError::EmptyKey);
    }
    let key = key.as_bytes();

    let mut reader = open_src_file(input)?;
    let mut writer = create_dst_file(output)?;

    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    let mut key_idx: usize = 0;

    loop {
        let n = read_to_capacity(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        for b in &mut buf[..n] {
            let base = match *b {
                b'A'..=b'Z' => b'A',
                b'a'..=b'z' => b'a',
                _ => continue,
            };
            let k = key_value(key[key_idx % key.len()]);
            key_idx += 1;
            let offset = if forward {
                (*b - base + k) % 26
            } else {
                (*b - base + 26 - k) % 26
            };
            *b = base + offset;
        }
        writer.write_all(&buf[..n])?;
    }
    writer.flush()?;
    Ok(())
}

/// Vigenère-encrypts `input` into `output` with `key`.
pub fn encrypt(input: &Path, output: &Path, key: &str) -> Result<()> {
    transform(input, output, key, true)
}

/// Vigenère-decrypts `input` into `output` with `key`.
pub fn decrypt(input: &Path, output: &Path, key: &str) -> Result<()> {
    transform(input, output, key, false)
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(data: &[u8], key: &str, forward: bool) -> Vec<u8> {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, data).unwrap();
        if forward {
            encrypt(&src, &dst, key).unwrap();
        } else {
            decrypt(&src, &dst, key).unwrap();
        }
        fs::read(&dst).unwrap()
    }

    #[test]
    fn hello_world_with_key_key() {
        let ciphertext = run(b"Hello, World!", "Key", true);
        assert_eq!(ciphertext, b"Rijvs, Uyvjn!");
        let plaintext = run(&ciphertext, "Key", false);
        assert_eq!(plaintext, b"Hello, World!");
    }

    #[test]
    fn non_letters_pass_through_and_hold_the_key_index() {
        // 'a' consumes key[0] = 'b' (shift 1); the space consumes nothing;
        // 'b' consumes key[1] = 'c' (shift 2).
        assert_eq!(run(b"a b", "bc", true), b"b d");
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(run(b"AbC", "b", true), b"BcD");
    }

    #[test]
    fn key_case_and_non_letter_key_chars() {
        // 'B' and 'b' are the same shift; a digit in the key is shift 0.
        assert_eq!(run(b"aa", "Bb", true), run(b"aa", "bB", true));
        assert_eq!(run(b"abc", "9", true), b"abc");
    }

    #[test]
    fn output_size_equals_input_size() {
        let data: Vec<u8> = (0u16..=255).map(|b| b as u8).collect();
        let out = run(&data, "secret", true);
        assert_eq!(out.len(), data.len());
        // Round-trips even with binary bytes interleaved.
        assert_eq!(run(&out, "secret", false), data);
    }

    #[test]
    fn empty_input() {
        assert!(run(b"", "k", true).is_empty());
    }

    #[test]
    fn empty_key_fails() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::write(&src, b"data").unwrap();
        let err = encrypt(&src, &dir.path().join("dst"), "").unwrap_err();
        assert!(matches!(err, CodecError::EmptyKey));
        let err = decrypt(&src, &dir.path().join("dst"), "").unwrap_err();
        assert!(matches!(err, CodecError::EmptyKey));
    }

    #[test]
    fn wrapping_shift() {
        // 'z' + 1 wraps to 'a'; 'Z' + 1 wraps to 'A'.
        assert_eq!(run(b"zZ", "bb", true), b"aA");
        assert_eq!(run(b"aA", "bb", false), b"zZ");
    }
}
