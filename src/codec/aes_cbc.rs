//! AES-128-CBC file cipher with PKCS#7 padding.
//!
//! Container: `[IV: 16 bytes][ciphertext: multiple of 16 bytes]`. The IV is
//! sampled fresh from the operating system's CSPRNG on every encryption, so
//! identical plaintext and key never produce identical ciphertext. If the
//! random source is unavailable the call fails; there is no deterministic
//! fallback.
//!
//! Chaining: `C₀ = AES(P₀ ⊕ IV)`, `Cᵢ = AES(Pᵢ ⊕ Cᵢ₋₁)`. Padding is PKCS#7:
//! the final block carries `p` bytes of value `p` with `p ∈ [1..16]`; input
//! that is already block-aligned gains a full block of `0x10`. Decryption
//! validates the padding and strips it.
//!
//! Streaming discipline: encryption retains at most 15 buffered plaintext
//! bytes between reads; decryption holds back one decrypted block so padding
//! handling can be deferred to the final block.

use std::io::Write;
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::codec::aes128::{normalize_key, Aes128, BLOCK_SIZE};
use crate::codec::{CodecError, Result};
use crate::config::IO_BUFFER_SIZE;
use crate::io::{create_dst_file, open_src_file, read_to_capacity};

#[inline]
fn xor_block(dst: &mut [u8; BLOCK_SIZE], src: &[u8; BLOCK_SIZE]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Encrypts `input` into `output` under AES-128-CBC with `key`.
///
/// The key is normalised to 16 bytes by cyclic repetition (see
/// [`normalize_key`]); an empty key is rejected. Output length is
/// `16 + (⌊n/16⌋ + 1) · 16` for an `n`-byte input.
pub fn encrypt(input: &Path, output: &Path, key: &str) -> Result<()> {
    let key16 = normalize_key(key.as_bytes()).ok_or(CodecError::EmptyKey)?;
    let cipher = Aes128::new(&key16);

    let mut iv = [0u8; BLOCK_SIZE];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(CodecError::RngUnavailable)?;

    let mut reader = open_src_file(input)?;
    let mut writer = create_dst_file(output)?;
    writer.write_all(&iv)?;

    let mut prev = iv;
    // Plaintext bytes carried across reads; always < BLOCK_SIZE.
    let mut pending = [0u8; BLOCK_SIZE];
    let mut pending_len: usize = 0;

    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    loop {
        let n = read_to_capacity(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        let mut pos = 0;
        // Top up the carried fragment first.
        if pending_len > 0 {
            let take = (BLOCK_SIZE - pending_len).min(n);
            pending[pending_len..pending_len + take].copy_from_slice(&buf[..take]);
            pending_len += take;
            pos = take;
            if pending_len == BLOCK_SIZE {
                let mut block = pending;
                xor_block(&mut block, &prev);
                cipher.encrypt_block(&mut block);
                writer.write_all(&block)?;
                prev = block;
                pending_len = 0;
            }
        }
        // Whole blocks straight from the read buffer.
        while pos + BLOCK_SIZE <= n {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(&buf[pos..pos + BLOCK_SIZE]);
            xor_block(&mut block, &prev);
            cipher.encrypt_block(&mut block);
            writer.write_all(&block)?;
            prev = block;
            pos += BLOCK_SIZE;
        }
        // Stash the tail fragment.
        if pos < n {
            pending[..n - pos].copy_from_slice(&buf[pos..n]);
            pending_len = n - pos;
        }
    }

    // Final block: PKCS#7 pad. Block-aligned input gains a full pad block.
    let pad = (BLOCK_SIZE - pending_len) as u8;
    let mut block = pending;
    for slot in block.iter_mut().skip(pending_len) {
        *slot = pad;
    }
    xor_block(&mut block, &prev);
    cipher.encrypt_block(&mut block);
    writer.write_all(&block)?;
    writer.flush()?;
    Ok(())
}

/// Decrypts an AES-128-CBC container from `input` into `output` with `key`.
///
/// Fails with [`CodecError::Corrupt`] when the container is shorter than the
/// IV plus one block or not block-aligned, and with
/// [`CodecError::BadPadding`] when the final block does not carry valid
/// PKCS#7 padding.
pub fn decrypt(input: &Path, output: &Path, key: &str) -> Result<()> {
    let key16 = normalize_key(key.as_bytes()).ok_or(CodecError::EmptyKey)?;
    let cipher = Aes128::new(&key16);

    let mut reader = open_src_file(input)?;

    let mut iv = [0u8; BLOCK_SIZE];
    let n = read_to_capacity(&mut reader, &mut iv)?;
    if n < BLOCK_SIZE {
        return Err(CodecError::Corrupt("missing IV"));
    }

    let mut writer = create_dst_file(output)?;

    let mut prev = iv;
    // One decrypted block held back until we know whether it is the last.
    let mut held: Option<[u8; BLOCK_SIZE]> = None;
    // Ciphertext bytes carried across reads; always < BLOCK_SIZE.
    let mut pending = [0u8; BLOCK_SIZE];
    let mut pending_len: usize = 0;

    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    loop {
        let n = read_to_capacity(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        let mut pos = 0;
        while pos < n {
            let take = (BLOCK_SIZE - pending_len).min(n - pos);
            pending[pending_len..pending_len + take].copy_from_slice(&buf[pos..pos + take]);
            pending_len += take;
            pos += take;
            if pending_len < BLOCK_SIZE {
                break;
            }
            pending_len = 0;

            if let Some(plain) = held.take() {
                writer.write_all(&plain)?;
            }
            let ciphertext = pending;
            let mut block = ciphertext;
            cipher.decrypt_block(&mut block);
            xor_block(&mut block, &prev);
            prev = ciphertext;
            held = Some(block);
        }
    }

    if pending_len != 0 {
        writer.flush()?;
        return Err(CodecError::Corrupt("ciphertext not block-aligned"));
    }
    let last = match held {
        Some(b) => b,
        None => {
            writer.flush()?;
            return Err(CodecError::Corrupt("empty ciphertext"));
        }
    };

    // PKCS#7 validation: p ∈ [1..16] and the last p bytes all equal p.
    let pad = last[BLOCK_SIZE - 1] as usize;
    if pad == 0 || pad > BLOCK_SIZE || last[BLOCK_SIZE - pad..].iter().any(|&b| b as usize != pad)
    {
        writer.flush()?;
        return Err(CodecError::BadPadding);
    }
    writer.write_all(&last[..BLOCK_SIZE - pad])?;
    writer.flush()?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
