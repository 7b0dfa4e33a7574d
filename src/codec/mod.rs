//! Codec library — pure path-to-path byte transforms with documented
//! container formats.
//!
//! | Module     | Contents |
//! |------------|----------|
//! | `rle`      | Run-length codec: `(i32 LE count, u8 value)` pairs. |
//! | `lzw`      | LZW with fixed 16-bit codes and a frozen dictionary. |
//! | `huffman`  | Static Huffman with the frequency table in the header. |
//! | `vigenere` | Byte-level Vigenère over the ASCII-letter alphabet. |
//! | `aes128`   | AES-128 block primitive (S-box, key schedule, rounds). |
//! | `aes_cbc`  | AES-128-CBC file cipher with PKCS#7 and a per-file IV. |
//!
//! Every codec reads one input file and truncate-creates one output file.
//! Compressors and the Vigenère cipher are deterministic; AES encryption is
//! not (the IV is sampled fresh per invocation). Failures surface as
//! [`CodecError`] values; a mid-stream failure may leave a truncated output
//! behind, which the pipeline layer cleans up.

pub mod aes128;
pub mod aes_cbc;
pub mod huffman;
pub mod lzw;
pub mod rle;
pub mod vigenere;

use std::io;
use std::path::Path;

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by the codec layer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying file or stream I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// A cipher operation was requested with an empty key.
    #[error("key must not be empty")]
    EmptyKey,
    /// A decoder met bytes that cannot be part of a valid container.
    #[error("corrupt stream: {0}")]
    Corrupt(&'static str),
    /// PKCS#7 padding validation failed during AES decryption.
    #[error("bad PKCS#7 padding")]
    BadPadding,
    /// The operating system's random source could not produce an IV.
    ///
    /// There is deliberately no deterministic fallback.
    #[error("system random source unavailable: {0}")]
    RngUnavailable(rand::Error),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

// ─────────────────────────────────────────────────────────────────────────────
// Operation codes and algorithm selectors
// ─────────────────────────────────────────────────────────────────────────────

/// One operation of a chain, parsed from its single-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// `c` — compress with the selected compression algorithm.
    Compress,
    /// `d` — decompress with the selected compression algorithm.
    Decompress,
    /// `e` — encrypt with the selected encryption algorithm.
    Encrypt,
    /// `u` — decrypt with the selected encryption algorithm.
    Decrypt,
}

impl OpCode {
    /// Parses a single chain character. Returns `None` for anything outside
    /// `{c, d, e, u}`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(OpCode::Compress),
            'd' => Some(OpCode::Decompress),
            'e' => Some(OpCode::Encrypt),
            'u' => Some(OpCode::Decrypt),
            _ => None,
        }
    }

    /// The chain character for this operation.
    pub fn as_char(self) -> char {
        match self {
            OpCode::Compress => 'c',
            OpCode::Decompress => 'd',
            OpCode::Encrypt => 'e',
            OpCode::Decrypt => 'u',
        }
    }

    /// Human-readable verb used in journal and console lines.
    pub fn label(self) -> &'static str {
        match self {
            OpCode::Compress => "compress",
            OpCode::Decompress => "decompress",
            OpCode::Encrypt => "encrypt",
            OpCode::Decrypt => "decrypt",
        }
    }

    /// `true` for the two cipher operations, which require key material.
    pub fn is_cipher(self) -> bool {
        matches!(self, OpCode::Encrypt | OpCode::Decrypt)
    }
}

/// Compression algorithm selector. Applies to every `c`/`d` in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlg {
    Rle,
    Lzw,
    Huffman,
}

impl CompressionAlg {
    /// Parses a user-supplied algorithm name (case-insensitive).
    ///
    /// Accepted spellings: `RLE`, `LZW`, `Huff`, `Huffman`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "RLE" => Some(CompressionAlg::Rle),
            "LZW" => Some(CompressionAlg::Lzw),
            "HUFF" | "HUFFMAN" => Some(CompressionAlg::Huffman),
            _ => None,
        }
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            CompressionAlg::Rle => "RLE",
            CompressionAlg::Lzw => "LZW",
            CompressionAlg::Huffman => "Huffman",
        }
    }
}

/// Encryption algorithm selector. Applies to every `e`/`u` in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlg {
    Vigenere,
    Aes128,
}

impl EncryptionAlg {
    /// Parses a user-supplied algorithm name (case-insensitive).
    ///
    /// Accepted spellings: `VIG`, `VIGENERE`, `AES`, `AES128`, `AES-128`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "VIG" | "VIGENERE" => Some(EncryptionAlg::Vigenere),
            "AES" | "AES128" | "AES-128" => Some(EncryptionAlg::Aes128),
            _ => None,
        }
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            EncryptionAlg::Vigenere => "Vigenere",
            EncryptionAlg::Aes128 => "AES-128",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Compresses `input` into `output` with the selected algorithm.
pub fn compress(alg: CompressionAlg, input: &Path, output: &Path) -> Result<()> {
    match alg {
        CompressionAlg::Rle => rle::compress(input, output),
        CompressionAlg::Lzw => lzw::compress(input, output),
        CompressionAlg::Huffman => huffman::compress(input, output),
    }
}

/// Decompresses `input` into `output` with the selected algorithm.
pub fn decompress(alg: CompressionAlg, input: &Path, output: &Path) -> Result<()> {
    match alg {
        CompressionAlg::Rle => rle::decompress(input, output),
        CompressionAlg::Lzw => lzw::decompress(input, output),
        CompressionAlg::Huffman => huffman::decompress(input, output),
    }
}

/// Encrypts `input` into `output` with the selected algorithm.
pub fn encrypt(alg: EncryptionAlg, input: &Path, output: &Path, key: &str) -> Result<()> {
    match alg {
        EncryptionAlg::Vigenere => vigenere::encrypt(input, output, key),
        EncryptionAlg::Aes128 => aes_cbc::encrypt(input, output, key),
    }
}

/// Decrypts `input` into `output` with the selected algorithm.
pub fn decrypt(alg: EncryptionAlg, input: &Path, output: &Path, key: &str) -> Result<()> {
    match alg {
        EncryptionAlg::Vigenere => vigenere::decrypt(input, output, key),
        EncryptionAlg::Aes128 => aes_cbc::decrypt(input, output, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_code_round_trips_through_chars() {
        for c in ['c', 'd', 'e', 'u'] {
            assert_eq!(OpCode::from_char(c).unwrap().as_char(), c);
        }
        assert!(OpCode::from_char('x').is_none());
        assert!(OpCode::from_char('-').is_none());
    }

    #[test]
    fn cipher_ops_require_key() {
        assert!(OpCode::Encrypt.is_cipher());
        assert!(OpCode::Decrypt.is_cipher());
        assert!(!OpCode::Compress.is_cipher());
        assert!(!OpCode::Decompress.is_cipher());
    }

    #[test]
    fn compression_names_parse_case_insensitively() {
        assert_eq!(CompressionAlg::from_name("rle"), Some(CompressionAlg::Rle));
        assert_eq!(CompressionAlg::from_name("LZW"), Some(CompressionAlg::Lzw));
        assert_eq!(
            CompressionAlg::from_name("huff"),
            Some(CompressionAlg::Huffman)
        );
        assert_eq!(
            CompressionAlg::from_name("Huffman"),
            Some(CompressionAlg::Huffman)
        );
        assert_eq!(CompressionAlg::from_name("zstd"), None);
    }

    #[test]
    fn encryption_names_parse_case_insensitively() {
        assert_eq!(
            EncryptionAlg::from_name("Vigenere"),
            Some(EncryptionAlg::Vigenere)
        );
        assert_eq!(EncryptionAlg::from_name("VIG"), Some(EncryptionAlg::Vigenere));
        assert_eq!(EncryptionAlg::from_name("aes"), Some(EncryptionAlg::Aes128));
        assert_eq!(
            EncryptionAlg::from_name("AES-128"),
            Some(EncryptionAlg::Aes128)
        );
        assert_eq!(EncryptionAlg::from_name("chacha"), None);
    }
}
