// File:    byte_otp.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Byte-wise one-time pad (XOR) with base64 text boundary and per-byte traces.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The byte-level one-time pad.
//!
//! Plaintext bytes are XORed with key bytes position by position. Applying
//! the same key twice restores the input, so decryption is the same call.
//! The text helpers wrap this with base64 at the boundary.

use crate::error::{CipherError, Result};
use crate::trace::{CipherStep, Direction, Operation, StepTrace};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::{debug, warn};
use rand::{TryRngCore, rngs::OsRng};
use std::fmt;

/// Text recovered from a decryption.
///
/// When the decrypted bytes are not valid UTF-8 they are rendered as
/// lowercase hexadecimal instead of being dropped or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedText {
    /// The bytes were valid UTF-8.
    Utf8(String),
    /// The bytes were not valid UTF-8; this is their hex rendering.
    Hex(String),
}

impl DecodedText {
    /// Decodes `bytes` as UTF-8, falling back to hex.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Utf8(text),
            Err(err) => Self::Hex(hex::encode(err.into_bytes())),
        }
    }

    /// The rendered text, whichever form it took.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Utf8(s) | Self::Hex(s) => s,
        }
    }

    /// Whether the hex fallback was used.
    #[must_use]
    pub const fn is_hex(&self) -> bool {
        matches!(self, Self::Hex(_))
    }

    /// Consumes the value and returns the rendered text.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Utf8(s) | Self::Hex(s) => s,
        }
    }
}

impl fmt::Display for DecodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// XORs `plain` with the leading bytes of `key`.
///
/// # Errors
///
/// Returns [`CipherError::KeyTooShort`] if `key` is shorter than `plain`.
pub fn encrypt_bytes(plain: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key_len(key.len(), plain.len())?;
    Ok(plain.iter().zip(key.iter()).map(|(p, k)| p ^ k).collect())
}

/// Reverses [`encrypt_bytes`]; XOR is its own inverse.
///
/// # Errors
///
/// Returns [`CipherError::KeyTooShort`] if `key` is shorter than `cipher`.
pub fn decrypt_bytes(cipher: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    encrypt_bytes(cipher, key)
}

/// Generates `len` random key bytes from the operating system.
///
/// # Errors
///
/// Returns [`CipherError::KeyGeneration`] if the random source fails.
pub fn generate_key(len: usize) -> Result<Vec<u8>> {
    let mut rng = OsRng;
    let mut buffer = vec![0u8; len];
    rng.try_fill_bytes(&mut buffer)
        .map_err(|e| CipherError::KeyGeneration(e.to_string()))?;
    Ok(buffer)
}

/// Generates a random key of `len` bytes and returns it base64-encoded.
///
/// # Errors
///
/// Returns [`CipherError::KeyGeneration`] if the random source fails.
pub fn generate_key_b64(len: usize) -> Result<String> {
    generate_key(len).map(|key| STANDARD.encode(key))
}

/// Encrypts UTF-8 `plain` and returns `(cipher_b64, key_b64)`.
///
/// Without a key, one exactly as long as the plaintext bytes is generated.
///
/// # Errors
///
/// Fails if the supplied key is not base64, is too short, or if key
/// generation fails.
pub fn encrypt_text(plain: &str, key_b64: Option<&str>) -> Result<(String, String)> {
    let plain_bytes = plain.as_bytes();
    let (key, key_b64) = match key_b64 {
        Some(encoded) => (decode_b64("key", encoded)?, encoded.trim().to_string()),
        None => {
            let key = generate_key(plain_bytes.len())?;
            let encoded = STANDARD.encode(&key);
            (key, encoded)
        }
    };
    debug!(
        "byte otp encrypt: {} plaintext bytes, {} key bytes",
        plain_bytes.len(),
        key.len()
    );
    let cipher = encrypt_bytes(plain_bytes, &key)?;
    Ok((STANDARD.encode(cipher), key_b64))
}

/// Decrypts base64 `cipher_b64` with base64 `key_b64`.
///
/// # Errors
///
/// Fails if either input is not base64 or the key is too short.
pub fn decrypt_text(cipher_b64: &str, key_b64: &str) -> Result<DecodedText> {
    let cipher = decode_b64("cipher", cipher_b64)?;
    let key = decode_b64("key", key_b64)?;
    debug!(
        "byte otp decrypt: {} cipher bytes, {} key bytes",
        cipher.len(),
        key.len()
    );
    let plain = decrypt_bytes(&cipher, &key)?;
    let decoded = DecodedText::from_bytes(plain);
    if decoded.is_hex() {
        warn!("decrypted bytes are not valid UTF-8, rendering as hex");
    }
    Ok(decoded)
}

/// Builds the per-byte trace for a text operation.
///
/// For [`Direction::Encrypt`], `text` is the UTF-8 plaintext; for
/// [`Direction::Decrypt`] it is the base64 ciphertext.
///
/// # Errors
///
/// Fails if an input is not base64 or the key is too short.
pub fn trace(text: &str, key_b64: &str, direction: Direction) -> Result<StepTrace> {
    let input = match direction {
        Direction::Encrypt => text.as_bytes().to_vec(),
        Direction::Decrypt => decode_b64("cipher", text)?,
    };
    let key = decode_b64("key", key_b64)?;
    check_key_len(key.len(), input.len())?;

    Ok(input
        .iter()
        .zip(key.iter())
        .enumerate()
        .map(|(index, (&byte, &key_byte))| {
            let output = byte ^ key_byte;
            CipherStep::applied(
                index,
                readable_byte(byte),
                key_byte.to_string(),
                Operation::Xor {
                    input: byte,
                    key: key_byte,
                    output,
                },
                readable_byte(output),
                format!("{byte} XOR {key_byte} = {output}"),
            )
        })
        .collect())
}

/// Printable ASCII renders as itself, anything else as `0x..`.
fn readable_byte(byte: u8) -> String {
    if (32..=126).contains(&byte) {
        char::from(byte).to_string()
    } else {
        format!("{byte:#x}")
    }
}

fn decode_b64(label: &str, encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CipherError::InvalidBase64(format!("{label}: {e}")))
}

fn check_key_len(key_len: usize, text_len: usize) -> Result<()> {
    if key_len < text_len {
        return Err(CipherError::KeyTooShort { key_len, text_len });
    }
    Ok(())
}
