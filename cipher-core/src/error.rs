// File:    error.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Error kinds reported by the cipher engines.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Typed failures shared by every engine.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CipherError>;

/// Validation failures reported synchronously to the caller.
///
/// Each variant carries the offending value so a front end can render a
/// precise message. Ignored symbols and RSA placeholder characters are not
/// errors; they show up in the step trace instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The key is shorter than the text it has to cover.
    #[error("key is too short: {key_len} symbols for a text of {text_len}")]
    KeyTooShort {
        /// Length of the supplied key.
        key_len: usize,
        /// Length of the text or ciphertext.
        text_len: usize,
    },
    /// The Rail Fence key is not an integer greater than 1.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// An RSA prime candidate failed the primality test.
    #[error("{0} is not a prime number")]
    NotPrime(u64),
    /// Both RSA primes are the same value.
    #[error("p and q must be distinct (both are {0})")]
    PrimesNotDistinct(u64),
    /// The supplied `e` and `d` are not inverses modulo phi.
    #[error("user keys mismatch: e={e} and d={d} are not inverse modulo phi={phi}")]
    KeyMismatch {
        /// Public exponent.
        e: u64,
        /// Private exponent.
        d: u64,
        /// Euler's totient of the modulus.
        phi: u64,
    },
    /// A fixed exponent shares a factor with phi and cannot be inverted.
    #[error("fixed {name}={value} is not coprime with phi={phi}")]
    InvalidExponent {
        /// Which exponent was rejected, `"e"` or `"d"`.
        name: &'static str,
        /// The rejected value.
        value: u64,
        /// Euler's totient of the modulus.
        phi: u64,
    },
    /// A plaintext code point does not fit below the modulus.
    #[error("character '{symbol}' (code {code}) is not below n={n}; use larger primes")]
    MessageTooLarge {
        /// The character that could not be encrypted.
        symbol: char,
        /// Its code point.
        code: u64,
        /// The RSA modulus.
        n: u64,
    },
    /// The RSA modulus is unusable (below 2, or `p * q` overflowed).
    #[error("invalid RSA modulus {0}")]
    InvalidModulus(u64),
    /// The ciphertext contained no integer tokens.
    #[error("no integer tokens found in cipher text")]
    NoTokensFound,
    /// A ciphertext token does not fit a 64-bit integer.
    #[error("cipher token {0} is out of range")]
    TokenOutOfRange(String),
    /// Base64 input at the byte cipher boundary could not be decoded.
    #[error("invalid base64 input: {0}")]
    InvalidBase64(String),
    /// The operating system random source failed.
    #[error("failed to generate key: {0}")]
    KeyGeneration(String),
}
