// File:    rsa.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Textbook RSA over small primes, one character per block, with traces.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Toy RSA.
//!
//! Each character's code point is encrypted as its own block with
//! `c = m^e mod n`; there is no padding and no chunking. Key derivation
//! accepts user-fixed exponents and fills in whatever is missing.

use crate::error::{CipherError, Result};
use crate::trace::{CipherStep, Operation, StepStatus, StepTrace};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Public exponent tried first when the caller fixes neither `e` nor `d`.
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Character emitted when a decrypted value is not a valid code point.
pub const PLACEHOLDER: char = '?';

/// A complete toy RSA key set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaKeys {
    /// First prime.
    pub p: u64,
    /// Second prime.
    pub q: u64,
    /// Modulus `p * q`.
    pub n: u64,
    /// Euler's totient `(p - 1) * (q - 1)`.
    pub phi: u64,
    /// Public exponent.
    pub e: u64,
    /// Private exponent, `e * d = 1 (mod phi)`.
    pub d: u64,
}

impl RsaKeys {
    /// Whether every character of `text` has a code point below `n`.
    #[must_use]
    pub fn supports_text(&self, text: &str) -> bool {
        text.chars().all(|c| u64::from(u32::from(c)) < self.n)
    }
}

/// Deterministic trial division up to `sqrt(n)`.
///
/// Only suitable for the small primes used in demonstrations.
#[must_use]
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut divisor = 3u64;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Greatest common divisor.
#[must_use]
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Inverse of `a` modulo `m`, if `gcd(a, m) == 1`.
#[must_use]
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    let (mut old_r, mut r) = (i128::from(a % m), i128::from(m));
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }
    if old_r != 1 {
        return None;
    }
    u64::try_from(old_s.rem_euclid(i128::from(m))).ok()
}

/// `base^exponent mod modulus` by square-and-multiply.
///
/// A modulus of 0 or 1 yields 0.
#[must_use]
pub fn mod_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    if modulus <= 1 {
        return 0;
    }
    let m = u128::from(modulus);
    let mut result = 1u128;
    let mut base = u128::from(base) % m;
    let mut exponent = exponent;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exponent >>= 1;
    }
    // result < modulus, which is a u64
    u64::try_from(result).unwrap_or_default()
}

fn mul_mod(a: u64, b: u64, modulus: u64) -> u64 {
    u64::try_from(u128::from(a) * u128::from(b) % u128::from(modulus)).unwrap_or_default()
}

/// Derives a full key set from `p`, `q` and optionally fixed exponents.
///
/// Resolution order: both exponents given are checked against each other;
/// one given has the other derived as its modular inverse; none given uses
/// [`DEFAULT_PUBLIC_EXPONENT`] when it is below and coprime to phi, else
/// the smallest odd `e >= 3` coprime to phi.
///
/// # Errors
///
/// - [`CipherError::NotPrime`] / [`CipherError::PrimesNotDistinct`] for bad primes.
/// - [`CipherError::InvalidModulus`] if `p * q` overflows.
/// - [`CipherError::KeyMismatch`] if both exponents are given and do not match.
/// - [`CipherError::InvalidExponent`] if a single fixed exponent is not invertible.
pub fn derive_keys(p: u64, q: u64, e: Option<u64>, d: Option<u64>) -> Result<RsaKeys> {
    if !is_prime(p) {
        return Err(CipherError::NotPrime(p));
    }
    if !is_prime(q) {
        return Err(CipherError::NotPrime(q));
    }
    if p == q {
        return Err(CipherError::PrimesNotDistinct(p));
    }
    let n = p.checked_mul(q).ok_or(CipherError::InvalidModulus(u64::MAX))?;
    let phi = (p - 1) * (q - 1);

    let (e, d) = match (e, d) {
        (Some(e), Some(d)) => {
            if gcd(e, phi) != 1 || mul_mod(e, d, phi) != 1 {
                return Err(CipherError::KeyMismatch { e, d, phi });
            }
            (e, d)
        }
        (Some(e), None) => (e, invert("e", e, phi)?),
        (None, Some(d)) => (invert("d", d, phi)?, d),
        (None, None) => {
            let e = default_exponent(phi);
            (e, invert("e", e, phi)?)
        }
    };

    debug!("rsa keys derived: n={n}, phi={phi}, e={e}, d={d}");
    Ok(RsaKeys { p, q, n, phi, e, d })
}

fn default_exponent(phi: u64) -> u64 {
    if DEFAULT_PUBLIC_EXPONENT < phi && gcd(DEFAULT_PUBLIC_EXPONENT, phi) == 1 {
        return DEFAULT_PUBLIC_EXPONENT;
    }
    let mut e = 3;
    while gcd(e, phi) != 1 {
        e += 2;
    }
    e
}

fn invert(name: &'static str, value: u64, phi: u64) -> Result<u64> {
    if gcd(value, phi) != 1 {
        return Err(CipherError::InvalidExponent { name, value, phi });
    }
    mod_inverse(value, phi).ok_or(CipherError::InvalidExponent { name, value, phi })
}

/// Extracts every maximal run of ASCII digits from `input`.
///
/// Any other character, commas, brackets and newlines included, acts as a
/// separator.
///
/// # Errors
///
/// - [`CipherError::NoTokensFound`] if `input` has no digits.
/// - [`CipherError::TokenOutOfRange`] if a token does not fit in a `u64`.
pub fn parse_tokens(input: &str) -> Result<Vec<u64>> {
    let tokens = input
        .split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u64>()
                .map_err(|_| CipherError::TokenOutOfRange(token.to_string()))
        })
        .collect::<Result<Vec<u64>>>()?;
    if tokens.is_empty() {
        return Err(CipherError::NoTokensFound);
    }
    Ok(tokens)
}

/// Joins cipher integers with `", "`, the form [`parse_tokens`] reads back.
#[must_use]
pub fn format_cipher(cipher: &[u64]) -> String {
    cipher
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encrypts each character of `text` as `c = m^e mod n`.
///
/// # Errors
///
/// - [`CipherError::InvalidModulus`] if `n < 2`.
/// - [`CipherError::MessageTooLarge`] if a code point is not below `n`.
pub fn encrypt_with_trace(text: &str, e: u64, n: u64) -> Result<(Vec<u64>, StepTrace)> {
    check_modulus(n)?;
    debug!("rsa encrypt: {} chars, e={e}, n={n}", text.chars().count());

    let mut cipher = Vec::new();
    let mut trace = StepTrace::new();
    for (index, ch) in text.chars().enumerate() {
        let m = u64::from(u32::from(ch));
        if m >= n {
            return Err(CipherError::MessageTooLarge { symbol: ch, code: m, n });
        }
        let c = mod_pow(m, e, n);
        cipher.push(c);
        trace.push(CipherStep::applied(
            index,
            ch.to_string(),
            e.to_string(),
            Operation::ModPow {
                base: m,
                exponent: e,
                modulus: n,
                output: c,
            },
            c.to_string(),
            format!("'{ch}' ({m}) -> {m}^{e} mod {n} = {c}"),
        ));
    }
    Ok((cipher, trace))
}

/// Decrypts free-form cipher text with `m = c^d mod n` per token.
///
/// Values that are not valid code points become [`PLACEHOLDER`] and the
/// step is marked [`StepStatus::Placeholder`].
///
/// # Errors
///
/// - [`CipherError::InvalidModulus`] if `n < 2`.
/// - Any error from [`parse_tokens`].
pub fn decrypt_with_trace(cipher: &str, d: u64, n: u64) -> Result<(String, StepTrace)> {
    check_modulus(n)?;
    let tokens = parse_tokens(cipher)?;
    debug!("rsa decrypt: {} tokens, d={d}, n={n}", tokens.len());

    let mut text = String::with_capacity(tokens.len());
    let mut trace = StepTrace::with_capacity(tokens.len());
    for (index, &c) in tokens.iter().enumerate() {
        let m = mod_pow(c, d, n);
        let operation = Operation::ModPow {
            base: c,
            exponent: d,
            modulus: n,
            output: m,
        };
        let decoded = u32::try_from(m).ok().and_then(char::from_u32);
        let step = match decoded {
            Some(ch) => {
                text.push(ch);
                CipherStep::applied(
                    index,
                    c.to_string(),
                    d.to_string(),
                    operation,
                    ch.to_string(),
                    format!("{c} -> {c}^{d} mod {n} = {m} ('{ch}')"),
                )
            }
            None => {
                warn!("rsa decrypt: {m} is not a valid character, using placeholder");
                text.push(PLACEHOLDER);
                CipherStep::applied(
                    index,
                    c.to_string(),
                    d.to_string(),
                    operation,
                    PLACEHOLDER.to_string(),
                    format!("{c} -> {c}^{d} mod {n} = {m} (not a character, shown as '{PLACEHOLDER}')"),
                )
                .with_status(StepStatus::Placeholder)
            }
        };
        trace.push(step);
    }
    Ok((text, trace))
}

fn check_modulus(n: u64) -> Result<()> {
    if n < 2 {
        return Err(CipherError::InvalidModulus(n));
    }
    Ok(())
}
