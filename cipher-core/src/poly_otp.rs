// File:    poly_otp.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Alphabet-aware one-time pad using modular addition over a detected script.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! The polyalphabetic one-time pad.
//!
//! Text and key symbols are mapped to indices in the alphabet of the
//! detected script and combined with modular addition (encrypt) or
//! subtraction (decrypt). Symbols that are not in the alphabet, on either
//! the text or the key side, pass through unchanged and are marked as
//! ignored in the trace.

use crate::alphabet::{Script, alphabet_for, detect_script, normalize};
use crate::error::{CipherError, Result};
use crate::trace::{CipherStep, Direction, Operation, StepTrace};
use log::{debug, warn};
use rand::Rng;

/// Result of one polyalphabetic operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyOutcome {
    /// The ciphertext or plaintext.
    pub text: String,
    /// The script whose alphabet was used. Pass it to [`decrypt_as`] to
    /// undo an encryption under the same alphabet.
    pub script: Script,
    /// One step per input symbol.
    pub trace: StepTrace,
}

/// Encrypts `text` under the alphabet detected from `text` itself.
///
/// # Errors
///
/// Returns [`CipherError::KeyTooShort`] if `key` has fewer symbols than `text`.
pub fn encrypt(text: &str, key: &str) -> Result<PolyOutcome> {
    encrypt_as(text, key, detect_script(text))
}

/// Decrypts `cipher` under the alphabet detected from `cipher` itself.
///
/// The detected script can differ from the one used for encryption; use
/// [`decrypt_as`] with [`PolyOutcome::script`] when that matters.
///
/// # Errors
///
/// Returns [`CipherError::KeyTooShort`] if `key` has fewer symbols than `cipher`.
pub fn decrypt(cipher: &str, key: &str) -> Result<PolyOutcome> {
    decrypt_as(cipher, key, detect_script(cipher))
}

/// Encrypts `text` under the alphabet of `script`.
///
/// # Errors
///
/// Returns [`CipherError::KeyTooShort`] if `key` has fewer symbols than `text`.
pub fn encrypt_as(text: &str, key: &str, script: Script) -> Result<PolyOutcome> {
    transform(text, key, script, Direction::Encrypt)
}

/// Decrypts `cipher` under the alphabet of `script`.
///
/// # Errors
///
/// Returns [`CipherError::KeyTooShort`] if `key` has fewer symbols than `cipher`.
pub fn decrypt_as(cipher: &str, key: &str, script: Script) -> Result<PolyOutcome> {
    transform(cipher, key, script, Direction::Decrypt)
}

/// Generates a random key of `len` symbols drawn from the alphabet of `script`.
#[must_use]
pub fn generate_key(script: Script, len: usize) -> String {
    let symbols = alphabet_for(script).symbols();
    let mut rng = rand::rng();
    (0..len)
        .map(|_| symbols[rng.random_range(0..symbols.len())])
        .collect()
}

fn transform(text: &str, key: &str, script: Script, direction: Direction) -> Result<PolyOutcome> {
    let text_chars: Vec<char> = text.chars().collect();
    let key_chars: Vec<char> = key.chars().collect();
    if key_chars.len() < text_chars.len() {
        return Err(CipherError::KeyTooShort {
            key_len: key_chars.len(),
            text_len: text_chars.len(),
        });
    }

    let alphabet = alphabet_for(script);
    let modulus = alphabet.len();
    debug!(
        "poly otp {direction:?}: {} symbols, script {script}, alphabet size {modulus}",
        text_chars.len()
    );

    let mut output = String::with_capacity(text.len());
    let mut trace = StepTrace::with_capacity(text_chars.len());

    for (index, (&t, &k)) in text_chars.iter().zip(key_chars.iter()).enumerate() {
        let lookup = (
            alphabet.index_of(normalize(t, script)),
            alphabet.index_of(normalize(k, script)),
        );
        let (Some(ti), Some(ki)) = lookup else {
            output.push(t);
            trace.push(CipherStep::ignored(index, t, k));
            continue;
        };

        let (ri, operation, sign) = match direction {
            Direction::Encrypt => {
                let ri = (ti + ki) % modulus;
                let op = Operation::ModAdd {
                    input: ti,
                    key: ki,
                    modulus,
                    output: ri,
                };
                (ri, op, '+')
            }
            Direction::Decrypt => {
                let ri = (ti + modulus - ki) % modulus;
                let op = Operation::ModSub {
                    input: ti,
                    key: ki,
                    modulus,
                    output: ri,
                };
                (ri, op, '-')
            }
        };
        let symbols = alphabet.symbols();
        let r = symbols[ri];
        output.push(r);
        trace.push(CipherStep::applied(
            index,
            t.to_string(),
            k.to_string(),
            operation,
            r.to_string(),
            format!("{t}({ti}) {sign} {k}({ki}) mod {modulus} = {r}({ri})"),
        ));
    }

    let ignored = trace.ignored_count();
    if ignored > 0 {
        warn!("poly otp: {ignored} symbol(s) outside the {script} alphabet passed through");
    }

    Ok(PolyOutcome {
        text: output,
        script,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepStatus;

    #[test]
    fn test_latin_encrypt_known_vector() {
        // H=7, E=4, B=1, C=2 in the Latin alphabet
        let out = encrypt("HE", "BC").unwrap();
        assert_eq!(out.script, Script::Latin);
        assert_eq!(out.text, "IG");
        assert_eq!(out.trace.get(0).unwrap().formula, "H(7) + B(1) mod 62 = I(8)");
    }

    #[test]
    fn test_wraps_around_alphabet() {
        // '9' is the last Latin symbol (61); 61 + 2 wraps to 1
        let out = encrypt_as("9", "C", Script::Latin).unwrap();
        assert_eq!(out.text, "B");
        let back = decrypt_as("B", "C", Script::Latin).unwrap();
        assert_eq!(back.text, "9");
    }

    #[test]
    fn test_space_passes_through() {
        let out = encrypt("A B", "KEY").unwrap();
        assert_eq!(out.text.chars().nth(1), Some(' '));
        let step = out.trace.get(1).unwrap();
        assert_eq!(step.status, StepStatus::Ignored);
        assert_eq!(step.input, " ");
        assert_eq!(step.output, " ");
        assert_eq!(out.trace.len(), 3);
    }

    #[test]
    fn test_key_symbol_outside_alphabet_is_ignored() {
        let out = encrypt_as("AB", "A!", Script::Latin).unwrap();
        assert_eq!(out.text, "AB");
        assert!(out.trace.get(1).unwrap().is_ignored());
    }

    #[test]
    fn test_arabic_roundtrip() {
        let key = generate_key(Script::Arabic, 10);
        let out = encrypt("مرحبا بكم", &key).unwrap();
        assert_eq!(out.script, Script::Arabic);
        let back = decrypt_as(&out.text, &key, out.script).unwrap();
        assert_eq!(back.text, "مرحبا بكم");
    }

    #[test]
    fn test_normalized_symbol_decrypts_to_canonical_form() {
        let out = encrypt_as("أ", "ب", Script::Arabic).unwrap();
        assert_eq!(out.trace.get(0).unwrap().input, "أ");
        let back = decrypt_as(&out.text, "ب", Script::Arabic).unwrap();
        assert_eq!(back.text, "ا");
    }

    #[test]
    fn test_short_key_rejected() {
        let err = encrypt("HELLO", "KEY").unwrap_err();
        assert_eq!(
            err,
            CipherError::KeyTooShort {
                key_len: 3,
                text_len: 5
            }
        );
    }

    #[test]
    fn test_generated_key_stays_in_alphabet() {
        let key = generate_key(Script::Mixed, 50);
        let alphabet = alphabet_for(Script::Mixed);
        assert_eq!(key.chars().count(), 50);
        assert!(key.chars().all(|c| alphabet.contains(c)));
    }
}
