// File:    lib.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: The main library crate for cipher-core, exposing the four classical cipher engines.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # Cipher Core Library
//!
//! Educational implementations of four classical ciphers: a byte-wise
//! one-time pad, an alphabet-aware polyalphabetic one-time pad for Latin
//! and Arabic text, the Rail Fence transposition, and toy RSA.
//!
//! Every engine is a set of pure functions. Each call returns its result
//! together with a [`StepTrace`] that a front end can replay to show how
//! every symbol was transformed. No engine keeps key material between calls.
//!
//! These ciphers are for teaching only; the primes are tiny and RSA has no
//! padding.

/// Symbol sets, script detection and normalization.
pub mod alphabet;
/// Byte-wise XOR one-time pad.
pub mod byte_otp;
/// Error kinds shared by all engines.
pub mod error;
/// Polyalphabetic one-time pad over a detected alphabet.
pub mod poly_otp;
/// Rail Fence transposition.
pub mod rail_fence;
/// Textbook RSA over small primes.
pub mod rsa;
/// The step trace produced by every engine.
pub mod trace;

pub use alphabet::{AlphabetSet, Script, alphabet_for, detect_script, normalize};
pub use error::{CipherError, Result};
pub use trace::{CipherStep, Direction, Operation, StepStatus, StepTrace};
