//! The Rail Fence transposition cipher.
//!
//! Text is written along a zigzag over `rails` rows and read back row by
//! row. Every character, whitespace and punctuation included, takes part in
//! the placement.

use crate::error::{CipherError, Result};
use crate::trace::{CipherStep, Direction, Operation, StepTrace};
use log::debug;

/// Result of a Rail Fence operation with its intermediate rails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailFenceOutcome {
    /// The ciphertext or plaintext.
    pub text: String,
    /// Contents of each rail the zigzag reaches, top to bottom.
    pub rails: Vec<String>,
    /// One step per character.
    pub trace: StepTrace,
}

impl RailFenceOutcome {
    /// Renders the rails as `Rail 1: ...` lines.
    #[must_use]
    pub fn rail_lines(&self) -> Vec<String> {
        self.rails
            .iter()
            .enumerate()
            .map(|(i, rail)| format!("Rail {}: {rail}", i + 1))
            .collect()
    }
}

/// Parses a rail count typed by a user.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] if `input` is not an integer greater
/// than 1.
pub fn parse_rails(input: &str) -> Result<usize> {
    let rails = input
        .trim()
        .parse::<usize>()
        .map_err(|_| CipherError::InvalidKey(format!("'{}' is not an integer", input.trim())))?;
    validate(rails)?;
    Ok(rails)
}

/// Encrypts `text` over `rails` rows.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] if `rails` is not greater than 1.
pub fn encrypt(text: &str, rails: usize) -> Result<String> {
    encrypt_with_trace(text, rails).map(|outcome| outcome.text)
}

/// Decrypts `cipher` written over `rails` rows.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] if `rails` is not greater than 1.
pub fn decrypt(cipher: &str, rails: usize) -> Result<String> {
    decrypt_with_trace(cipher, rails).map(|outcome| outcome.text)
}

/// Encrypts `text` and records the rail each character lands on.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] if `rails` is not greater than 1.
pub fn encrypt_with_trace(text: &str, rails: usize) -> Result<RailFenceOutcome> {
    validate(rails)?;
    let len = text.chars().count();
    debug!("rail fence encrypt: {len} chars over {rails} rails");

    let rows = reachable_rows(rails, len);
    let mut buckets = vec![String::new(); rows];
    let mut trace = StepTrace::with_capacity(len);
    for (index, (ch, row)) in text.chars().zip(Zigzag::new(rows)).enumerate() {
        buckets[row].push(ch);
        trace.push(rail_step(index, ch, row, Direction::Encrypt));
    }

    Ok(RailFenceOutcome {
        text: buckets.concat(),
        rails: buckets,
        trace,
    })
}

/// Decrypts `cipher` and records the rail each character is read from.
///
/// Rail lengths are recovered by walking the zigzag over the ciphertext
/// length; the ciphertext is then sliced into rails and the walk is replayed,
/// taking the next unread character of the current rail at each position.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] if `rails` is not greater than 1.
pub fn decrypt_with_trace(cipher: &str, rails: usize) -> Result<RailFenceOutcome> {
    validate(rails)?;
    let chars: Vec<char> = cipher.chars().collect();
    debug!("rail fence decrypt: {} chars over {rails} rails", chars.len());

    let rows = reachable_rows(rails, chars.len());
    let mut lengths = vec![0usize; rows];
    for row in Zigzag::new(rows).take(chars.len()) {
        lengths[row] += 1;
    }

    let mut buckets: Vec<&[char]> = Vec::with_capacity(rows);
    let mut offset = 0;
    for len in &lengths {
        buckets.push(&chars[offset..offset + len]);
        offset += len;
    }

    let mut cursors = vec![0usize; rows];
    let mut text = String::with_capacity(cipher.len());
    let mut trace = StepTrace::with_capacity(chars.len());
    for (index, row) in Zigzag::new(rows).take(chars.len()).enumerate() {
        let ch = buckets[row][cursors[row]];
        cursors[row] += 1;
        text.push(ch);
        trace.push(rail_step(index, ch, row, Direction::Decrypt));
    }

    Ok(RailFenceOutcome {
        text,
        rails: buckets.iter().map(|rail| rail.iter().collect()).collect(),
        trace,
    })
}

fn validate(rails: usize) -> Result<()> {
    if rails <= 1 {
        return Err(CipherError::InvalidKey(format!(
            "rail count must be greater than 1, got {rails}"
        )));
    }
    Ok(())
}

/// Rows the zigzag can visit over `len` positions.
///
/// A walk of `len` steps never gets past row `len - 1`, so rails beyond that
/// stay empty and need no storage.
fn reachable_rows(rails: usize, len: usize) -> usize {
    rails.min(len.max(2))
}

fn rail_step(index: usize, ch: char, row: usize, direction: Direction) -> CipherStep {
    let formula = match direction {
        Direction::Encrypt => format!("position {index} -> rail {}", row + 1),
        Direction::Decrypt => format!("rail {} -> position {index}", row + 1),
    };
    CipherStep::applied(
        index,
        ch.to_string(),
        format!("rail {}", row + 1),
        Operation::Rail { rail: row },
        ch.to_string(),
        formula,
    )
}

/// Endless sequence of zero-based rows visited by the zigzag pointer.
struct Zigzag {
    rails: usize,
    row: usize,
    down: bool,
}

impl Zigzag {
    const fn new(rails: usize) -> Self {
        Self {
            rails,
            row: 0,
            down: true,
        }
    }
}

impl Iterator for Zigzag {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.row;
        if self.row == 0 {
            self.down = true;
        } else if self.row == self.rails - 1 {
            self.down = false;
        }
        if self.down {
            self.row += 1;
        } else {
            self.row -= 1;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_rows() {
        let rows: Vec<usize> = Zigzag::new(3).take(8).collect();
        assert_eq!(rows, vec![0, 1, 2, 1, 0, 1, 2, 1]);
    }

    #[test]
    fn test_reference_vector() {
        let cipher = encrypt("WEAREDISCOVEREDFLEEATONCE", 3).unwrap();
        assert_eq!(cipher, "WECRLTEERDSOEEFEAOCAIVDEN");
        assert_eq!(
            decrypt("WECRLTEERDSOEEFEAOCAIVDEN", 3).unwrap(),
            "WEAREDISCOVEREDFLEEATONCE"
        );
    }

    #[test]
    fn test_rails_equal_to_length_is_identity() {
        assert_eq!(encrypt("HELLO", 5).unwrap(), "HELLO");
        assert_eq!(encrypt("HELLO", 9).unwrap(), "HELLO");
    }

    #[test]
    fn test_rails_beyond_length() {
        for rails in [6, 64, 1 << 40, usize::MAX] {
            let out = encrypt_with_trace("abc", rails).unwrap();
            assert_eq!(out.text, "abc");
            assert_eq!(out.rails, vec!["a", "b", "c"]);
            assert_eq!(decrypt("abc", rails).unwrap(), "abc");
        }
        assert_eq!(encrypt("x", usize::MAX).unwrap(), "x");
        assert_eq!(decrypt("", usize::MAX).unwrap(), "");
    }

    #[test]
    fn test_spaces_and_punctuation_preserved() {
        let text = "Rail Fence, Cipher!";
        for rails in 2..8 {
            let cipher = encrypt(text, rails).unwrap();
            assert_eq!(cipher.chars().count(), text.chars().count());
            assert_eq!(decrypt(&cipher, rails).unwrap(), text);
        }
    }

    #[test]
    fn test_rail_view() {
        let out = encrypt_with_trace("WEAREDISCOVEREDFLEEATONCE", 3).unwrap();
        assert_eq!(out.rails[0], "WECRLTE");
        assert_eq!(out.rail_lines()[1], "Rail 2: ERDSOEEFEAOC");
        assert_eq!(out.trace.len(), 25);
        assert_eq!(out.trace.get(2).unwrap().operation, Operation::Rail { rail: 2 });
    }

    #[test]
    fn test_decrypt_rail_view_matches_encrypt() {
        let enc = encrypt_with_trace("attack at dawn", 4).unwrap();
        let dec = decrypt_with_trace(&enc.text, 4).unwrap();
        assert_eq!(dec.rails, enc.rails);
        assert_eq!(dec.text, "attack at dawn");
    }

    #[test]
    fn test_invalid_rails() {
        assert!(matches!(encrypt("abc", 1), Err(CipherError::InvalidKey(_))));
        assert!(matches!(decrypt("abc", 0), Err(CipherError::InvalidKey(_))));
        assert!(matches!(parse_rails("2.5"), Err(CipherError::InvalidKey(_))));
        assert!(matches!(parse_rails("1"), Err(CipherError::InvalidKey(_))));
        assert_eq!(parse_rails(" 4 ").unwrap(), 4);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(encrypt("", 3).unwrap(), "");
        assert_eq!(decrypt("", 3).unwrap(), "");
    }
}
