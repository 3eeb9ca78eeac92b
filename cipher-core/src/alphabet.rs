// File:    alphabet.rs
// Author:  apezoo
// Date:    2025-07-17
//
// Description: Symbol sets, script detection and normalization for the polyalphabetic cipher.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Alphabet modeling for the polyalphabetic one-time pad.
//!
//! Three fixed alphabets exist: Latin letters plus digits, Arabic letters
//! plus digits, and the mixed concatenation of both. The mixed set keeps
//! each digit only once so every symbol has exactly one index.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Upper and lower case Latin letters followed by the ASCII digits.
pub const LATIN_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The Arabic letters in alphabetical order, then hamza and taa marbuta.
pub const ARABIC_LETTERS: &str = "ابتثجحخدذرزسشصضطظعغفقكلمنهويءة";

/// Digits shared by every alphabet.
pub const DIGITS: &str = "0123456789";

/// A detected writing-system class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Latin letters and digits.
    Latin,
    /// Arabic letters and digits.
    Arabic,
    /// Both scripts in one index space.
    Mixed,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Latin => "latin",
            Self::Arabic => "arabic",
            Self::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// An ordered, duplicate-free symbol sequence with O(1) reverse lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabetSet {
    symbols: Vec<char>,
    positions: HashMap<char, usize>,
}

impl AlphabetSet {
    /// Builds an alphabet from `symbols`, keeping the first occurrence of
    /// any repeated symbol.
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Self {
        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for symbol in symbols {
            if !positions.contains_key(&symbol) {
                positions.insert(symbol, ordered.len());
                ordered.push(symbol);
            }
        }
        Self {
            symbols: ordered,
            positions,
        }
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Position of `symbol`, if it belongs to the alphabet.
    #[must_use]
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.positions.get(&symbol).copied()
    }

    /// Symbol stored at `index`, if in range.
    #[must_use]
    pub fn symbol_at(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Whether `symbol` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.positions.contains_key(&symbol)
    }

    /// All symbols in index order.
    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

static LATIN: Lazy<AlphabetSet> = Lazy::new(|| AlphabetSet::new(LATIN_SYMBOLS.chars()));

static ARABIC: Lazy<AlphabetSet> =
    Lazy::new(|| AlphabetSet::new(ARABIC_LETTERS.chars().chain(DIGITS.chars())));

static MIXED: Lazy<AlphabetSet> = Lazy::new(|| {
    AlphabetSet::new(
        LATIN_SYMBOLS
            .chars()
            .chain(ARABIC_LETTERS.chars())
            .chain(DIGITS.chars()),
    )
});

/// Returns the alphabet associated with `script`.
#[must_use]
pub fn alphabet_for(script: Script) -> &'static AlphabetSet {
    match script {
        Script::Latin => &LATIN,
        Script::Arabic => &ARABIC,
        Script::Mixed => &MIXED,
    }
}

/// Whether `c` lies in the Arabic or Arabic Supplement blocks.
#[must_use]
pub fn is_arabic(c: char) -> bool {
    matches!(c, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}')
}

/// Detects the dominant script of `text`.
///
/// Arabic-range code points and ASCII letters are counted; a script wins when
/// it accounts for more than half of the counted characters. Equal counts,
/// including zero on both sides, give [`Script::Mixed`].
#[must_use]
pub fn detect_script(text: &str) -> Script {
    let (arabic, latin) = text.chars().fold((0usize, 0usize), |(a, l), c| {
        if is_arabic(c) {
            (a + 1, l)
        } else if c.is_ascii_alphabetic() {
            (a, l + 1)
        } else {
            (a, l)
        }
    });
    // more than half of the counted characters is the same as outnumbering the other side
    if arabic > latin {
        Script::Arabic
    } else if latin > arabic {
        Script::Latin
    } else {
        Script::Mixed
    }
}

/// Maps script variants to the canonical symbol used for index lookup.
///
/// Only applies to [`Script::Arabic`]: the hamza-carrying alef forms become
/// a bare alef, hamza on waw and yaa fold into their carriers, and alef
/// maqsura becomes yaa. Every other symbol is returned unchanged.
#[must_use]
pub const fn normalize(symbol: char, script: Script) -> char {
    match script {
        Script::Arabic => match symbol {
            'أ' | 'إ' | 'آ' => 'ا',
            'ؤ' => 'و',
            'ئ' | 'ى' => 'ي',
            other => other,
        },
        Script::Latin | Script::Mixed => symbol,
    }
}
