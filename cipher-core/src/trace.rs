//! The step trace every engine produces alongside its result.
//!
//! A trace is an ordered list of [`CipherStep`]s, one per consumed input
//! symbol. It is plain data: renderers iterate it as often as they like
//! (e.g. to animate a table) without touching the engine again.

use serde::{Deserialize, Serialize};

/// Whether an engine call encrypts or decrypts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

/// How a step was resolved.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The symbol was transformed normally.
    Applied,
    /// The symbol (or its key symbol) is outside the active alphabet and was
    /// passed through unchanged.
    Ignored,
    /// The decoded value was not a valid character and a placeholder was
    /// emitted instead.
    Placeholder,
}

/// The arithmetic performed in one step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// `output = input ^ key` over one byte.
    Xor {
        /// Input byte.
        input: u8,
        /// Key byte.
        key: u8,
        /// Result byte.
        output: u8,
    },
    /// `output = (input + key) mod modulus` over alphabet indices.
    ModAdd {
        /// Index of the text symbol.
        input: usize,
        /// Index of the key symbol.
        key: usize,
        /// Alphabet size.
        modulus: usize,
        /// Index of the resulting symbol.
        output: usize,
    },
    /// `output = (input - key) mod modulus` over alphabet indices.
    ModSub {
        /// Index of the cipher symbol.
        input: usize,
        /// Index of the key symbol.
        key: usize,
        /// Alphabet size.
        modulus: usize,
        /// Index of the resulting symbol.
        output: usize,
    },
    /// `output = base^exponent mod modulus`.
    ModPow {
        /// Message or cipher integer.
        base: u64,
        /// Public or private exponent.
        exponent: u64,
        /// RSA modulus.
        modulus: u64,
        /// Resulting integer.
        output: u64,
    },
    /// The symbol was placed on (or read from) a zero-based rail.
    Rail {
        /// Zero-based rail number.
        rail: usize,
    },
    /// No arithmetic; the input was copied to the output.
    PassThrough,
}

/// One symbol-level transformation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CipherStep {
    /// Zero-based position of the consumed input symbol.
    pub index: usize,
    /// Display form of the input symbol or byte.
    pub input: String,
    /// Display form of the key symbol or byte consumed, empty when none.
    pub key: String,
    /// The arithmetic performed.
    pub operation: Operation,
    /// Display form of the resulting symbol or byte.
    pub output: String,
    /// Human-readable formula, e.g. `"72 XOR 17 = 89"`.
    pub formula: String,
    /// How the step was resolved.
    pub status: StepStatus,
}

impl CipherStep {
    /// Creates an applied step.
    pub fn applied(
        index: usize,
        input: impl Into<String>,
        key: impl Into<String>,
        operation: Operation,
        output: impl Into<String>,
        formula: impl Into<String>,
    ) -> Self {
        Self {
            index,
            input: input.into(),
            key: key.into(),
            operation,
            output: output.into(),
            formula: formula.into(),
            status: StepStatus::Applied,
        }
    }

    /// Creates a pass-through step for a symbol outside the active alphabet.
    #[must_use]
    pub fn ignored(index: usize, input: char, key: char) -> Self {
        Self {
            index,
            input: input.to_string(),
            key: key.to_string(),
            operation: Operation::PassThrough,
            output: input.to_string(),
            formula: format!("'{input}' is outside the alphabet, kept as is"),
            status: StepStatus::Ignored,
        }
    }

    /// Returns the same step with a different status.
    #[must_use]
    pub const fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the symbol passed through untouched.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.status == StepStatus::Ignored
    }
}

/// An ordered, replayable sequence of [`CipherStep`]s.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct StepTrace {
    steps: Vec<CipherStep>,
}

impl StepTrace {
    /// Creates an empty trace.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Creates an empty trace with room for `capacity` steps.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Appends a step.
    pub fn push(&mut self, step: CipherStep) {
        self.steps.push(step);
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trace has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CipherStep> {
        self.steps.get(index)
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[CipherStep] {
        &self.steps
    }

    /// Iterates the steps without consuming the trace.
    pub fn iter(&self) -> std::slice::Iter<'_, CipherStep> {
        self.steps.iter()
    }

    /// Number of steps that were passed through as ignored.
    #[must_use]
    pub fn ignored_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_ignored()).count()
    }

    /// Serializes the trace as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders the trace as a plain-text table of
    /// `index | input | key | formula | output`.
    #[must_use]
    pub fn render_table(&self) -> String {
        let header = table_row("#", "input", "key", "formula", "output");
        let mut out = format!("{header}\n{:-<80}\n", "");
        for step in &self.steps {
            out.push_str(&table_row(
                &step.index.to_string(),
                &step.input,
                &step.key,
                &step.formula,
                &step.output,
            ));
            out.push('\n');
        }
        out
    }
}

fn table_row(index: &str, input: &str, key: &str, formula: &str, output: &str) -> String {
    format!("{index:>5} | {input:<8} | {key:<8} | {formula:<40} | {output}")
}

impl<'a> IntoIterator for &'a StepTrace {
    type Item = &'a CipherStep;
    type IntoIter = std::slice::Iter<'a, CipherStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for StepTrace {
    type Item = CipherStep;
    type IntoIter = std::vec::IntoIter<CipherStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl FromIterator<CipherStep> for StepTrace {
    fn from_iter<I: IntoIterator<Item = CipherStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StepTrace {
        let mut trace = StepTrace::new();
        trace.push(CipherStep::applied(
            0,
            "H",
            "17",
            Operation::Xor {
                input: 72,
                key: 17,
                output: 89,
            },
            "Y",
            "72 XOR 17 = 89",
        ));
        trace.push(CipherStep::ignored(1, ' ', 'K'));
        trace
    }

    #[test]
    fn test_trace_is_replayable() {
        let trace = sample();
        let first: Vec<_> = trace.iter().map(|s| s.index).collect();
        let second: Vec<_> = (&trace).into_iter().map(|s| s.index).collect();
        assert_eq!(first, second);
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn test_ignored_step_keeps_input() {
        let trace = sample();
        let step = trace.get(1).unwrap();
        assert!(step.is_ignored());
        assert_eq!(step.output, " ");
        assert_eq!(step.operation, Operation::PassThrough);
        assert_eq!(trace.ignored_count(), 1);
    }

    #[test]
    fn test_json_export() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["operation"]["kind"], "xor");
        assert_eq!(value[0]["status"], "applied");
        assert_eq!(value[1]["status"], "ignored");
    }

    #[test]
    fn test_render_table_lists_every_step() {
        let table = sample().render_table();
        assert!(table.contains("72 XOR 17 = 89"));
        assert_eq!(table.lines().count(), 4);
        assert!(table.starts_with("    # | input    | key      | formula"));
        assert_eq!(table.lines().nth(1), Some("-".repeat(80).as_str()));
    }
}
