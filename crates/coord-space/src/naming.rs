//! Scope name generation strategies
//!
//! Every generator returns the first name of an infinite sequence that is
//! absent from the set of names already in use. Because the used set is
//! finite and the sequence is not, every call terminates.

use std::collections::HashSet;

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Strategy for minting new scope names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeNamer {
    /// Spreadsheet-column names.
    /// `A`, `B`, ..., `Z`, `AA`, `AB`, ...
    #[default]
    Alphabetic,

    /// Non-negative integers.
    /// `0`, `1`, `2`, ...
    Numeric,

    /// Integers behind a fixed prefix, disjoint from the alphabetic sequence
    /// for any prefix that is not itself uppercase letters.
    /// `link_0`, `link_1`, ...
    PrefixedNumeric(String),
}

impl ScopeNamer {
    /// Return the next unused name for this strategy.
    pub fn next_name(&self, used: &HashSet<String>) -> String {
        match self {
            ScopeNamer::Alphabetic => next_alphabetic_name(used),
            ScopeNamer::Numeric => next_numeric_name(used),
            ScopeNamer::PrefixedNumeric(prefix) => next_prefixed_numeric_name(prefix, used),
        }
    }
}

/// Return the first name in `A, B, ..., Z, AA, AB, ...` not present in `used`.
pub fn next_alphabetic_name(used: &HashSet<String>) -> String {
    (0..)
        .map(alphabetic_name)
        .find(|name| !used.contains(name))
        .unwrap_or_default()
}

/// Return the smallest non-negative integer, as a string, not present in `used`.
pub fn next_numeric_name(used: &HashSet<String>) -> String {
    (0u64..)
        .map(|i| i.to_string())
        .find(|name| !used.contains(name))
        .unwrap_or_default()
}

/// Build a generator that mints `prefix0`, `prefix1`, ... skipping names in use.
pub fn prefixed_numeric_name_factory(prefix: impl Into<String>) -> impl Fn(&HashSet<String>) -> String {
    let prefix = prefix.into();
    move |used| next_prefixed_numeric_name(&prefix, used)
}

fn next_prefixed_numeric_name(prefix: &str, used: &HashSet<String>) -> String {
    (0u64..)
        .map(|i| format!("{prefix}{i}"))
        .find(|name| !used.contains(name))
        .unwrap_or_default()
}

/// Map a zero-based index to its spreadsheet-column name.
///
/// This is bijective base-26: there is no zero digit, so index 26 is `AA`
/// rather than `BA`.
fn alphabetic_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(ALPHABET[rem] as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
