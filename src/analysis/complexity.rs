//! Keyword-count approximation of cyclomatic complexity.
//!
//! complexity = 1 + number of control keyword occurrences in a body.
//!
//! This intentionally overcounts compared to a decision-point graph: `else`
//! is counted independently of its `if`, `else if` counts twice, and `?`
//! counts every error-propagation site.

use lazy_static::lazy_static;
use regex::Regex;

/// Keywords matched with word-boundary semantics.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "loop", "match", "case", "and", "or", "try", "catch", "when",
];

/// Operators matched literally.
pub const CONTROL_OPERATORS: &[&str] = &["&&", "||", "?"];

lazy_static! {
    static ref CONTROL_PATTERN: Regex = {
        let words = CONTROL_KEYWORDS.join("|");
        let operators: Vec<String> = CONTROL_OPERATORS.iter().map(|op| regex::escape(op)).collect();
        Regex::new(&format!(r"\b(?:{})\b|{}", words, operators.join("|"))).unwrap()
    };
}

/// Score the complexity of a function body.
pub fn score(body: &str) -> u32 {
    1 + CONTROL_PATTERN.find_iter(body).count() as u32
}
