//! Caller-facing error type.
//!
//! Malformed source never produces an error: it degrades into partial
//! output with explicit markers. Only unusable input is rejected.

use thiserror::Error;

/// Errors surfaced to callers of the analyzer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
