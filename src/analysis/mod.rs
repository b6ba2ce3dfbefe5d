//! Source structural analysis.
//!
//! This module turns raw smart-contract source into a `ParsedModule`:
//! functions, structs/resources, constants, imports, documentation,
//! complexity and heuristic signals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source text     │────▶│ Analyzer     │────▶│ ParsedModule  │
//! │ + file name     │     │ (dispatch)   │     │               │
//! └─────────────────┘     └──────┬───────┘     └───────────────┘
//!                                │
//!                  ┌─────────────┼──────────────┐
//!                  ▼             ▼              ▼
//!           ┌────────────┐ ┌────────────┐ ┌────────────┐
//!           │ Rust       │ │ Move       │ │ Generic    │
//!           │ extractor  │ │ extractor  │ │ fallback   │
//!           └─────┬──────┘ └─────┬──────┘ └────────────┘
//!                 └──────┬───────┘
//!                        ▼
//!       body / complexity / comments / signature / rules
//! ```
//!
//! Extraction is lexical: regular expressions locate declarations, and
//! bracket counting resolves parameter lists and bodies. There is no
//! grammar, so unusual formatting degrades output rather than failing.
//!
//! # Adding a New Language
//!
//! 1. Create a module in `src/analysis/languages/` (e.g., `cairo.rs`)
//! 2. Implement `LanguageExtractor`, including its two rule tables
//! 3. Add a `Language` variant and register the extractor in `languages/mod.rs`

mod analyzer;
pub mod body;
pub mod comments;
pub mod complexity;
mod languages;
mod model;
mod rules;
pub mod signature;
mod traits;

pub use analyzer::{analyze, Analyzer};
pub use languages::{
    extractors, generic, get_extractor, get_extractor_for_extension, registered_extensions,
    MoveExtractor, RustExtractor,
};
pub use model::{
    ComplexityMetrics, ModuleKind, ParsedConstant, ParsedFunction, ParsedModule, ParsedStruct,
    TypedName, Visibility,
};
pub use rules::{Rule, RuleKind, RuleSpec, RuleTable};
pub use traits::{ImportSet, Language, LanguageExtractor};

/// Regex prefix for declaration patterns: a declaration begins a line or
/// follows `;`, a brace, the `]` of an attribute, or the end of a comment.
/// Patterns put the declaration itself in a `decl` group.
pub(crate) const DECL_START: &str = r"(?m)(?:^|[;{}\]/])[ \t\r\n]*";

/// Whether `offset` follows a `//` on its own line.
pub(crate) fn in_line_comment(source: &str, offset: usize) -> bool {
    let offset = offset.min(source.len());
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..offset].contains("//")
}

/// 1-indexed line containing byte `offset`.
pub(crate) fn line_number(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}
