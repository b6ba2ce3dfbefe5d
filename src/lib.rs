//! Contractscope - structural analysis for smart-contract source code.
//!
//! Contractscope reads Rust (Solana/Anchor) and Move sources and produces a
//! normalized `ParsedModule` per file: functions with signatures, bodies
//! and complexity scores, structs with Move abilities, constants, imports,
//! documentation, language-feature tags and security observations.
//!
//! # Architecture
//!
//! - `analysis`: lexical extractors, complexity scoring and heuristic rules
//! - `batch`: directory scans and parallel analysis of many files
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (pretty, JSON)
//! - `cli`: the `contractscope` command
//!
//! # Example
//!
//! ```
//! let module = contractscope::analyze(
//!     "pub fn f(a: u64) -> bool { if a > 0 { true } else { false } }",
//!     "lib.rs",
//!     None,
//! );
//! assert_eq!(module.functions[0].complexity_score, 3);
//! ```

pub mod analysis;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;

pub use analysis::{
    analyze, Analyzer, Language, LanguageExtractor, ModuleKind, ParsedConstant, ParsedFunction,
    ParsedModule, ParsedStruct, Visibility,
};
pub use batch::FileAnalysis;
pub use config::Config;
pub use error::AnalyzeError;
