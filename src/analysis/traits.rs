//! Core traits for language extraction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    comments, ModuleKind, ParsedConstant, ParsedFunction, ParsedStruct, RuleKind, RuleTable,
};
use crate::error::AnalyzeError;

/// Languages with a dedicated extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Rust,
    Move,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Rust, Language::Move];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Move => "move",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = AnalyzeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rust" | "rs" => Ok(Language::Rust),
            "move" => Ok(Language::Move),
            other => Err(AnalyzeError::InvalidInput(format!(
                "unsupported language hint {:?} (expected \"rust\" or \"move\")",
                other
            ))),
        }
    }
}

/// Imports found in a file plus the external packages they refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    pub imports: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Language-specific extractor.
///
/// Each supported language implements this trait; the registry in
/// `languages/mod.rs` selects one per file. Implementations hold only
/// immutable compiled patterns and are shared across threads.
pub trait LanguageExtractor: Send + Sync {
    /// The language this extractor handles.
    fn language(&self) -> Language;

    /// The module kind recorded on output.
    fn module_kind(&self) -> ModuleKind;

    /// File extensions handled, without the dot.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Function declarations in source order.
    fn extract_functions(&self, source: &str) -> Vec<ParsedFunction>;

    /// Struct/resource declarations in source order.
    fn extract_structs(&self, source: &str) -> Vec<ParsedStruct>;

    /// Constant declarations in source order.
    fn extract_constants(&self, source: &str) -> Vec<ParsedConstant>;

    /// Import paths and the dependencies they name.
    fn extract_imports(&self, source: &str) -> ImportSet;

    /// Built-in rule table for a detector kind.
    fn rules(&self, kind: RuleKind) -> &RuleTable;

    /// Module-level documentation from the file header.
    fn module_doc_comments(&self, source: &str) -> Vec<String> {
        comments::module_doc_comments(source)
    }

    /// Language features present in the file.
    fn detect_features(&self, source: &str) -> Vec<String> {
        self.rules(RuleKind::LanguageFeature).evaluate(source)
    }

    /// Security insights for the file.
    fn detect_insights(&self, source: &str) -> Vec<String> {
        self.rules(RuleKind::SecurityInsight).evaluate(source)
    }

    /// Check if this extractor handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
