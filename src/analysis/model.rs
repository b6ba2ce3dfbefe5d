//! Structural model produced for every analyzed source file.
//!
//! Field names are serialized in snake_case and form the public output
//! contract consumed by documentation and reporting tools.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of module a file was analyzed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    RustCrate,
    MoveModule,
}

impl ModuleKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::RustCrate => "rust_crate",
            ModuleKind::MoveModule => "move_module",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared visibility of a function or constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `name: type` pair, used for both parameters and struct fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedName {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedName {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A function extracted from source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFunction {
    pub name: String,
    pub visibility: Visibility,
    pub parameters: Vec<TypedName>,
    pub return_type: Option<String>,
    pub doc_comments: Vec<String>,
    /// Raw text between the body braces (empty for bodiless declarations).
    pub body: String,
    /// Line of the declaration (1-indexed).
    pub line_number: usize,
    /// Approximate cyclomatic complexity, always at least 1.
    pub complexity_score: u32,
    /// Move `entry` functions. Always false for other languages.
    #[serde(default)]
    pub is_entry_function: bool,
    /// Qualifier keywords preceding `fn`/`fun`, in source order.
    pub modifiers: Vec<String>,
}

/// A struct (Rust) or resource/struct (Move) declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStruct {
    pub name: String,
    pub fields: Vec<TypedName>,
    pub doc_comments: Vec<String>,
    pub line_number: usize,
    #[serde(default)]
    pub has_copy: bool,
    #[serde(default)]
    pub has_drop: bool,
    #[serde(default)]
    pub has_store: bool,
    #[serde(default)]
    pub has_key: bool,
}

impl ParsedStruct {
    /// Names of the Move abilities declared on this struct.
    pub fn abilities(&self) -> Vec<&'static str> {
        let mut abilities = Vec::new();
        if self.has_copy {
            abilities.push("copy");
        }
        if self.has_drop {
            abilities.push("drop");
        }
        if self.has_store {
            abilities.push("store");
        }
        if self.has_key {
            abilities.push("key");
        }
        abilities
    }
}

/// A `const`/`static` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedConstant {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub visibility: Visibility,
    pub is_mutable: bool,
    /// Raw right-hand side text, unparsed.
    pub value: String,
    pub doc_comments: Vec<String>,
    pub line_number: usize,
}

/// Roll-up counts for a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    /// Sum of the complexity scores of every function in the module.
    pub cyclomatic_complexity: u32,
    pub function_count: usize,
    pub struct_count: usize,
    pub const_count: usize,
}

/// The normalized output record for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModule {
    pub name: String,
    pub module_kind: ModuleKind,
    pub functions: Vec<ParsedFunction>,
    pub structs: Vec<ParsedStruct>,
    pub constants: Vec<ParsedConstant>,
    /// Module-level header documentation.
    pub doc_comments: Vec<String>,
    pub imports: Vec<String>,
    pub dependencies: Vec<String>,
    pub total_lines: usize,
    pub complexity_metrics: ComplexityMetrics,
    pub security_insights: Vec<String>,
    pub language_features: Vec<String>,
}

impl ParsedModule {
    /// Create an empty module record.
    pub fn empty(name: &str, module_kind: ModuleKind) -> Self {
        Self {
            name: name.to_string(),
            module_kind,
            functions: Vec::new(),
            structs: Vec::new(),
            constants: Vec::new(),
            doc_comments: Vec::new(),
            imports: Vec::new(),
            dependencies: Vec::new(),
            total_lines: 1,
            complexity_metrics: ComplexityMetrics::default(),
            security_insights: Vec::new(),
            language_features: Vec::new(),
        }
    }

    /// Find a function by name.
    pub fn find_function(&self, name: &str) -> Option<&ParsedFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Find a struct by name.
    pub fn find_struct(&self, name: &str) -> Option<&ParsedStruct> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Find a constant by name.
    pub fn find_constant(&self, name: &str) -> Option<&ParsedConstant> {
        self.constants.iter().find(|c| c.name == name)
    }

    /// Public functions only.
    pub fn public_functions(&self) -> impl Iterator<Item = &ParsedFunction> {
        self.functions.iter().filter(|f| f.visibility.is_public())
    }

    /// Recompute `complexity_metrics` from the extracted collections.
    pub fn refresh_metrics(&mut self) {
        self.complexity_metrics = ComplexityMetrics {
            cyclomatic_complexity: self.functions.iter().map(|f| f.complexity_score).sum(),
            function_count: self.functions.len(),
            struct_count: self.structs.len(),
            const_count: self.constants.len(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, score: u32) -> ParsedFunction {
        ParsedFunction {
            name: name.to_string(),
            visibility: Visibility::Private,
            parameters: Vec::new(),
            return_type: None,
            doc_comments: Vec::new(),
            body: String::new(),
            line_number: 1,
            complexity_score: score,
            is_entry_function: false,
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn test_refresh_metrics() {
        let mut module = ParsedModule::empty("pool", ModuleKind::RustCrate);
        module.functions.push(function("deposit", 3));
        module.functions.push(function("withdraw", 2));
        module.structs.push(ParsedStruct {
            name: "Pool".to_string(),
            ..Default::default()
        });
        module.refresh_metrics();

        assert_eq!(module.complexity_metrics.cyclomatic_complexity, 5);
        assert_eq!(module.complexity_metrics.function_count, 2);
        assert_eq!(module.complexity_metrics.struct_count, 1);
        assert_eq!(module.complexity_metrics.const_count, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut module = ParsedModule::empty("coin", ModuleKind::MoveModule);
        module.constants.push(ParsedConstant {
            name: "E_ZERO".to_string(),
            ty: "u64".to_string(),
            visibility: Visibility::Private,
            is_mutable: false,
            value: "0".to_string(),
            doc_comments: Vec::new(),
            line_number: 3,
        });
        module.refresh_metrics();

        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["module_kind"], "move_module");
        assert_eq!(json["total_lines"], 1);
        assert_eq!(json["complexity_metrics"]["const_count"], 1);
        assert_eq!(json["constants"][0]["type"], "u64");
        assert_eq!(json["constants"][0]["visibility"], "private");
        assert!(json["security_insights"].as_array().unwrap().is_empty());
        assert!(json["language_features"].as_array().unwrap().is_empty());
        assert!(json.get("doc_comments").is_some());
    }

    #[test]
    fn test_struct_abilities() {
        let coin = ParsedStruct {
            name: "Coin".to_string(),
            has_key: true,
            has_store: true,
            ..Default::default()
        };
        assert_eq!(coin.abilities(), vec!["store", "key"]);
    }
}
