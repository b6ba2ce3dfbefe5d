//! Rust extractor.
//!
//! Extracts:
//! - Free functions and impl/trait methods (one unified declaration pattern,
//!   so every `fn` occurrence is reported exactly once)
//! - Struct declarations (named, tuple and unit)
//! - `const` / `static` items
//! - `use` and `extern crate` imports
//!
//! Built-in heuristics cover general Rust features plus Solana/Anchor
//! program idioms.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;

use crate::analysis::{
    body, comments, complexity, in_line_comment, line_number, signature, ImportSet, Language,
    LanguageExtractor, ModuleKind, ParsedConstant, ParsedFunction, ParsedStruct, RuleKind,
    RuleTable, Visibility, DECL_START,
};

lazy_static! {
    /// Function declarations, up to the `<` or `(` after the name.
    static ref FN_PATTERN: Regex = Regex::new(&format!(
        r#"{}(?P<decl>(?P<mods>(?:(?:pub(?:\s*\([^)]*\))?|default|const|async|unsafe|extern(?:\s+"[^"]*")?)\s+)*)fn\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*))\s*(?P<open>[<(])"#,
        DECL_START
    )).unwrap();

    /// Individual qualifier tokens within the `mods` capture.
    static ref MODIFIER_TOKEN: Regex = Regex::new(
        r#"pub(?:\s*\([^)]*\))?|default|const|async|unsafe|extern(?:\s+"[^"]*")?"#
    ).unwrap();

    static ref STRUCT_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?:pub(?:\s*\([^)]*\))?\s+)?struct\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*))",
        DECL_START
    )).unwrap();

    /// Const/static declarations, up to and including the `:` before the type.
    static ref CONST_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?P<vis>pub(?:\s*\([^)]*\))?\s+)?(?P<kind>const|static)\s+(?P<mut>mut\s+)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*:)",
        DECL_START
    )).unwrap();

    static ref USE_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?:pub(?:\s*\([^)]*\))?\s+)?use\s+(?P<path>[^;]+))",
        DECL_START
    )).unwrap();

    static ref EXTERN_CRATE_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>extern\s+crate\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*))",
        DECL_START
    )).unwrap();

    static ref WHERE_CLAUSE: Regex = Regex::new(r"\bwhere\b").unwrap();
}

/// Path roots that never name an external crate.
static BUILTIN_ROOTS: phf::Set<&'static str> = phf_set! {
    "std", "core", "alloc", "crate", "self", "super", "Self",
};

const FEATURE_RULES: &[(&str, &str)] = &[
    (r"\basync\s+fn\b", "async_functions"),
    (r"\bunsafe\b", "unsafe_code"),
    (r"#\[derive\(", "derive_macros"),
    (r"\btrait\s+[A-Za-z_]\w*", "traits"),
    (r"(?m)^\s*impl\b[^{;]*\bfor\b", "trait_implementations"),
    (r"\benum\s+[A-Za-z_]\w*", "enums"),
    (r"<\s*'[a-z_]\w*", "lifetimes"),
    (r"\bmacro_rules!", "declarative_macros"),
    (r"\bResult<", "result_error_handling"),
    (r"#\[cfg\(test\)\]", "unit_tests"),
    (r"#\[program\]", "anchor_program"),
    (r"#\[derive\([^)]*\bAccounts\b", "anchor_accounts"),
    (r"#\[account\b", "anchor_account_constraints"),
    (r"\bdeclare_id!", "program_id_declaration"),
    (r"\bentrypoint!", "native_entrypoint"),
    (r"\bCpiContext\b|\binvoke(?:_signed)?\s*\(", "cross_program_invocation"),
    (r"\bmsg!", "program_logging"),
];

const INSIGHT_RULES: &[(&str, &str)] = &[
    (
        r"\bunsafe\b",
        "Contains unsafe code blocks - memory safety is not enforced by the compiler",
    ),
    (
        r"\.unwrap\(\)",
        "Uses unwrap() which can panic on None or Err values",
    ),
    (
        r"\.expect\(",
        "Uses expect() which can panic on None or Err values",
    ),
    (r"\bpanic!", "Explicit panic! calls abort execution"),
    (
        r"\btransmute\b",
        "Uses transmute which bypasses type checking",
    ),
    (
        r"\bstatic\s+mut\b",
        "Mutable static state detected - concurrent access is not synchronized",
    ),
    (
        r"\bUncheckedAccount\b",
        "Uses UncheckedAccount - owner and type checks must be performed manually",
    ),
    (
        r"\bAccountInfo\b",
        "Raw AccountInfo usage - verify owner and signer checks are performed",
    ),
    (
        r"\btry_borrow_mut_lamports\b|\.lamports\(\)",
        "Direct lamport manipulation detected - verify balance arithmetic and ownership",
    ),
    (
        r"\binvoke(?:_signed)?\s*\(|\bCpiContext::new",
        "Cross-program invocation detected - verify target program IDs and account validation",
    ),
    (
        r"\bwrapping_(?:add|sub|mul)\b",
        "Uses wrapping arithmetic - overflow silently wraps around",
    ),
    (
        r"\bchecked_(?:add|sub|mul|div)\b",
        "Uses checked arithmetic for overflow protection",
    ),
];

/// Rust extractor.
pub struct RustExtractor {
    features: RuleTable,
    insights: RuleTable,
}

impl RustExtractor {
    pub fn new() -> Self {
        Self {
            features: RuleTable::from_static(FEATURE_RULES),
            insights: RuleTable::from_static(INSIGHT_RULES),
        }
    }
}

impl Default for RustExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for RustExtractor {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn module_kind(&self) -> ModuleKind {
        ModuleKind::RustCrate
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn extract_functions(&self, source: &str) -> Vec<ParsedFunction> {
        FN_PATTERN
            .captures_iter(source)
            .filter_map(|caps| {
                let decl = caps.name("decl")?;
                if in_line_comment(source, decl.start()) {
                    return None;
                }
                let name = caps.name("name")?.as_str().to_string();
                let modifiers: Vec<String> = caps
                    .name("mods")
                    .map(|m| {
                        MODIFIER_TOKEN
                            .find_iter(m.as_str())
                            .map(|t| signature::collapse_whitespace(t.as_str()))
                            .collect()
                    })
                    .unwrap_or_default();
                let visibility = if modifiers.iter().any(|m| m.starts_with("pub")) {
                    Visibility::Public
                } else {
                    Visibility::Private
                };

                let params_start =
                    signature::parameter_list_start(source, caps.name("open")?.start())?;
                let params_end = body::find_matching(source, params_start, '(', ')');
                let (parameters, tail_start) = match params_end {
                    Some(end) => (
                        signature::parse_parameters(&source[params_start..end], true),
                        end + 1,
                    ),
                    None => (Vec::new(), source.len()),
                };

                let tail = &source[tail_start..];
                let terminator = signature::find_top_level(tail, &['{', ';'], true);
                let sig_tail = match terminator {
                    Some((pos, _)) => &tail[..pos],
                    None => tail,
                };
                let body_text = match terminator {
                    Some((pos, '{')) => body::resolve_body(source, tail_start + pos + 1),
                    _ => "",
                };

                Some(ParsedFunction {
                    name,
                    visibility,
                    parameters,
                    return_type: return_type(sig_tail),
                    doc_comments: comments::item_doc_comments(source, decl.start()),
                    body: body_text.to_string(),
                    line_number: line_number(source, decl.start()),
                    complexity_score: complexity::score(body_text),
                    is_entry_function: false,
                    modifiers,
                })
            })
            .collect()
    }

    fn extract_structs(&self, source: &str) -> Vec<ParsedStruct> {
        STRUCT_PATTERN
            .captures_iter(source)
            .filter_map(|caps| {
                let decl = caps.name("decl")?;
                if in_line_comment(source, decl.start()) {
                    return None;
                }
                let name = caps.name("name")?.as_str().to_string();

                let rest = &source[decl.end()..];
                let (pos, ch) = signature::find_top_level(rest, &['{', ';', '('], true)?;
                let fields = match ch {
                    '{' => signature::parse_fields(body::resolve_body(source, decl.end() + pos + 1)),
                    '(' => {
                        let start = decl.end() + pos + 1;
                        match body::find_matching(source, start, '(', ')') {
                            Some(end) => signature::parse_tuple_fields(&source[start..end]),
                            None => Vec::new(),
                        }
                    }
                    _ => Vec::new(),
                };

                Some(ParsedStruct {
                    name,
                    fields,
                    doc_comments: comments::item_doc_comments(source, decl.start()),
                    line_number: line_number(source, decl.start()),
                    ..Default::default()
                })
            })
            .collect()
    }

    fn extract_constants(&self, source: &str) -> Vec<ParsedConstant> {
        CONST_PATTERN
            .captures_iter(source)
            .filter_map(|caps| {
                let decl = caps.name("decl")?;
                if in_line_comment(source, decl.start()) {
                    return None;
                }
                let (ty, value) = signature::parse_declaration_tail(&source[decl.end()..])?;

                Some(ParsedConstant {
                    name: caps.name("name")?.as_str().to_string(),
                    ty,
                    visibility: if caps.name("vis").is_some() {
                        Visibility::Public
                    } else {
                        Visibility::Private
                    },
                    is_mutable: caps.name("mut").is_some(),
                    value,
                    doc_comments: comments::item_doc_comments(source, decl.start()),
                    line_number: line_number(source, decl.start()),
                })
            })
            .collect()
    }

    fn extract_imports(&self, source: &str) -> ImportSet {
        let mut imports = BTreeSet::new();
        let mut dependencies = BTreeSet::new();

        for caps in USE_PATTERN.captures_iter(source) {
            let (Some(decl), Some(path)) = (caps.name("decl"), caps.name("path")) else {
                continue;
            };
            if !source[path.end()..].starts_with(';') || in_line_comment(source, decl.start()) {
                continue;
            }
            let path = signature::collapse_whitespace(path.as_str());
            for root in crate_roots(&path) {
                if !BUILTIN_ROOTS.contains(root) {
                    dependencies.insert(root.to_string());
                }
            }
            imports.insert(path);
        }

        for caps in EXTERN_CRATE_PATTERN.captures_iter(source) {
            let Some(decl) = caps.name("decl") else {
                continue;
            };
            if in_line_comment(source, decl.start()) {
                continue;
            }
            if let Some(name) = caps.name("name") {
                let name = name.as_str();
                imports.insert(name.to_string());
                if !BUILTIN_ROOTS.contains(name) {
                    dependencies.insert(name.to_string());
                }
            }
        }

        ImportSet {
            imports: imports.into_iter().collect(),
            dependencies: dependencies.into_iter().collect(),
        }
    }

    fn rules(&self, kind: RuleKind) -> &RuleTable {
        match kind {
            RuleKind::LanguageFeature => &self.features,
            RuleKind::SecurityInsight => &self.insights,
        }
    }
}

/// Return type from the text between `)` and the body/semicolon.
fn return_type(sig_tail: &str) -> Option<String> {
    let (_, after_arrow) = sig_tail.split_once("->")?;
    let ty = match WHERE_CLAUSE.find(after_arrow) {
        Some(m) => &after_arrow[..m.start()],
        None => after_arrow,
    };
    let ty = signature::collapse_whitespace(ty);
    if ty.is_empty() {
        None
    } else {
        Some(ty)
    }
}

/// Root crate names of a use path (`::anchor_lang::prelude::*` -> `anchor_lang`).
/// A braced root group such as `{anchor_lang::prelude::*, borsh::BorshSerialize}`
/// yields the root of every member.
fn crate_roots(path: &str) -> Vec<&str> {
    let path = path.trim().trim_start_matches("::").trim_start();
    if let Some(group) = path.strip_prefix('{') {
        let inner = group.strip_suffix('}').unwrap_or(group);
        return signature::split_top_level(inner, &[','])
            .into_iter()
            .flat_map(crate_roots)
            .collect();
    }

    let root = path
        .split("::")
        .next()
        .and_then(|segment| {
            segment
                .split(|c: char| c == '{' || c == '}' || c.is_whitespace())
                .next()
        })
        .unwrap_or("");
    if root.is_empty() || root == "*" {
        Vec::new()
    } else {
        vec![root]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TypedName;

    #[test]
    fn test_simple_function() {
        let extractor = RustExtractor::new();
        let source = "pub fn f(a: u64) -> bool { if a > 0 { true } else { false } }";
        let funcs = extractor.extract_functions(source);

        assert_eq!(funcs.len(), 1);
        let f = &funcs[0];
        assert_eq!(f.name, "f");
        assert_eq!(f.visibility, Visibility::Public);
        assert_eq!(f.parameters, vec![TypedName::new("a", "u64")]);
        assert_eq!(f.return_type.as_deref(), Some("bool"));
        assert_eq!(f.complexity_score, 3);
        assert_eq!(f.line_number, 1);
        assert!(!f.is_entry_function);
        assert_eq!(f.modifiers, vec!["pub"]);
    }

    #[test]
    fn test_impl_methods_counted_once() {
        let extractor = RustExtractor::new();
        let source = r#"
struct Vault;

impl Vault {
    /// Create a vault.
    pub fn new() -> Self {
        Vault
    }

    fn balance(&self, owner: &Pubkey) -> u64 {
        0
    }
}

fn helper() {}
"#;
        let funcs = extractor.extract_functions(source);
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["new", "balance", "helper"]);

        assert_eq!(funcs[0].doc_comments, vec!["Create a vault."]);
        assert_eq!(funcs[0].line_number, 6);
        assert_eq!(funcs[1].visibility, Visibility::Private);
        // &self receiver is not a name: type parameter
        assert_eq!(funcs[1].parameters, vec![TypedName::new("owner", "&Pubkey")]);
        assert_eq!(funcs[2].return_type, None);
    }

    #[test]
    fn test_modifiers_and_generics() {
        let extractor = RustExtractor::new();
        let source = r#"
pub(crate) async unsafe fn run<T: Into<String>>(mut input: T) -> Result<Vec<u8>, Error>
where
    T: Send,
{
    loop { if done()? { break; } }
}
"#;
        let funcs = extractor.extract_functions(source);
        assert_eq!(funcs.len(), 1);
        let f = &funcs[0];
        assert_eq!(f.modifiers, vec!["pub(crate)", "async", "unsafe"]);
        assert_eq!(f.visibility, Visibility::Public);
        assert_eq!(f.parameters, vec![TypedName::new("input", "T")]);
        assert_eq!(f.return_type.as_deref(), Some("Result<Vec<u8>, Error>"));
        // 1 + loop + if + ?
        assert_eq!(f.complexity_score, 4);
    }

    #[test]
    fn test_closure_bounds_in_generics() {
        let extractor = RustExtractor::new();
        let source = "pub fn apply<F: Fn(u64) -> u64>(f: F, x: u64) -> u64 { if x > 0 { f(x) } else { 0 } }\n\
                      fn each<T, F>(items: &[T], mut f: F) where F: FnMut(&T) { for i in items { f(i) } }";
        let funcs = extractor.extract_functions(source);
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["apply", "each"]);

        assert_eq!(
            funcs[0].parameters,
            vec![TypedName::new("f", "F"), TypedName::new("x", "u64")]
        );
        assert_eq!(funcs[0].return_type.as_deref(), Some("u64"));
        assert_eq!(funcs[0].complexity_score, 3);
        assert_eq!(funcs[1].parameters[1], TypedName::new("f", "F"));
        assert_eq!(funcs[1].complexity_score, 2);
    }

    #[test]
    fn test_declarations_sharing_a_line() {
        let extractor = RustExtractor::new();
        let source = r#"
impl Vault { pub fn open() -> u8 { 1 } fn close(&self) {} }
#[inline] pub fn fast() {}
mod inner { pub struct Ticket { pub id: u64 } const LIMIT: u8 = 3; }
// fn commented_out() {}
"#;
        let funcs = extractor.extract_functions(source);
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["open", "close", "fast"]);
        assert_eq!(funcs[0].return_type.as_deref(), Some("u8"));
        assert_eq!(funcs[2].line_number, 3);

        let structs = extractor.extract_structs(source);
        assert_eq!(structs.len(), 1);
        assert_eq!(structs[0].fields, vec![TypedName::new("id", "u64")]);

        let consts = extractor.extract_constants(source);
        assert_eq!(consts.len(), 1);
        assert_eq!(consts[0].name, "LIMIT");
        assert_eq!(consts[0].value, "3");
    }

    #[test]
    fn test_bodiless_trait_method() {
        let extractor = RustExtractor::new();
        let source = "trait Hash {\n    fn digest(&self) -> [u8; 32];\n}\n";
        let funcs = extractor.extract_functions(source);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].return_type.as_deref(), Some("[u8; 32]"));
        assert_eq!(funcs[0].body, "");
        assert_eq!(funcs[0].complexity_score, 1);
    }

    #[test]
    fn test_structs() {
        let extractor = RustExtractor::new();
        let source = r#"
/// Pool state.
#[account]
pub struct Pool {
    pub total_supply: u64,
    pub admin: Pubkey,
}

pub struct Marker;

struct Pair(pub u64, String);

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub pool: Account<'info, Pool>,
}
"#;
        let structs = extractor.extract_structs(source);
        let names: Vec<&str> = structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Pool", "Marker", "Pair", "Deposit"]);

        assert_eq!(structs[0].doc_comments, vec!["Pool state."]);
        assert_eq!(
            structs[0].fields,
            vec![
                TypedName::new("total_supply", "u64"),
                TypedName::new("admin", "Pubkey")
            ]
        );
        assert!(structs[1].fields.is_empty());
        assert_eq!(structs[2].fields[1], TypedName::new("1", "String"));
        assert_eq!(
            structs[3].fields,
            vec![TypedName::new("pool", "Account<'info, Pool>")]
        );
        assert!(!structs[0].has_key);
    }

    #[test]
    fn test_constants() {
        let extractor = RustExtractor::new();
        let source = r#"
/// Seed for the vault PDA.
pub const VAULT_SEED: &[u8] = b"vault";
static mut COUNTER: u32 = 0;
const ZERO_KEY: [u8; 32] = [0u8; 32];
pub const fn not_a_constant() -> u8 { 1 }
"#;
        let consts = extractor.extract_constants(source);
        assert_eq!(consts.len(), 3);

        assert_eq!(consts[0].name, "VAULT_SEED");
        assert_eq!(consts[0].ty, "&[u8]");
        assert_eq!(consts[0].value, "b\"vault\"");
        assert_eq!(consts[0].visibility, Visibility::Public);
        assert_eq!(consts[0].doc_comments, vec!["Seed for the vault PDA."]);

        assert_eq!(consts[1].name, "COUNTER");
        assert!(consts[1].is_mutable);
        assert_eq!(consts[1].visibility, Visibility::Private);

        assert_eq!(consts[2].ty, "[u8; 32]");
        assert_eq!(consts[2].value, "[0u8; 32]");
        assert_eq!(consts[2].line_number, 5);
    }

    #[test]
    fn test_imports_and_dependencies() {
        let extractor = RustExtractor::new();
        let source = r#"
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use std::collections::HashMap;
use super::*;
pub use crate::state::Pool;
extern crate borsh;
use anchor_lang::solana_program;
"#;
        let set = extractor.extract_imports(source);
        assert_eq!(set.dependencies, vec!["anchor_lang", "anchor_spl", "borsh"]);
        assert!(set.imports.contains(&"anchor_spl::token::{self, Token, TokenAccount, Transfer}".to_string()));
        assert!(set.imports.contains(&"std::collections::HashMap".to_string()));
        assert_eq!(set.imports.len(), 7);
    }

    #[test]
    fn test_grouped_root_import() {
        let extractor = RustExtractor::new();
        let source = "use {anchor_lang::prelude::*, borsh::{BorshSerialize, BorshDeserialize}};\n\
                      mod m { use std::fmt; use spl_token::state::Account; }";
        let set = extractor.extract_imports(source);
        assert_eq!(set.dependencies, vec!["anchor_lang", "borsh", "spl_token"]);
        assert_eq!(set.imports.len(), 3);
    }

    #[test]
    fn test_heuristics() {
        let extractor = RustExtractor::new();
        let source = r#"
#[derive(Debug)]
struct A;
async fn fetch() { let x = unsafe { read() }; x.unwrap(); }
"#;
        let features = extractor.detect_features(source);
        assert!(features.contains(&"async_functions".to_string()));
        assert!(features.contains(&"unsafe_code".to_string()));
        assert!(features.contains(&"derive_macros".to_string()));

        let insights = extractor.detect_insights(source);
        assert!(insights.iter().any(|i| i.contains("unsafe")));
        assert!(insights.iter().any(|i| i.contains("unwrap()")));

        let clean = extractor.detect_insights("fn safe() -> u8 { 1 }");
        assert!(!clean.iter().any(|i| i.contains("unsafe")));
    }
}
