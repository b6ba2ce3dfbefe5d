//! Move extractor (Aptos and Sui dialects).
//!
//! Extracts `fun` declarations with their `public`/`entry`/`native`/`inline`
//! qualifiers, structs with their ability lists, `const` items and `use`
//! imports.
//!
//! Struct abilities are read from a `has` list before the body or, in the
//! Move 2 postfix form, after it (`struct S { .. } has copy, drop;`).
//! Positional structs (`struct Witness() has drop;`) get fields named
//! `0`, `1`, ...

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{
    body, comments, complexity, in_line_comment, line_number, signature, ImportSet, Language,
    LanguageExtractor, ModuleKind, ParsedConstant, ParsedFunction, ParsedStruct, RuleKind,
    RuleTable, Visibility, DECL_START,
};

lazy_static! {
    /// Function declarations, up to the `<` or `(` after the name.
    static ref FN_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?P<mods>(?:(?:public(?:\s*\([^)]*\))?|entry|native|inline)\s+)*)fun\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*))\s*(?P<open>[<(])",
        DECL_START
    )).unwrap();

    static ref MODIFIER_TOKEN: Regex = Regex::new(
        r"public(?:\s*\([^)]*\))?|entry|native|inline"
    ).unwrap();

    /// Struct declarations up to the name; generics, abilities and the
    /// body are read by hand.
    static ref STRUCT_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?:public(?:\s*\([^)]*\))?\s+)?(?:native\s+)?struct\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*))",
        DECL_START
    )).unwrap();

    /// A `has` clause at the start of the text.
    static ref ABILITY_CLAUSE: Regex = Regex::new(
        r"^\s*has\s+(?P<list>[A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)"
    ).unwrap();

    static ref CONST_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>const\s+(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*:)",
        DECL_START
    )).unwrap();

    static ref USE_PATTERN: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?:public\s+)?use\s+(?P<path>[^;]+))",
        DECL_START
    )).unwrap();

    static ref MODULE_PATTERN: Regex = Regex::new(
        r"(?m)^[ \t]*module\s+[\w:]+"
    ).unwrap();

    static ref ACQUIRES_CLAUSE: Regex = Regex::new(r"\bacquires\b").unwrap();
}

const FEATURE_RULES: &[(&str, &str)] = &[
    (r"\bentry\s+fun\b", "entry_functions"),
    (r"\bhas\s+(?:copy|drop|store|key)\b", "struct_abilities"),
    (r"\bpublic\s*\(\s*friend\s*\)|\bfriend\s+[\w:]+\s*;", "friend_visibility"),
    (r"\bpublic\s*\(\s*package\s*\)", "package_visibility"),
    (r"\bacquires\b", "global_storage_access"),
    (r"\bspec\s+(?:fun|module|schema|[A-Za-z_]\w*\s*\{)", "formal_specifications"),
    (r"\bnative\s+fun\b", "native_functions"),
    (r"\binline\s+fun\b", "inline_functions"),
    (r"\bfun\s+\w+\s*<", "generic_functions"),
    (r"\bphantom\b", "phantom_types"),
    (r"\bvector<", "vectors"),
    (r"\bevent::emit\b|\bemit_event\b", "events"),
    (r"\bUID\b|\bobject::new\b", "sui_objects"),
    (r"&signer\b", "signer_arguments"),
    (r"#\[test(?:_only)?\]", "unit_tests"),
];

const INSIGHT_RULES: &[(&str, &str)] = &[
    (
        r"\bmove_to\s*(?:<[^>]*>)?\s*\(",
        "Resource publishing detected - ensure only authorized signers can publish resources",
    ),
    (
        r"\bborrow_global_mut\s*<",
        "Mutable global resource access - verify access control before modifying state",
    ),
    (
        r"\bmove_from\s*<",
        "Resource removal from global storage - verify ownership before extracting",
    ),
    (
        r"\bborrow_global\s*<",
        "Global resource reads - ensure the resource exists before borrowing",
    ),
    (
        r"\babort\b",
        "Explicit abort statements - verify error codes are meaningful and documented",
    ),
    (
        r"\btransfer::(?:public_)?transfer\b",
        "Object transfer detected - verify recipients and ownership",
    ),
    (
        r"\btransfer::(?:public_)?share_object\b",
        "Shared objects are accessible to any transaction - verify access control",
    ),
    (
        r"\bcoin::(?:mint|burn)\b",
        "Coin minting or burning - verify treasury capability handling",
    ),
    (
        r"\bhas\b[^{;]*\bcopy\b[^{;]*\bkey\b|\bhas\b[^{;]*\bkey\b[^{;]*\bcopy\b",
        "Struct with both copy and key abilities - resources can be duplicated",
    ),
    (
        r"\bassert!\s*\(",
        "Uses assert! for runtime precondition checks",
    ),
];

/// Move extractor.
pub struct MoveExtractor {
    features: RuleTable,
    insights: RuleTable,
}

impl MoveExtractor {
    pub fn new() -> Self {
        Self {
            features: RuleTable::from_static(FEATURE_RULES),
            insights: RuleTable::from_static(INSIGHT_RULES),
        }
    }
}

impl Default for MoveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for MoveExtractor {
    fn language(&self) -> Language {
        Language::Move
    }

    fn module_kind(&self) -> ModuleKind {
        ModuleKind::MoveModule
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["move"]
    }

    fn extract_functions(&self, source: &str) -> Vec<ParsedFunction> {
        FN_PATTERN
            .captures_iter(source)
            .filter_map(|caps| {
                let decl = caps.name("decl")?;
                if in_line_comment(source, decl.start()) {
                    return None;
                }
                let modifiers: Vec<String> = caps
                    .name("mods")
                    .map(|m| {
                        MODIFIER_TOKEN
                            .find_iter(m.as_str())
                            .map(|t| signature::collapse_whitespace(t.as_str()))
                            .collect()
                    })
                    .unwrap_or_default();

                let params_start =
                    signature::parameter_list_start(source, caps.name("open")?.start())?;
                let (parameters, tail_start) =
                    match body::find_matching(source, params_start, '(', ')') {
                        Some(end) => (
                            signature::parse_parameters(&source[params_start..end], false),
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
                    name: caps.name("name")?.as_str().to_string(),
                    visibility: if modifiers.iter().any(|m| m.starts_with("public")) {
                        Visibility::Public
                    } else {
                        Visibility::Private
                    },
                    parameters,
                    return_type: return_type(sig_tail),
                    doc_comments: comments::item_doc_comments(source, decl.start()),
                    body: body_text.to_string(),
                    line_number: line_number(source, decl.start()),
                    complexity_score: complexity::score(body_text),
                    is_entry_function: modifiers.iter().any(|m| m == "entry"),
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
                let mut parsed = ParsedStruct {
                    name: caps.name("name")?.as_str().to_string(),
                    doc_comments: comments::item_doc_comments(source, decl.start()),
                    line_number: line_number(source, decl.start()),
                    ..Default::default()
                };

                let mut pos = skip_generics(source, decl.end())?;
                let mut abilities_seen = false;
                if let Some(clause) = ABILITY_CLAUSE.captures(&source[pos..]) {
                    apply_abilities(&clause["list"], &mut parsed);
                    abilities_seen = true;
                    pos += clause.get(0)?.end();
                }

                let rest = &source[pos..];
                let open = pos + (rest.len() - rest.trim_start().len());
                let end = match rest.trim_start().chars().next() {
                    Some('{') => {
                        let body = body::resolve_body(source, open + 1);
                        parsed.fields = signature::parse_fields(body);
                        open + 1 + body.len() + 1
                    }
                    Some('(') => {
                        let close = body::find_matching(source, open + 1, '(', ')')?;
                        parsed.fields = signature::parse_tuple_fields(&source[open + 1..close]);
                        close + 1
                    }
                    _ => pos,
                };

                if !abilities_seen {
                    if let Some(clause) = source.get(end..).and_then(|t| ABILITY_CLAUSE.captures(t)) {
                        apply_abilities(&clause["list"], &mut parsed);
                    }
                }

                Some(parsed)
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
                    visibility: Visibility::Private,
                    is_mutable: false,
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
            if let Some(dep) = module_address(&path) {
                dependencies.insert(dep);
            }
            imports.insert(path);
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

    /// Header comments plus the `///` block above the first `module`.
    fn module_doc_comments(&self, source: &str) -> Vec<String> {
        let mut docs = comments::module_doc_comments(source);
        if let Some(m) = MODULE_PATTERN.find(source) {
            for doc in comments::item_doc_comments(source, m.start()) {
                if !docs.contains(&doc) {
                    docs.push(doc);
                }
            }
        }
        docs
    }
}

/// Offset just past an optional `<...>` generic list starting at `pos`.
fn skip_generics(source: &str, pos: usize) -> Option<usize> {
    let rest = &source[pos..];
    let trimmed = rest.trim_start();
    match trimmed.strip_prefix('<') {
        Some(generics) => {
            let lt = pos + (rest.len() - trimmed.len());
            Some(lt + 1 + signature::find_generics_end(generics)? + 1)
        }
        None => Some(pos),
    }
}

fn apply_abilities(list: &str, parsed: &mut ParsedStruct) {
    for ability in list.split(',').map(str::trim) {
        match ability {
            "copy" => parsed.has_copy = true,
            "drop" => parsed.has_drop = true,
            "store" => parsed.has_store = true,
            "key" => parsed.has_key = true,
            _ => {}
        }
    }
}

/// Return type from `: T acquires R` between `)` and the body.
fn return_type(sig_tail: &str) -> Option<String> {
    let ty = sig_tail.trim().strip_prefix(':')?;
    let ty = match ACQUIRES_CLAUSE.find(ty) {
        Some(m) => &ty[..m.start()],
        None => ty,
    };
    let ty = signature::collapse_whitespace(ty);
    if ty.is_empty() {
        None
    } else {
        Some(ty)
    }
}

/// `address::module` prefix of a use path (`sui::coin::{Self, Coin}` -> `sui::coin`).
fn module_address(path: &str) -> Option<String> {
    let mut segments = path.split("::").map(str::trim);
    let address = segments.next().filter(|s| !s.is_empty())?;
    let module = segments
        .next()
        .map(|s| s.split(|c: char| c == '{' || c.is_whitespace()).next().unwrap_or(""))
        .filter(|s| !s.is_empty() && *s != "*");
    match module {
        Some(module) => Some(format!("{}::{}", address, module)),
        None => Some(address.to_string()),
    }
}
