//! Documentation comment extraction.
//!
//! Item docs are `///` lines or `/** */` blocks directly above a declaration
//! (attributes in between are skipped). Module docs are `//!` lines or
//! `/*! */` blocks in the file header.

/// Collect the doc comments immediately preceding a declaration at `start`.
///
/// Indentation before `start` is ignored. Other text on the same line
/// counts as the nearest preceding line, so `#[inline] fn f()` still reads
/// the docs above the attribute while `impl X { fn f()` has none.
pub fn item_doc_comments(source: &str, start: usize) -> Vec<String> {
    let preceding = match source.get(..start) {
        Some(text) => text.trim_end_matches([' ', '\t']),
        None => return Vec::new(),
    };

    let lines: Vec<&str> = preceding.lines().map(str::trim).collect();
    let mut docs: Vec<String> = Vec::new();
    let mut i = lines.len();

    while i > 0 {
        let line = lines[i - 1];

        if is_attribute_start(line) {
            i -= 1;
            continue;
        }

        // Tail of a multi-line attribute such as `#[account(\n mut\n)]`.
        if line.ends_with(']') {
            match lines[..i].iter().rposition(|l| is_attribute_start(l)) {
                Some(pos) => {
                    i = pos;
                    continue;
                }
                None => break,
            }
        }

        if let Some(text) = line.strip_prefix("///") {
            if text.starts_with('/') {
                break;
            }
            docs.push(text.trim().to_string());
            i -= 1;
            continue;
        }

        if line.ends_with("*/") {
            let open = match lines[..i].iter().rposition(|l| l.contains("/*")) {
                Some(pos) => pos,
                None => break,
            };
            if !lines[open].starts_with("/**") || lines[open].starts_with("/***") {
                break;
            }
            let block = lines[open..i].join("\n");
            for text in clean_block(&block, "/**").into_iter().rev() {
                docs.push(text);
            }
            i = open;
            continue;
        }

        break;
    }

    docs.reverse();
    docs
}

/// Collect `//!` and `/*! */` comments from the file header.
///
/// Blank lines, plain `//` comments and inner attributes are skipped; the
/// header ends at the first line of code.
pub fn module_doc_comments(source: &str) -> Vec<String> {
    let mut docs = Vec::new();
    let mut lines = source.lines().map(str::trim);

    while let Some(line) = lines.next() {
        if line.is_empty() || line.starts_with("#![") {
            continue;
        }

        if let Some(text) = line.strip_prefix("//!") {
            docs.push(text.trim().to_string());
            continue;
        }

        if line.starts_with("/*!") {
            let mut block = line.to_string();
            if !line.ends_with("*/") {
                for next in lines.by_ref() {
                    block.push('\n');
                    block.push_str(next);
                    if next.ends_with("*/") {
                        break;
                    }
                }
            }
            docs.extend(clean_block(&block, "/*!"));
            continue;
        }

        if line.starts_with("//") {
            continue;
        }

        break;
    }

    docs
}

fn is_attribute_start(line: &str) -> bool {
    line.starts_with("#[")
}

/// Strip block comment markers and leading `*` decorations.
fn clean_block(block: &str, opener: &str) -> Vec<String> {
    let inner = block.trim();
    let inner = inner.strip_prefix(opener).unwrap_or(inner);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    inner
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_for(source: &str, needle: &str) -> Vec<String> {
        let pos = source.find(needle).unwrap();
        let line_start = source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        item_doc_comments(source, line_start)
    }

    #[test]
    fn test_triple_slash_docs() {
        let source = r#"
/// Deposit tokens into the pool.
/// Fails when the pool is frozen.
pub fn deposit() {}
"#;
        assert_eq!(
            docs_for(source, "pub fn deposit"),
            vec!["Deposit tokens into the pool.", "Fails when the pool is frozen."]
        );
    }

    #[test]
    fn test_docs_for_indented_and_same_line_items() {
        let source = "impl Vault {\n    /// Open it.\n    #[inline] pub fn open() {}\n}\n";
        let pos = source.find("pub fn open").unwrap();
        assert_eq!(item_doc_comments(source, pos), vec!["Open it."]);

        let source = "/// Vault.\nimpl Vault { pub fn close() {} }";
        let pos = source.find("pub fn close").unwrap();
        assert!(item_doc_comments(source, pos).is_empty());
    }

    #[test]
    fn test_docs_skip_attributes() {
        let source = r#"
/// Pool state.
#[derive(Debug)]
#[account(
    mut
)]
pub struct Pool {}
"#;
        assert_eq!(docs_for(source, "pub struct Pool"), vec!["Pool state."]);
    }

    #[test]
    fn test_block_docs() {
        let source = r#"
/**
 * Withdraw funds.
 * Requires the owner signature.
 */
fn withdraw() {}
"#;
        assert_eq!(
            docs_for(source, "fn withdraw"),
            vec!["Withdraw funds.", "Requires the owner signature."]
        );
    }

    #[test]
    fn test_plain_comments_are_not_docs() {
        let source = r#"
// VULNERABILITY: no access control
pub fn set_rate() {}

/// Documented.

fn detached() {}
"#;
        assert!(docs_for(source, "pub fn set_rate").is_empty());
        // A blank line separates the comment from the item
        assert!(docs_for(source, "fn detached").is_empty());
    }

    #[test]
    fn test_module_docs() {
        let source = r#"// Sample contract
//! Token vault program.
//! Handles deposits.
/*! Extra notes. */
#![allow(unused)]

use std::fmt;
//! Not part of the header.
"#;
        assert_eq!(
            module_doc_comments(source),
            vec!["Token vault program.", "Handles deposits.", "Extra notes."]
        );
    }

    #[test]
    fn test_module_docs_multiline_block() {
        let source = "/*!\n * Vault.\n * Second line.\n */\nfn main() {}\n";
        assert_eq!(module_doc_comments(source), vec!["Vault.", "Second line."]);
    }

    #[test]
    fn test_no_module_docs() {
        assert!(module_doc_comments("").is_empty());
        assert!(module_doc_comments("use a::b;\n//! late\n").is_empty());
    }
}
