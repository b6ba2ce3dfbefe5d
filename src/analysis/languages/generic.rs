//! Degraded-mode scanner for files without a dedicated extractor.
//!
//! Only function-like declarations are recognized, and only by name. The
//! output keeps the `ParsedModule` schema populated; it is not analysis.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{line_number, ParsedFunction, Visibility};

/// Marker recorded in `language_features` for unknown languages.
pub const UNKNOWN_LANGUAGE_FEATURE: &str = "unknown_language";

/// Marker recorded in `security_insights` for unknown languages.
pub const GENERIC_PARSING_INSIGHT: &str = "Generic parsing - limited security analysis available";

lazy_static! {
    /// `function name(`, `const name = (`, `name: (`
    static ref GENERIC_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bfunction\s+(?P<name>[A-Za-z_$][\w$]*)\s*\(").unwrap(),
        Regex::new(r"\bconst\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*\(").unwrap(),
        Regex::new(r"\b(?P<name>[A-Za-z_$][\w$]*)\s*:\s*\(").unwrap(),
    ];
}

/// Extract function-like declarations in source order.
pub fn extract_functions(source: &str) -> Vec<ParsedFunction> {
    let mut found: Vec<(usize, String)> = GENERIC_PATTERNS
        .iter()
        .flat_map(|pattern| {
            pattern.captures_iter(source).filter_map(|caps| {
                let start = caps.get(0)?.start();
                Some((start, caps.name("name")?.as_str().to_string()))
            })
        })
        .collect();
    found.sort_by_key(|(start, _)| *start);

    found
        .into_iter()
        .map(|(start, name)| ParsedFunction {
            name,
            visibility: Visibility::Public,
            parameters: Vec::new(),
            return_type: None,
            doc_comments: Vec::new(),
            body: String::new(),
            line_number: line_number(source, start),
            complexity_score: 1,
            is_entry_function: false,
            modifiers: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_javascript_like_source() {
        let source = r#"
const handler = (req, res) => {
    res.send("ok");
};

function transfer(to, amount) {
    if (amount > 0) { send(to, amount); }
}

const api = {
    withdraw: (amount) => amount,
};
"#;
        let funcs = extract_functions(source);
        let names: Vec<&str> = funcs.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["handler", "transfer", "withdraw"]);

        assert_eq!(funcs[1].line_number, 6);
        assert!(funcs.iter().all(|f| f.complexity_score == 1));
        assert!(funcs.iter().all(|f| f.parameters.is_empty()));
        assert!(funcs.iter().all(|f| f.visibility == Visibility::Public));
    }

    #[test]
    fn test_python_has_no_generic_matches() {
        let source = "def transfer(to, amount):\n    return amount\n";
        assert!(extract_functions(source).is_empty());
    }
}
