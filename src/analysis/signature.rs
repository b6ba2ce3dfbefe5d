//! Parameter and field list parsing shared by the language extractors.

use super::TypedName;

/// Split `text` on any of `separators` occurring outside of (), [], {} and <>.
///
/// The `>` of a `->` arrow is not treated as a closing bracket.
pub fn split_top_level<'a>(text: &'a str, separators: &[char]) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut last = 0;
    let mut prev = '\0';

    for (i, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '>' if prev != '-' && prev != '=' => depth -= 1,
            c if depth <= 0 && separators.contains(&c) => {
                parts.push(&text[last..i]);
                last = i + c.len_utf8();
            }
            _ => {}
        }
        prev = ch;
    }
    parts.push(&text[last..]);

    parts
}

/// Find the first of `targets` outside of brackets. `<`/`>` only nest when
/// `angles` is set, since values may contain comparisons.
pub fn find_top_level(text: &str, targets: &[char], angles: bool) -> Option<(usize, char)> {
    let mut depth = 0i32;
    let mut prev = '\0';

    for (i, ch) in text.char_indices() {
        if depth <= 0 && targets.contains(&ch) {
            return Some((i, ch));
        }
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '<' if angles => depth += 1,
            '>' if angles && prev != '-' && prev != '=' => depth -= 1,
            _ => {}
        }
        prev = ch;
    }

    None
}

/// Byte index of the `>` closing a generic parameter list whose `<` has
/// already been consumed. Arrows (`->`, `=>`) never close a level, so
/// bounds such as `F: Fn(u64) -> u64` are skipped whole.
pub fn find_generics_end(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut prev = '\0';

    for (i, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' if prev != '-' && prev != '=' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            '{' | ';' => return None,
            _ => {}
        }
        prev = ch;
    }

    None
}

/// Byte index just past the `(` that opens a parameter list. `open` is the
/// index of the `<` or `(` following the function name; generics are
/// skipped first.
pub fn parameter_list_start(source: &str, open: usize) -> Option<usize> {
    let rest = source.get(open..)?;
    if rest.starts_with('(') {
        return Some(open + 1);
    }

    let generics = rest.strip_prefix('<')?;
    let close = open + 1 + find_generics_end(generics)?;
    let after = &source[close + 1..];
    let skipped = after.len() - after.trim_start().len();
    after
        .trim_start()
        .starts_with('(')
        .then_some(close + 1 + skipped + 1)
}

/// Split the text following `name:` of a const/static declaration into its
/// type and raw value. Declarations without a value yield an empty value.
pub fn parse_declaration_tail(rest: &str) -> Option<(String, String)> {
    let (eq, ch) = find_top_level(rest, &['=', ';'], true)?;
    let ty = collapse_whitespace(&rest[..eq]);
    if ty.is_empty() {
        return None;
    }
    if ch == ';' {
        return Some((ty, String::new()));
    }

    let after = &rest[eq + 1..];
    let value = match find_top_level(after, &[';'], false) {
        Some((end, _)) => &after[..end],
        None => after,
    };
    Some((ty, value.trim().to_string()))
}

/// Parse a single `name: type` pair. The first `:` that is not part of a
/// `::` path separator splits name from type.
pub fn parse_typed_name(piece: &str) -> Option<TypedName> {
    let bytes = piece.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' {
            if bytes.get(i + 1) == Some(&b':') {
                i += 2;
                continue;
            }
            let name = piece[..i].trim();
            let ty = piece[i + 1..].trim();
            if name.is_empty() || ty.is_empty() {
                return None;
            }
            return Some(TypedName::new(name, collapse_whitespace(ty)));
        }
        i += 1;
    }
    None
}

/// Parse a comma separated parameter list.
///
/// With `strip_bindings`, leading `&mut`, `&` and `mut` are removed from each
/// parameter before the name is read. Parameters without a `name: type`
/// shape (such as `self` receivers) are skipped.
pub fn parse_parameters(list: &str, strip_bindings: bool) -> Vec<TypedName> {
    split_top_level(&strip_line_comments(list), &[','])
        .into_iter()
        .filter_map(|piece| {
            let mut piece = piece.trim();
            if strip_bindings {
                piece = strip_binding_prefixes(piece);
            }
            parse_typed_name(piece)
        })
        .collect()
}

/// Parse the fields of a struct body. Fields are split on commas and
/// newlines; attributes, comments and visibility qualifiers are dropped.
pub fn parse_fields(body: &str) -> Vec<TypedName> {
    split_top_level(&strip_line_comments(body), &[',', '\n'])
        .into_iter()
        .filter_map(|piece| {
            let piece = strip_attributes(piece.trim());
            let piece = strip_visibility(piece);
            parse_typed_name(piece)
        })
        .collect()
}

/// Parse the positional fields of a tuple struct, named `0`, `1`, ...
pub fn parse_tuple_fields(list: &str) -> Vec<TypedName> {
    split_top_level(&strip_line_comments(list), &[','])
        .into_iter()
        .map(|piece| strip_visibility(strip_attributes(piece.trim())))
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(i, ty)| TypedName::new(i.to_string(), collapse_whitespace(ty)))
        .collect()
}

/// Remove `pub` / `pub(...)` qualifiers.
pub fn strip_visibility(piece: &str) -> &str {
    let Some(rest) = piece.strip_prefix("pub") else {
        return piece;
    };
    let rest_trimmed = rest.trim_start();
    if let Some(restricted) = rest_trimmed.strip_prefix('(') {
        return match restricted.find(')') {
            Some(end) => restricted[end + 1..].trim_start(),
            None => piece,
        };
    }
    if rest.starts_with(char::is_whitespace) {
        rest_trimmed
    } else {
        piece
    }
}

fn strip_binding_prefixes(mut piece: &str) -> &str {
    if let Some(rest) = piece.strip_prefix("&mut ") {
        piece = rest.trim_start();
    } else if let Some(rest) = piece.strip_prefix('&') {
        piece = rest.trim_start();
    }
    if let Some(rest) = piece.strip_prefix("mut ") {
        piece = rest.trim_start();
    }
    piece
}

fn strip_attributes(mut piece: &str) -> &str {
    while let Some(rest) = piece.strip_prefix("#[") {
        match super::body::find_matching(rest, 0, '[', ']') {
            Some(end) => piece = rest[end + 1..].trim_start(),
            None => return "",
        }
    }
    piece
}

fn strip_line_comments(text: &str) -> String {
    text.lines()
        .map(|line| match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse runs of whitespace to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
