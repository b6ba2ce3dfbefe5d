//! Brace-matching body resolution.

/// Return the text enclosed by a block whose opening brace ends at `start`.
///
/// Depth starts at 1 (the opening brace is already consumed) and every
/// character is kept until the matching closing brace brings the depth back
/// to 0. Unterminated blocks yield everything up to end of input.
///
/// Braces inside string literals and comments are counted like any other.
pub fn resolve_body(source: &str, start: usize) -> &str {
    let rest = match source.get(start..) {
        Some(rest) => rest,
        None => return "",
    };

    let mut depth = 1usize;
    for (i, ch) in rest.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..i];
                }
            }
            _ => {}
        }
    }

    rest
}

/// Find the byte index of the `close` delimiter matching an `open` delimiter
/// that ends at `start`. Returns `None` when the input ends first.
pub fn find_matching(source: &str, start: usize, open: char, close: char) -> Option<usize> {
    let rest = source.get(start..)?;
    let mut depth = 1usize;
    for (i, ch) in rest.char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(start + i);
            }
        }
    }
    None
}
