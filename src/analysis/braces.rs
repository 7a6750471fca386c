//! Delimiter matching over sanitized text.
//!
//! The matcher must run on sanitized text: a `}` inside a string literal
//! or comment in the raw source would otherwise close the scope early.

use std::collections::HashMap;

/// Bytes that end a statement. Generic arguments and parameter lists never
/// span one of these.
pub const STATEMENT_STOPS: &[u8] = &[b';', b'{', b'}'];

/// Closing delimiter for a supported opening delimiter.
fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'<' => Some(b'>'),
        _ => None,
    }
}

/// Find the offset of the delimiter that closes the one at `open_pos`.
///
/// Returns `None` when `open_pos` is not an opening delimiter or when the
/// depth never returns to zero before the end of the text.
pub fn find_matching(text: &str, open_pos: usize) -> Option<usize> {
    find_matching_before(text, open_pos, &[])
}

/// Like [`find_matching`], but gives up at the first byte from `stops`
/// met before the delimiter closes.
pub fn find_matching_before(text: &str, open_pos: usize, stops: &[u8]) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = *bytes.get(open_pos)?;
    let close = closer_for(open)?;

    let mut depth: usize = 0;
    for (i, &b) in bytes.iter().enumerate().skip(open_pos) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        } else if stops.contains(&b) {
            return None;
        }
    }
    None
}

/// Pair every `{` in `text` with its matching `}` in a single pass.
///
/// Braces that never close have no entry; stray `}` are ignored. For any
/// `{` the entry equals what [`find_matching`] returns for it.
pub fn brace_pairs(text: &str) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut open = Vec::new();
    for (i, &b) in text.as_bytes().iter().enumerate() {
        match b {
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
            }
            _ => {}
        }
    }
    pairs
}
