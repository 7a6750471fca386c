//! Byte-level token helpers shared by every scanner.
//!
//! All searches here are plain forward scans (substring search plus
//! boundary checks), so their cost is linear in the haystack. Nothing in
//! the scanning pipeline builds a regex out of a type name.

use super::braces::{find_matching_before, STATEMENT_STOPS};

/// Check whether a byte can appear inside an identifier.
#[inline]
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Check whether a byte can start an identifier.
#[inline]
pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

/// Check whether `word` occurs at `pos` in `text` with identifier boundaries
/// on both sides.
pub fn is_word_at(text: &str, pos: usize, word: &str) -> bool {
    let bytes = text.as_bytes();
    let end = pos + word.len();
    if end > bytes.len() || &bytes[pos..end] != word.as_bytes() {
        return false;
    }
    let before_ok = pos == 0 || !is_ident_byte(bytes[pos - 1]);
    let after_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
    before_ok && after_ok
}

/// Iterate over the start offsets of every whole-word occurrence of `word`.
pub fn word_positions<'a>(text: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    text.match_indices(word)
        .map(|(pos, _)| pos)
        .filter(move |&pos| !word.is_empty() && is_word_at(text, pos, word))
}

/// Check whether `word` occurs anywhere in `text` as a whole word.
pub fn contains_word(text: &str, word: &str) -> bool {
    word_positions(text, word).next().is_some()
}

/// Count whole-word occurrences of `word`.
pub fn count_word(text: &str, word: &str) -> usize {
    word_positions(text, word).count()
}

/// Offset just past the previous statement boundary (`;`, `{` or `}`)
/// before `pos`, looking back at most `window` bytes.
pub fn statement_start(text: &str, pos: usize, window: usize) -> usize {
    let bytes = text.as_bytes();
    let floor = pos.saturating_sub(window);
    let mut i = pos.min(bytes.len());
    while i > floor {
        if matches!(bytes[i - 1], b';' | b'{' | b'}') {
            return i;
        }
        i -= 1;
    }
    // Never split a multi-byte character when the window cuts mid-text.
    while i < pos && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// The text of the bounded lookback window before `pos`.
pub fn lookback(text: &str, pos: usize, window: usize) -> &str {
    &text[statement_start(text, pos, window)..pos]
}

/// Offset and value of the last non-whitespace byte before `pos`.
pub fn prev_non_ws(text: &str, pos: usize) -> Option<(usize, u8)> {
    let bytes = text.as_bytes();
    let mut i = pos.min(bytes.len());
    while i > 0 {
        i -= 1;
        if !bytes[i].is_ascii_whitespace() {
            return Some((i, bytes[i]));
        }
    }
    None
}

/// The identifier that ends right before `pos` (whitespace skipped), with
/// its start offset.
pub fn ident_before(text: &str, pos: usize) -> Option<(usize, &str)> {
    let bytes = text.as_bytes();
    let mut end = pos.min(bytes.len());
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    let mut start = end;
    while start > 0 && is_ident_byte(bytes[start - 1]) {
        start -= 1;
    }
    if start == end {
        None
    } else {
        Some((start, &text[start..end]))
    }
}

/// A forward-only cursor over sanitized source text.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str, pos: usize) -> Self {
        Self {
            text,
            pos: pos.min(text.len()),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Peek at the current byte.
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Advance past a single byte.
    pub fn bump(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    pub fn skip_ws(&mut self) -> &mut Self {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        self
    }

    /// Consume `b` if it is the next byte.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `s` if the text continues with it.
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.text.as_bytes()[self.pos..].starts_with(s.as_bytes()) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume `word` if it is the next token (with a trailing boundary).
    pub fn eat_word(&mut self, word: &str) -> bool {
        if is_word_at(self.text, self.pos, word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Consume an identifier and return it.
    pub fn ident(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        if start >= bytes.len() || !is_ident_start(bytes[start]) {
            return None;
        }
        let mut end = start + 1;
        while end < bytes.len() && is_ident_byte(bytes[end]) {
            end += 1;
        }
        self.pos = end;
        Some(&self.text[start..end])
    }

    /// Consume a dotted name (`java.io.Serializable`) and return its last
    /// segment.
    pub fn qualified_ident(&mut self) -> Option<&'a str> {
        let mut last = self.ident()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if !self.eat(b'.') {
                self.pos = save;
                return Some(last);
            }
            self.skip_ws();
            match self.ident() {
                Some(next) => last = next,
                None => {
                    self.pos = save;
                    return Some(last);
                }
            }
        }
    }

    /// Skip a balanced `<...>` group if one starts here and closes within
    /// the current statement.
    pub fn skip_angles(&mut self) -> bool {
        if self.peek() != Some(b'<') {
            return false;
        }
        match find_matching_before(self.text, self.pos, STATEMENT_STOPS) {
            Some(close) => {
                self.pos = close + 1;
                true
            }
            None => false,
        }
    }

    /// Skip any number of `[]` pairs (array dimensions).
    pub fn skip_dims(&mut self) {
        loop {
            let save = self.pos;
            self.skip_ws();
            if self.eat(b'[') {
                self.skip_ws();
                if self.eat(b']') {
                    continue;
                }
            }
            self.pos = save;
            return;
        }
    }
}
