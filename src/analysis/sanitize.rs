//! String and comment scrubbing.
//!
//! Every later stage runs on sanitized text, so delimiters and identifiers
//! inside string literals, char literals and comments can't leak into
//! declaration or relationship detection. The scrubber preserves byte
//! offsets: a span computed on sanitized text is valid on the raw text.

/// Scan state. Exactly one of the literal/comment states is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Str,
    Char,
    LineComment,
    BlockComment,
}

/// Replace every byte inside a string literal, char literal, line comment
/// or block comment (delimiters included) with a space.
///
/// Newlines are kept so line numbers survive. The output has the same byte
/// length as the input. Unterminated strings and block comments scrub to the
/// end of the input; an unterminated char literal stops at the end of its
/// line.
pub fn sanitize(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut escaped = false;
    let mut prev: u8 = 0;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Code => {
                let next = bytes.get(i + 1).copied();
                match (b, next) {
                    (b'/', Some(b'/')) => {
                        state = State::LineComment;
                        out.extend_from_slice(b"  ");
                        i += 2;
                        prev = 0;
                        continue;
                    }
                    (b'/', Some(b'*')) => {
                        state = State::BlockComment;
                        out.extend_from_slice(b"  ");
                        i += 2;
                        // The opener's '*' must not close the comment (`/*/`).
                        prev = 0;
                        continue;
                    }
                    (b'"', _) => {
                        state = State::Str;
                        escaped = false;
                        out.push(b' ');
                    }
                    (b'\'', _) => {
                        state = State::Char;
                        escaped = false;
                        out.push(b' ');
                    }
                    _ => out.push(b),
                }
            }
            State::Str | State::Char => {
                let quote = if state == State::Str { b'"' } else { b'\'' };
                if b == b'\n' {
                    out.push(b'\n');
                    if state == State::Char {
                        state = State::Code;
                    }
                    escaped = false;
                } else {
                    out.push(b' ');
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == quote {
                        state = State::Code;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    out.push(b'\n');
                    state = State::Code;
                } else {
                    out.push(b' ');
                }
            }
            State::BlockComment => {
                out.push(if b == b'\n' { b'\n' } else { b' ' });
                if prev == b'*' && b == b'/' {
                    state = State::Code;
                    prev = 0;
                    i += 1;
                    continue;
                }
            }
        }
        prev = b;
        i += 1;
    }

    // Only whole multi-byte sequences are ever replaced, so this is valid UTF-8.
    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Count non-empty lines in raw source text.
pub fn non_empty_lines(source: &str) -> usize {
    source.lines().filter(|l| !l.trim().is_empty()).count()
}
