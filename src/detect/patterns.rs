//! Token-shape predicates used by the field and method classifiers.
//!
//! Each predicate looks at a single whole-word occurrence of a type name in
//! sanitized text and decides, from the handful of tokens around it, what
//! syntactic role the occurrence plays. The checks are local and bounded:
//! none of them scans further than the surrounding declarator.

use crate::analysis::braces::{find_matching_before, STATEMENT_STOPS};
use crate::analysis::tokens::{ident_before, prev_non_ws, Cursor};

/// Words that can follow a type name without introducing a declarator.
const NON_DECLARATOR_WORDS: &[&str] = &[
    "instanceof",
    "extends",
    "implements",
    "super",
    "new",
    "return",
    "throws",
    "class",
    "interface",
];

/// How far back the setter check searches for the parameter list's `(`.
const PARAM_LIST_WINDOW: usize = 256;

/// Read the declarator that follows a type occurrence at `pos`.
///
/// Skips generic arguments, array dimensions and varargs dots, then returns
/// the identifier plus a cursor positioned after it (whitespace skipped).
pub fn declarator_after<'a>(
    text: &'a str,
    pos: usize,
    type_name: &str,
) -> Option<(&'a str, Cursor<'a>)> {
    if let Some((_, b'.')) = prev_non_ws(text, pos) {
        return None;
    }

    let mut cursor = Cursor::new(text, pos + type_name.len());
    cursor.skip_ws();
    cursor.skip_angles();
    cursor.skip_dims();
    cursor.skip_ws();
    if cursor.eat_str("...") {
        cursor.skip_ws();
    }

    let name = cursor.ident()?;
    if NON_DECLARATOR_WORDS.contains(&name) {
        return None;
    }
    cursor.skip_ws();
    Some((name, cursor))
}

/// Consume a lone `=` (not `==`).
fn eat_assign(cursor: &mut Cursor<'_>) -> bool {
    if cursor.peek() != Some(b'=') {
        return false;
    }
    cursor.bump();
    if cursor.peek() == Some(b'=') {
        return false;
    }
    true
}

/// `Type name;` or `Type name = ...`: returns the declared name.
pub fn field_declaration_at<'a>(text: &'a str, pos: usize, type_name: &str) -> Option<&'a str> {
    let (name, mut cursor) = declarator_after(text, pos, type_name)?;
    if cursor.eat(b';') || eat_assign(&mut cursor) {
        Some(name)
    } else {
        None
    }
}

/// `Type name = ...` inside a method body.
pub fn is_local_variable_at(text: &str, pos: usize, type_name: &str) -> bool {
    declarator_after(text, pos, type_name)
        .map(|(_, mut cursor)| eat_assign(&mut cursor))
        .unwrap_or(false)
}

/// `Type name(`: a method returning `Type`.
pub fn is_return_type_at(text: &str, pos: usize, type_name: &str) -> bool {
    declarator_after(text, pos, type_name)
        .map(|(_, cursor)| cursor.peek() == Some(b'('))
        .unwrap_or(false)
}

/// `(Type name,` / `, Type name)` and so on: a formal parameter.
pub fn is_parameter_at(text: &str, pos: usize, type_name: &str) -> bool {
    let mut before = pos;
    if let Some((start, "final")) = ident_before(text, pos) {
        before = start;
    }
    if !matches!(prev_non_ws(text, before), Some((_, b'(' | b','))) {
        return false;
    }
    declarator_after(text, pos, type_name)
        .map(|(_, cursor)| matches!(cursor.peek(), Some(b',' | b')')))
        .unwrap_or(false)
}

/// For an occurrence inside generic arguments (`Map<K, List<Engine>>`),
/// the offset and name of the outermost generic type; otherwise the
/// occurrence itself.
pub fn type_use_at<'a>(text: &'a str, pos: usize, type_name: &'a str) -> (usize, &'a str) {
    let bytes = text.as_bytes();
    let floor = pos.saturating_sub(PARAM_LIST_WINDOW);
    let mut depth = 0usize;
    let mut outermost = None;
    let mut i = pos;
    while i > floor {
        i -= 1;
        match bytes[i] {
            b'>' => depth += 1,
            b'<' if depth == 0 => outermost = Some(i),
            b'<' => depth -= 1,
            b';' | b'{' | b'}' | b'(' | b')' | b'=' => break,
            _ => {}
        }
    }
    outermost
        .and_then(|lt| ident_before(text, lt))
        .unwrap_or((pos, type_name))
}

/// The `(` of the parameter list enclosing `pos`, searched backward within
/// a bounded window and stopping at statement boundaries.
fn enclosing_open_paren(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let floor = pos.saturating_sub(PARAM_LIST_WINDOW);
    let mut depth = 0usize;
    let mut i = pos;
    while i > floor {
        i -= 1;
        match bytes[i] {
            b')' => depth += 1,
            b'(' if depth == 0 => return Some(i),
            b'(' => depth -= 1,
            b';' | b'{' | b'}' => return None,
            _ => {}
        }
    }
    None
}

/// Whether the occurrence at `pos` sits inside the parameter list of a
/// `set*` method declaration (not a call: the list must be followed by a
/// body or a `throws` clause).
pub fn is_setter_parameter_at(text: &str, pos: usize) -> bool {
    let Some(open) = enclosing_open_paren(text, pos) else {
        return false;
    };
    let Some((_, method)) = ident_before(text, open) else {
        return false;
    };
    if !method.starts_with("set") {
        return false;
    }
    let Some(close) = find_matching_before(text, open, STATEMENT_STOPS) else {
        return false;
    };
    let mut cursor = Cursor::new(text, close + 1);
    cursor.skip_ws();
    cursor.peek() == Some(b'{') || cursor.eat_word("throws")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, needle: &str) -> usize {
        text.find(needle).unwrap()
    }

    #[test]
    fn test_field_declaration() {
        let text = "private Engine engine; Engine spare = x; Engine[] all; List<Engine> es;";
        assert_eq!(field_declaration_at(text, 8, "Engine"), Some("engine"));
        assert_eq!(
            field_declaration_at(text, at(text, "Engine spare"), "Engine"),
            Some("spare")
        );
        assert_eq!(
            field_declaration_at(text, at(text, "Engine[]"), "Engine"),
            Some("all")
        );
        // Inside generic arguments the next token is `>`, not a declarator.
        assert_eq!(field_declaration_at(text, at(text, "Engine> es"), "Engine"), None);
    }

    #[test]
    fn test_field_rejects_comparison_and_calls() {
        let text = "Engine e == x; Engine make(); a.Engine b;";
        assert_eq!(field_declaration_at(text, 0, "Engine"), None);
        assert_eq!(field_declaration_at(text, at(text, "Engine make"), "Engine"), None);
        assert_eq!(field_declaration_at(text, at(text, "Engine b"), "Engine"), None);
    }

    #[test]
    fn test_parameter_shapes() {
        let text = "void f(Engine a, final Engine b) {} g(x, Engine c); h(Engine) ; i(Map<K, Engine> m)";
        assert!(is_parameter_at(text, at(text, "Engine a"), "Engine"));
        assert!(is_parameter_at(text, at(text, "Engine b"), "Engine"));
        assert!(is_parameter_at(text, at(text, "Engine c"), "Engine"));
        assert!(!is_parameter_at(text, at(text, "Engine)"), "Engine"));
        assert!(!is_parameter_at(text, at(text, "Engine> m"), "Engine"));
    }

    #[test]
    fn test_return_and_local() {
        let text = "Engine build() { Engine e = new Engine(); return e; }";
        assert!(is_return_type_at(text, 0, "Engine"));
        assert!(!is_local_variable_at(text, 0, "Engine"));
        assert!(is_local_variable_at(text, at(text, "Engine e"), "Engine"));
        assert!(!is_return_type_at(text, at(text, "Engine()"), "Engine"));
    }

    #[test]
    fn test_type_use_inside_generics() {
        let text = "private Map<String, List<Engine>> byName; f(Engine e)";
        let inner = at(text, "Engine>");
        let (pos, ty) = type_use_at(text, inner, "Engine");
        assert_eq!((pos, ty), (at(text, "Map"), "Map"));
        assert_eq!(field_declaration_at(text, pos, ty), Some("byName"));

        let plain = at(text, "Engine e");
        assert_eq!(type_use_at(text, plain, "Engine"), (plain, "Engine"));
    }

    #[test]
    fn test_setter_parameter() {
        let text = "void setParts(List<Part> parts) { x(); } useParts(List<Part> parts);";
        let decl = at(text, "Part>");
        assert!(is_setter_parameter_at(text, decl));
        let call = text.rfind("Part>").unwrap();
        assert!(!is_setter_parameter_at(text, call));
    }
}
