//! Type declaration extraction and nested-type erasure.
//!
//! Declarations are found by scanning sanitized text for the `class` and
//! `interface` keywords. Each candidate is validated with a bounded forward
//! scan to its opening brace and a lookup of its closing brace in a table
//! built once per file, so a malformed declaration only costs the
//! declaration itself.

use std::collections::HashMap;

use tracing::debug;

use crate::config::Heuristics;

use super::braces::brace_pairs;
use super::facts::{SourceFile, Span, TypeDeclaration, TypeKind};
use super::tokens::{contains_word, lookback, word_positions, Cursor};

const CLASS_KEYWORD: &str = "class";
const INTERFACE_KEYWORD: &str = "interface";

/// Extract every type declaration from a file and attach de-nested bodies.
pub fn scan_file(file: &SourceFile, heuristics: &Heuristics) -> Vec<TypeDeclaration> {
    let mut decls = extract_types(file, heuristics);
    erase_nested(&mut decls, file);
    decls
}

/// Find type declarations in a file's sanitized text, in source order.
///
/// Declarations whose body never closes are skipped.
pub fn extract_types(file: &SourceFile, heuristics: &Heuristics) -> Vec<TypeDeclaration> {
    let text = file.sanitized.as_str();

    let mut candidates: Vec<(usize, &str)> = word_positions(text, CLASS_KEYWORD)
        .map(|p| (p, CLASS_KEYWORD))
        .chain(word_positions(text, INTERFACE_KEYWORD).map(|p| (p, INTERFACE_KEYWORD)))
        .collect();
    candidates.sort_unstable_by_key(|(pos, _)| *pos);
    if candidates.is_empty() {
        return Vec::new();
    }

    let pairs = brace_pairs(text);
    candidates
        .into_iter()
        .filter_map(|(pos, keyword)| parse_declaration(file, &pairs, pos, keyword, heuristics))
        .collect()
}

/// Try to read a declaration whose keyword starts at `pos`.
fn parse_declaration(
    file: &SourceFile,
    pairs: &HashMap<usize, usize>,
    pos: usize,
    keyword: &str,
    heuristics: &Heuristics,
) -> Option<TypeDeclaration> {
    let text = file.sanitized.as_str();

    // `Foo.class` is a class literal, not a declaration.
    if text[..pos].trim_end().ends_with('.') {
        return None;
    }

    let mut cursor = Cursor::new(text, pos + keyword.len());
    cursor.skip_ws();
    let name = cursor.ident()?;
    let heritage_start = cursor.pos();

    let open = find_body_open(text, heritage_start, heuristics.heritage_limit)?;
    let Some(&close) = pairs.get(&open) else {
        debug!(file = %file.name, name, "unbalanced body, skipping declaration");
        return None;
    };

    let kind = if keyword == INTERFACE_KEYWORD {
        TypeKind::Interface
    } else if contains_word(lookback(text, pos, heuristics.modifier_window), "abstract") {
        TypeKind::AbstractClass
    } else {
        TypeKind::Class
    };

    let body = text[open..=close].to_string();
    Some(TypeDeclaration {
        name: name.to_string(),
        heritage: text[heritage_start..open].trim().to_string(),
        kind,
        span: Span { open, close },
        file: file.name.clone(),
        denested_body: body.clone(),
        body,
    })
}

/// Scan forward from the end of a type name to the opening brace of its
/// body. Gives up on bytes that can't appear in a heritage clause, or once
/// `limit` bytes have been consumed.
fn find_body_open(text: &str, from: usize, limit: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let end = bytes.len().min(from.saturating_add(limit));
    for (i, &b) in bytes.iter().enumerate().take(end).skip(from) {
        match b {
            b'{' => return Some(i),
            b';' | b'}' | b'(' | b')' | b'=' => return None,
            _ => {}
        }
    }
    None
}

/// Blank out, in each declaration's body copy, every other declaration of
/// the same file that lies strictly inside it.
///
/// Only the outermost contained declarations are blanked; anything nested
/// deeper lies inside one of them and goes with it. The blanked range
/// extends backward from the nested body to the nearest preceding `;` or
/// `}` so the nested signature goes too.
pub fn erase_nested(decls: &mut [TypeDeclaration], file: &SourceFile) {
    let text = file.sanitized.as_bytes();
    let mut spans: Vec<Span> = decls.iter().map(|d| d.span).collect();
    spans.sort_unstable_by_key(|s| (s.open, s.close));

    for parent in decls.iter_mut() {
        let outer = parent.span;
        let offset = parent.body_offset();
        let floor = offset + 1;
        let mut cleaned = parent.body.clone().into_bytes();

        let mut idx = spans.partition_point(|s| s.open <= outer.open);
        while let Some(&nested) = spans.get(idx) {
            if nested.open >= outer.close {
                break;
            }
            if !outer.strictly_contains(&nested) {
                idx += 1;
                continue;
            }

            let mut start = nested.open;
            while start > floor && !matches!(text[start - 1], b';' | b'}') {
                start -= 1;
            }

            let rel_end = (nested.close + 1 - offset).min(cleaned.len());
            for b in &mut cleaned[start - offset..rel_end] {
                if *b != b'\n' {
                    *b = b' ';
                }
            }

            // Skip everything inside the span just blanked
            idx = spans.partition_point(|s| s.open <= nested.close);
        }

        parent.denested_body = match String::from_utf8(cleaned) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> Vec<TypeDeclaration> {
        let file = SourceFile::new("Test.java", src.to_string());
        scan_file(&file, &Heuristics::default())
    }

    #[test]
    fn test_extracts_kinds() {
        let decls = scan(
            "public class A extends B {}\n\
             public abstract class C implements D, E {}\n\
             interface F {}",
        );
        let summary: Vec<_> = decls.iter().map(|d| (d.name.as_str(), d.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("A", TypeKind::Class),
                ("C", TypeKind::AbstractClass),
                ("F", TypeKind::Interface),
            ]
        );
        assert_eq!(decls[0].heritage, "extends B");
        assert_eq!(decls[1].heritage, "implements D, E");
        assert_eq!(decls[2].heritage, "");
    }

    #[test]
    fn test_abstract_window_does_not_cross_statements() {
        let decls = scan("abstract class A {}\nclass B {}");
        assert_eq!(decls[0].kind, TypeKind::AbstractClass);
        assert_eq!(decls[1].kind, TypeKind::Class);
    }

    #[test]
    fn test_skips_class_literals_and_noise() {
        let decls = scan(
            "class A {\n\
               Object k = A.class;\n\
               String s = \"class Fake {\";\n\
               // interface Ghost {}\n\
             }",
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "A");
    }

    #[test]
    fn test_skips_unbalanced_declaration() {
        let decls = scan("class Good {}\nclass Broken { void f() {");
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Good"]);
    }

    #[test]
    fn test_heritage_limit_bounds_scan() {
        let heuristics = Heuristics {
            heritage_limit: 16,
            ..Default::default()
        };
        let near = SourceFile::new("T.java", "class A extends B {}".to_string());
        assert_eq!(extract_types(&near, &heuristics).len(), 1);

        let far = SourceFile::new("T.java", format!("class A{}{{}}", " ".repeat(100)));
        assert!(extract_types(&far, &heuristics).is_empty());
    }

    #[test]
    fn test_body_span_matches_braces() {
        let src = "class A { void f() { } }";
        let decls = scan(src);
        assert_eq!(decls[0].span.open, src.find('{').unwrap());
        assert_eq!(decls[0].span.close, src.len() - 1);
        assert_eq!(decls[0].body, &src[decls[0].span.open..]);
    }

    #[test]
    fn test_erases_nested_types() {
        let src = "class Outer {\n\
                     private Helper h;\n\
                     static class Inner { Other o; }\n\
                     void run() {}\n\
                   }";
        let decls = scan(src);
        let outer = decls.iter().find(|d| d.name == "Outer").unwrap();
        let inner = decls.iter().find(|d| d.name == "Inner").unwrap();

        assert!(outer.body.contains("Other"));
        assert!(!outer.denested_body.contains("Other"));
        assert!(!outer.denested_body.contains("Inner"));
        assert!(!outer.denested_body.contains("static"));
        assert!(outer.denested_body.contains("private Helper h;"));
        assert!(outer.denested_body.contains("void run()"));
        assert_eq!(outer.denested_body.len(), outer.body.len());
        assert!(inner.denested_body.contains("Other o;"));
    }

    fn nested_source(depth: usize) -> String {
        let mut src = String::new();
        for i in 0..depth {
            src.push_str(&format!("class N{} {{ ", i));
        }
        src.push_str(&" }".repeat(depth));
        src
    }

    #[test]
    fn test_erases_only_direct_children() {
        let decls = scan(&nested_source(3));
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["N0", "N1", "N2"]);

        assert!(!decls[0].denested_body.contains("N1"));
        assert!(!decls[0].denested_body.contains("N2"));
        assert!(!decls[1].denested_body.contains("N2"));
        assert_eq!(decls[2].denested_body, "{  }");
        for d in &decls {
            assert_eq!(d.denested_body.len(), d.body.len());
        }
    }

    #[test]
    fn test_deep_nesting_stays_fast() {
        let depth = 1_500;
        let src = nested_source(depth);
        let start = std::time::Instant::now();
        let decls = scan(&src);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));

        assert_eq!(decls.len(), depth);
        let outermost = &decls[0];
        assert!(!outermost.denested_body.contains("N1"));
        assert!(!outermost.denested_body.contains("class"));
    }

    #[test]
    fn test_many_unclosed_declarations_stay_fast() {
        let src = "class A { ".repeat(20_000);
        let start = std::time::Instant::now();
        let decls = scan(&src);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert!(decls.is_empty());
    }
}
