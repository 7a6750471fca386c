//! Field relationship classification.
//!
//! Fields are read from the region of a body that precedes the first
//! method or constructor signature. Each field typed with another declared
//! type is classified exactly once, in priority order:
//!
//! 1. composition: the field is private and the body assigns it a `new`
//!    instance of its own type;
//! 2. aggregation: the type is taken as a parameter (setters included) or
//!    the field is assigned from some other expression;
//! 3. association: anything else.

use rayon::prelude::*;
use tracing::debug;

use crate::analysis::tokens::{contains_word, lookback, statement_start, word_positions, Cursor};
use crate::analysis::TypeDeclaration;
use crate::config::Heuristics;

use super::patterns::{field_declaration_at, is_parameter_at, is_setter_parameter_at, type_use_at};
use super::{Relation, TypeGraph};

/// A field typed with a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// The declared type the field refers to.
    pub type_name: String,
    /// Offset of the type occurrence within the scanned region.
    pub offset: usize,
    pub is_private: bool,
}

/// The part of a body before its first method or constructor signature.
///
/// A signature is the first `)` followed by `{`, with whitespace and an
/// optional `throws` list in between. The region stops at the statement
/// boundary before that signature. Without any signature the whole body is
/// the region.
pub fn field_region(body: &str) -> &str {
    let end = body
        .match_indices(')')
        .map(|(pos, _)| pos)
        .find(|&pos| opens_body_after(body, pos + 1))
        .map(|pos| statement_start(body, pos, pos))
        .unwrap_or(body.len());
    &body[..end]
}

fn opens_body_after(text: &str, from: usize) -> bool {
    let mut cursor = Cursor::new(text, from);
    cursor.skip_ws();
    if cursor.eat_word("throws") {
        loop {
            cursor.skip_ws();
            if cursor.qualified_ident().is_none() {
                return false;
            }
            cursor.skip_ws();
            if !cursor.eat(b',') {
                break;
            }
        }
    }
    cursor.peek() == Some(b'{')
}

/// Collect fields in `region` whose type is one of `type_names`, other than
/// `owner`. The first declaration of a given field name wins.
pub fn extract_fields(
    owner: &str,
    region: &str,
    type_names: &[&str],
    heuristics: &Heuristics,
) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();

    for &type_name in type_names.iter().filter(|n| **n != owner) {
        for pos in word_positions(region, type_name) {
            let (at, ty) = type_use_at(region, pos, type_name);
            let Some(name) = field_declaration_at(region, at, ty) else {
                continue;
            };
            if fields.iter().any(|f| f.name == name) {
                continue;
            }
            let window = lookback(region, at, heuristics.field_window);
            fields.push(Field {
                name: name.to_string(),
                type_name: type_name.to_string(),
                offset: at,
                is_private: contains_word(window, "private"),
            });
        }
    }

    fields.sort_by_key(|f| f.offset);
    fields
}

/// Classify one field against the full body of its owner.
pub fn classify_field(field: &Field, body: &str) -> Relation {
    if field.is_private && assigned_new(body, &field.name, &field.type_name) {
        Relation::Composition
    } else if taken_as_parameter(body, &field.type_name)
        || assigned_from_expression(body, &field.name)
    {
        Relation::Aggregation
    } else {
        Relation::Association
    }
}

/// Positions right after each `name =` (not `==`) in `body`.
fn assignments<'a>(body: &'a str, name: &'a str) -> impl Iterator<Item = Cursor<'a>> + 'a {
    word_positions(body, name).filter_map(move |pos| {
        let mut cursor = Cursor::new(body, pos + name.len());
        cursor.skip_ws();
        if !cursor.eat(b'=') || cursor.peek() == Some(b'=') {
            return None;
        }
        cursor.skip_ws();
        Some(cursor)
    })
}

/// `name = new Type...` anywhere in the body.
fn assigned_new(body: &str, name: &str, type_name: &str) -> bool {
    assignments(body, name).any(|mut cursor| {
        if !cursor.eat_word("new") {
            return false;
        }
        cursor.skip_ws();
        cursor.qualified_ident() == Some(type_name)
    })
}

/// `name = <expr>` where the expression is neither `new ...` nor `null`.
fn assigned_from_expression(body: &str, name: &str) -> bool {
    assignments(body, name).any(|mut cursor| {
        if cursor.eat_word("new") || cursor.eat_word("null") {
            return false;
        }
        let mut probe = cursor.clone();
        probe.ident().is_some() || cursor.peek() == Some(b'(')
    })
}

/// Whether `type_name` is a formal parameter anywhere, or the parameter of
/// a setter-like method.
fn taken_as_parameter(body: &str, type_name: &str) -> bool {
    word_positions(body, type_name).any(|pos| {
        let (at, ty) = type_use_at(body, pos, type_name);
        is_parameter_at(body, at, ty) || is_setter_parameter_at(body, pos)
    })
}

fn field_relations(
    decl: &TypeDeclaration,
    type_names: &[&str],
    heuristics: &Heuristics,
) -> Vec<(String, Relation, String)> {
    let region = field_region(&decl.denested_body);
    extract_fields(&decl.name, region, type_names, heuristics)
        .into_iter()
        .map(|field| {
            let relation = classify_field(&field, &decl.body);
            (decl.name.clone(), relation, field.type_name)
        })
        .collect()
}

/// Classify the fields of every declared type and record the results.
pub fn classify_fields(graph: &mut TypeGraph, heuristics: &Heuristics) {
    let names: Vec<&str> = graph.names().collect();
    let owners: Vec<&TypeDeclaration> = names.iter().filter_map(|n| graph.latest(n)).collect();

    let edges: Vec<(String, Relation, String)> = owners
        .par_iter()
        .flat_map_iter(|decl| field_relations(decl, &names, heuristics))
        .collect();

    debug!(fields = edges.len(), "fields classified");

    for (from, relation, to) in edges {
        graph.record(&from, relation, &to);
    }
}
