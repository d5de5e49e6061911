//! Field-name substitution.

use super::token::{Expression, Token};
use std::collections::HashMap;

/// Field names a query may reference, in their query spelling.
pub const FIELD_NAMES: [&str; 15] = [
    "guid",
    "order",
    "opened_by",
    "opened_on",
    "message",
    "status",
    "assigned_by",
    "assigned_to",
    "assigned_on",
    "closed_by",
    "closed_on",
    "closed_msg",
    "dup_by",
    "duplicates",
    "dup_msg",
];

/// Anything a query can read fields from.
pub trait FieldSource {
    /// Value of the field called `name` (query spelling, lowercase), or
    /// `None` when the record does not carry it.
    fn field_value(&self, name: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field_value(&self, name: &str) -> Option<&str> {
        (**self).field_value(name)
    }
}

/// Canonical query spelling of `text` if it names a field.
#[must_use]
pub fn field_name(text: &str) -> Option<&'static str> {
    FIELD_NAMES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(text))
        .copied()
}

/// Copy `template`, replacing every bare field name with a literal holding
/// the record's value for it. Unset fields become empty literals.
#[must_use]
pub fn substitute<R: FieldSource + ?Sized>(template: &Expression, record: &R) -> Expression {
    template
        .iter()
        .map(|token| match token {
            Token::Bare(text) => field_name(text).map_or_else(
                || token.clone(),
                |name| Token::literal(record.field_value(name).unwrap_or_default()),
            ),
            Token::Literal(_) => token.clone(),
        })
        .collect()
}
