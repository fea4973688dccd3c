//! Field access for schemaless resource items
//!
//! Items are JSON objects whose field order follows the server response
//! (`serde_json` is built with `preserve_order`).

use serde_json::{Map, Value};

/// One resource (person, film, planet, ...) as returned by the API
pub type ResourceItem = Map<String, Value>;

/// Label shown for items without a display name
const UNNAMED: &str = "Unnamed";

/// How a field should be presented in the detail view
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// A sequence, normally of reference URLs
    List(&'a [Value]),
    /// A single reference URL
    Reference(&'a str),
    /// Anything else, already converted to text
    Plain(String),
}

/// Classifies a field value for display
pub fn classify(value: &Value) -> FieldValue<'_> {
    match value {
        Value::Array(values) => FieldValue::List(values),
        Value::String(s) if is_reference(s) => FieldValue::Reference(s),
        other => FieldValue::Plain(plain_text(other)),
    }
}

/// Returns true for strings that point at another resource
pub fn is_reference(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

/// Text form of a raw value; strings are shown without quotes
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads a field as display text
///
/// Non-empty strings and numbers count; empty strings, `null` and containers do not.
pub fn field_text(item: &ResourceItem, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The item's display name: the `key` field, falling back to `title`
pub fn primary_label(item: &ResourceItem, key: &str) -> Option<String> {
    field_text(item, key).or_else(|| field_text(item, "title"))
}

/// One-line summary used in the list view
pub fn summary(item: &ResourceItem, key: &str) -> String {
    let label = primary_label(item, key).unwrap_or_else(|| UNNAMED.to_string());
    if let Some(birth_year) = field_text(item, "birth_year") {
        format!("{} - born: {}", label, birth_year)
    } else if let Some(model) = field_text(item, "model") {
        format!("{} - model: {}", label, model)
    } else {
        label
    }
}

/// Secondary line under a list row, when the item has something worth showing
pub fn subtitle(item: &ResourceItem) -> Option<String> {
    field_text(item, "gender")
        .filter(|gender| gender != "n/a")
        .map(|gender| format!("Gender: {}", gender))
}

/// Returns the positions of items whose display name contains `query`
///
/// Matching is case-insensitive on the trimmed query; an empty query keeps
/// every item. Result order follows `items`.
pub fn filter_indices(items: &[ResourceItem], key: &str, query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return (0..items.len()).collect();
    }
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            primary_label(item, key)
                .map(|label| label.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .collect()
}
