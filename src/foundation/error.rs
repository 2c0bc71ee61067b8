//! Error and result types for validation
//!
//! Two very different things can go wrong during a validation run, and
//! they travel two different channels:
//!
//! - **Usage errors** ([`UsageError`]) signal programmer mistakes — calling
//!   `build()` without ever binding a source, or declaring rules for the
//!   same field twice. These surface as the `Err` side of `build()`.
//! - **Validation failures** are ordinary data invalidity. They are never
//!   an `Err`: they are collected into an [`ErrorMap`] keyed by dotted
//!   paths, and `build()` returns `Ok(Some(map))`.
//!
//! A source that passes every declared rule produces `Ok(None)`; an
//! [`ErrorMap`] is never empty.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use smallvec::SmallVec;

/// Sentinel key for whole-sequence failures.
///
/// When a sequence's root pipeline fails, the result is exactly
/// `{ "$root": [...] }`. When such a result is merged into a parent under
/// a prefix, the sentinel collapses: a root failure of the sequence at
/// field `items` surfaces as key `"items"`, not `"items.$root"`.
pub const ROOT_KEY: &str = "$root";

/// Per-key message lists are short in practice (one or two failing rules).
type Messages = SmallVec<[String; 2]>;

// ============================================================================
// USAGE ERROR
// ============================================================================

/// Programmer error in how the validation API was used.
///
/// Distinct from data invalidity: a `UsageError` means the validation
/// never meaningfully ran, while an [`ErrorMap`] means it ran and the
/// source failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
    /// `build()` was invoked before a source was bound, or the bound
    /// source was `null`.
    #[error("no source bound: call `from` before `build`")]
    UnboundSource,

    /// `field()` was called twice with the same field name.
    ///
    /// Re-declaring a field is rejected rather than silently replacing or
    /// appending to the earlier pipeline.
    #[error("rules already declared for field `{0}`")]
    DuplicateField(String),
}

// ============================================================================
// ERROR MAP
// ============================================================================

/// Structured validation result: dotted error path → failure messages.
///
/// Keys identify where in the source a failure occurred: `"age"` for a
/// record field, `"2"` for a sequence element, `"nested.data"` or
/// `"items.1.y"` for failures inside nested records and sequences.
/// Values are the names of the failing rules (or their custom messages),
/// in rule declaration order.
///
/// Insertion order is preserved, so iterating an `ErrorMap` visits
/// failures in traversal order. An `ErrorMap` returned by `build()` is
/// never empty and never has an empty message list.
///
/// # Examples
///
/// ```
/// use fieldcheck::foundation::ErrorMap;
///
/// let mut errors = ErrorMap::new();
/// errors.push("age", "min");
/// errors.push("age", "isInteger");
///
/// assert_eq!(errors.get("age"), Some(&["min".to_string(), "isInteger".to_string()][..]));
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, Messages)>,
}

impl ErrorMap {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a failure message under `key`, creating the key if needed.
    pub fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let key = key.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, messages)) => messages.push(message),
            None => {
                let mut messages = Messages::new();
                messages.push(message);
                self.entries.push((key, messages));
            }
        }
    }

    /// Appends several failure messages under `key`.
    pub fn extend_key(
        &mut self,
        key: impl Into<String>,
        messages: impl IntoIterator<Item = String>,
    ) {
        let key = key.into();
        for message in messages {
            self.push(key.clone(), message);
        }
    }

    /// Merges a nested validation result under `prefix`.
    ///
    /// Every nested key is composed as `prefix.key`, except the
    /// [`ROOT_KEY`] sentinel which collapses to `prefix` alone.
    pub fn merge_nested(&mut self, prefix: &str, nested: ErrorMap) {
        for (key, messages) in nested.entries {
            let composed = if key == ROOT_KEY {
                prefix.to_string()
            } else {
                format!("{prefix}.{key}")
            };
            self.extend_key(composed, messages);
        }
    }

    /// Looks up the messages recorded for an error key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Returns true if any failure was recorded under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of distinct error keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no failures were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }

    /// Iterates error keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// The first recorded message, if any.
    ///
    /// Used when a whole-sequence rule yields a nested result: the nested
    /// failure's own already-resolved message stands in for the rule name.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.entries
            .first()
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    /// Normalizes to the public result shape: `None` when empty.
    #[must_use]
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// Converts to a JSON object: `{ "<key>": ["<message>", ...], ... }`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, messages)| {
                    let list = messages
                        .iter()
                        .map(|m| Value::String(m.clone()))
                        .collect();
                    (key.clone(), Value::Array(list))
                })
                .collect(),
        )
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, messages) in &self.entries {
            map.serialize_entry(key, messages.as_slice())?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "validation failed at {} location(s):", self.entries.len())?;
        for (key, messages) in &self.entries {
            writeln!(f, "  {}: {}", key, messages.join(", "))?;
        }
        Ok(())
    }
}

impl<K, I, M> FromIterator<(K, I)> for ErrorMap
where
    K: Into<String>,
    I: IntoIterator<Item = M>,
    M: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, messages) in iter {
            map.extend_key(key.into(), messages.into_iter().map(Into::into));
        }
        map
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn push_groups_messages_by_key() {
        let mut errors = ErrorMap::new();
        errors.push("age", "min");
        errors.push("name", "required");
        errors.push("age", "isInteger");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("age").map(<[String]>::len), Some(2));
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["age", "name"]);
    }

    #[test]
    fn merge_composes_dotted_keys() {
        let nested: ErrorMap = [("data", ["required"])].into_iter().collect();

        let mut errors = ErrorMap::new();
        errors.merge_nested("nested", nested);

        assert_eq!(errors.get("nested.data"), Some(&["required".to_string()][..]));
    }

    #[test]
    fn merge_strips_root_sentinel() {
        let nested: ErrorMap = [(ROOT_KEY, ["isNotEmpty"])].into_iter().collect();

        let mut errors = ErrorMap::new();
        errors.merge_nested("items", nested);

        assert!(errors.contains_key("items"));
        assert!(!errors.contains_key("items.$root"));
    }

    #[test]
    fn merge_appends_on_key_collision() {
        let mut errors = ErrorMap::new();
        errors.push("items", "isArray");

        let nested: ErrorMap = [(ROOT_KEY, ["minLength"])].into_iter().collect();
        errors.merge_nested("items", nested);

        assert_eq!(
            errors.get("items"),
            Some(&["isArray".to_string(), "minLength".to_string()][..])
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn into_option_normalizes_empty_to_none() {
        assert_eq!(ErrorMap::new().into_option(), None);

        let mut errors = ErrorMap::new();
        errors.push("a", "required");
        assert!(errors.into_option().is_some());
    }

    #[test]
    fn first_message_is_insertion_order() {
        let errors: ErrorMap = [("b", vec!["second"]), ("a", vec!["third"])]
            .into_iter()
            .collect();
        assert_eq!(errors.first_message(), Some("second"));
    }

    #[test]
    fn serializes_as_json_object() {
        let errors: ErrorMap = [("age", ["min"])].into_iter().collect();
        assert_eq!(errors.to_json(), serde_json::json!({ "age": ["min"] }));
        assert_eq!(
            serde_json::to_value(&errors).expect("serialize"),
            serde_json::json!({ "age": ["min"] })
        );
    }

    #[test]
    fn display_lists_every_location() {
        let errors: ErrorMap = [("age", vec!["min", "isInteger"])].into_iter().collect();
        let rendered = errors.to_string();
        assert!(rendered.contains("1 location(s)"));
        assert!(rendered.contains("age: min, isInteger"));
    }

    #[test]
    fn usage_error_messages() {
        assert_eq!(
            UsageError::UnboundSource.to_string(),
            "no source bound: call `from` before `build`"
        );
        assert_eq!(
            UsageError::DuplicateField("age".into()).to_string(),
            "rules already declared for field `age`"
        );
    }
}
