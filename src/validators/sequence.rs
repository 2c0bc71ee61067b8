//! Sequence validation engine
//!
//! [`SequenceValidator`] evaluates two pipelines over a JSON array: the
//! root pipeline judging the sequence as a whole, and the element pipeline
//! applied to every element. A root failure short-circuits: the result is
//! exactly `{ "$root": [...] }` and elements are never visited.

use serde_json::Value;

use crate::foundation::rule::Rule;
use crate::foundation::{ErrorMap, ROOT_KEY, RuleOutcome, UsageError};
use crate::rules::{FieldRules, SequenceRules};

/// Validates a JSON array with whole-sequence and per-element rules.
///
/// Element failures are keyed by the element's decimal index (`"0"`,
/// `"1"`, ...); nested failures inside an element compose dotted keys such
/// as `"1.y"`. Traversal is element-outer so the messages under one index
/// follow rule declaration order.
#[derive(Debug, Default)]
pub struct SequenceValidator<'a> {
    source: Option<&'a Value>,
    root: Vec<Rule<'a>>,
    element: Vec<Rule<'a>>,
}

impl<'a> SequenceValidator<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            root: Vec::new(),
            element: Vec::new(),
        }
    }

    /// Binds the source sequence. Must precede `build()`.
    pub fn bind(&mut self, source: &'a Value) {
        self.source = Some(source);
    }

    /// Appends whole-sequence rules to the root pipeline.
    pub fn root(&mut self, declare: impl FnOnce(SequenceRules<'a>) -> SequenceRules<'a>) {
        self.root.extend(declare(SequenceRules::new()).into_rules());
    }

    /// Appends rules applied to every element of the sequence.
    ///
    /// Elements are validated with the field stage: an element of a JSON
    /// array is never absent, so presence rules only fail on `null` / `""`.
    pub fn each(&mut self, declare: impl FnOnce(FieldRules<'a>) -> FieldRules<'a>) {
        self.element
            .extend(declare(FieldRules::new(self.source)).into_rules());
    }

    /// Runs the root pipeline, then (only if it passed) the element
    /// pipeline over every element.
    pub fn build(&self) -> Result<Option<ErrorMap>, UsageError> {
        let source = self
            .source
            .filter(|v| !v.is_null())
            .ok_or(UsageError::UnboundSource)?;

        let mut root_failures = ErrorMap::new();
        for rule in &self.root {
            match (rule.check)(Some(source), source)? {
                RuleOutcome::Pass => {}
                RuleOutcome::Fail => {
                    root_failures.push(ROOT_KEY, rule.failure_message(Some(source)));
                }
                RuleOutcome::Nested(nested) => {
                    root_failures.push(ROOT_KEY, rule.nested_failure_message(Some(source), &nested));
                }
            }
        }
        if !root_failures.is_empty() {
            return Ok(Some(root_failures));
        }

        let mut errors = ErrorMap::new();
        if let Some(items) = source.as_array() {
            for (index, item) in items.iter().enumerate() {
                let key = index.to_string();
                for rule in &self.element {
                    match (rule.check)(Some(item), source)? {
                        RuleOutcome::Pass => {}
                        RuleOutcome::Fail => {
                            errors.push(key.clone(), rule.failure_message(Some(item)));
                        }
                        RuleOutcome::Nested(nested) => errors.merge_nested(&key, nested),
                    }
                }
            }
        }
        Ok(errors.into_option())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn unbound_and_null_sources_are_usage_errors() {
        let validator = SequenceValidator::new();
        assert_eq!(validator.build(), Err(UsageError::UnboundSource));

        let source = json!(null);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        assert_eq!(validator.build(), Err(UsageError::UnboundSource));
    }

    #[test]
    fn root_failure_short_circuits_elements() {
        let source = json!([]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.root(SequenceRules::is_not_empty);
        validator.each(FieldRules::is_number);

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec![ROOT_KEY]);
        assert_eq!(errors.get(ROOT_KEY), Some(&["isNotEmpty".to_string()][..]));
    }

    #[test]
    fn root_failure_hides_element_failures_entirely() {
        // Elements would fail isNumber, but the root minLength fires first.
        let source = json!(["a"]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.root(|r| r.min_length(2));
        validator.each(FieldRules::is_number);

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(ROOT_KEY));
    }

    #[test]
    fn element_failures_are_keyed_by_index() {
        let source = json!([1, "two", 3, "four"]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.each(FieldRules::is_number);

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(errors.get("1"), Some(&["isNumber".to_string()][..]));
    }

    #[test]
    fn element_messages_follow_rule_declaration_order() {
        let source = json!([""]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.each(|f| f.required().is_not_empty());

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(
            errors.get("0"),
            Some(&["required".to_string(), "isNotEmpty".to_string()][..])
        );
    }

    #[test]
    fn null_elements_are_present_values() {
        let source = json!([null]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.each(FieldRules::required);

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(errors.get("0"), Some(&["required".to_string()][..]));
    }

    #[test]
    fn non_array_source_fails_root_checks_as_data_errors() {
        let source = json!({ "not": "an array" });
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.root(|r| r.min_length(1));

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(errors.get(ROOT_KEY), Some(&["minLength".to_string()][..]));
    }

    #[test]
    fn valid_sequence_yields_none() {
        let source = json!([2, 4, 6]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.root(|r| {
            r.is_not_empty()
                .every(|v| v.as_i64().is_some_and(|n| n % 2 == 0))
        });
        validator.each(FieldRules::is_number);
        assert_eq!(validator.build(), Ok(None));
    }

    #[test]
    fn custom_element_rules_see_the_whole_sequence_as_source() {
        // Each element must be <= the last element.
        let source = json!([1, 5, 3]);
        let mut validator = SequenceValidator::new();
        validator.bind(&source);
        validator.each(|f| {
            f.custom(|value, sequence| {
                let last = sequence
                    .as_array()
                    .and_then(|items| items.last())
                    .and_then(Value::as_i64);
                value.as_i64().zip(last).is_some_and(|(v, max)| v <= max)
            })
        });

        let errors = validator.build().expect("bound").expect("invalid");
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["1"]);
    }
}
