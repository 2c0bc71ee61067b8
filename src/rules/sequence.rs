//! Sequence root rule stage
//!
//! [`SequenceRules`] accumulates rules that judge a sequence as a whole:
//! membership, emptiness, element count, and quantified element
//! predicates. Failures of these rules are reported under the `$root`
//! sentinel key and short-circuit per-element validation.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::RuleOutcome;
use crate::foundation::rule::{MessageSpec, Rule};
use crate::value;

// ============================================================================
// SEQUENCE RULES
// ============================================================================

/// Fluent accumulator for whole-sequence rules.
///
/// Like field rules, root rules run in declaration order without
/// short-circuiting among themselves; a sequence can fail several root
/// rules at once.
pub struct SequenceRules<'a> {
    rules: Vec<Rule<'a>>,
}

impl<'a> SequenceRules<'a> {
    pub(crate) fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub(crate) fn into_rules(self) -> Vec<Rule<'a>> {
        self.rules
    }

    fn push(
        mut self,
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(Option<&Value>, &Value) -> RuleOutcome + 'a,
    ) -> Self {
        self.rules
            .push(Rule::new(name, move |value, source| Ok(check(value, source))));
        self
    }

    /// Registers a test over the whole sequence value.
    fn push_test(self, name: impl Into<Cow<'static, str>>, test: impl Fn(&Value) -> bool + 'a) -> Self {
        self.push(name, move |_, source| RuleOutcome::from(test(source)))
    }

    /// Registers a test over the sequence's elements; non-array sources
    /// fail.
    fn push_elements(
        self,
        name: impl Into<Cow<'static, str>>,
        test: impl Fn(&[Value]) -> bool + 'a,
    ) -> Self {
        self.push_test(name, move |source| {
            source.as_array().is_some_and(|items| test(items))
        })
    }

    /// The sequence must contain at least one element.
    #[must_use]
    pub fn is_not_empty(self) -> Self {
        self.push_test("isNotEmpty", value::is_not_empty)
    }

    /// The sequence must contain an element equal to `expected`.
    #[must_use]
    pub fn includes(self, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        self.push_elements("includes", move |items| items.contains(&expected))
    }

    /// The sequence must contain every one of `expected`.
    #[must_use]
    pub fn includes_all<I>(self, expected: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let expected: Vec<Value> = expected.into_iter().map(Into::into).collect();
        self.push_elements("includesAll", move |items| {
            expected.iter().all(|e| items.contains(e))
        })
    }

    /// Every element must satisfy `test`. Holds vacuously for an empty
    /// sequence.
    #[must_use]
    pub fn every(self, test: impl Fn(&Value) -> bool + 'a) -> Self {
        self.push_elements("every", move |items| items.iter().all(&test))
    }

    /// At least one element must satisfy `test`.
    #[must_use]
    pub fn some(self, test: impl Fn(&Value) -> bool + 'a) -> Self {
        self.push_elements("some", move |items| items.iter().any(&test))
    }

    /// The sequence must have exactly `expected` elements.
    #[must_use]
    pub fn length(self, expected: usize) -> Self {
        self.push_elements("length", move |items| items.len() == expected)
    }

    /// The sequence must have at least `min` elements.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.push_elements("minLength", move |items| items.len() >= min)
    }

    /// The sequence must have at most `max` elements.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.push_elements("maxLength", move |items| items.len() <= max)
    }

    /// Low-level escape hatch: registers a named root rule. The check
    /// receives the whole sequence value twice (value under test and
    /// enclosing source coincide at the root).
    #[must_use]
    pub fn rule(
        self,
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(Option<&Value>, &Value) -> RuleOutcome + 'a,
    ) -> Self {
        self.push(name, check)
    }

    /// Overrides the failure message of the most recently declared rule.
    #[must_use]
    pub fn message(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.message = Some(MessageSpec::Text(text.into()));
        }
        self
    }

    /// Like [`message`](Self::message) but computed at report time.
    #[must_use]
    pub fn message_with(mut self, render: impl Fn(Option<&Value>) -> String + 'a) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.message = Some(MessageSpec::Lazy(Box::new(render)));
        }
        self
    }
}

impl std::fmt::Debug for SequenceRules<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceRules")
            .field("rules", &self.rules)
            .finish()
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
    use crate::foundation::ROOT_KEY;

    /// Runs one root declaration against one source and returns the
    /// `$root` failure identifiers.
    fn root_failures(
        source: Value,
        declare: impl for<'b> FnOnce(SequenceRules<'b>) -> SequenceRules<'b>,
    ) -> Vec<String> {
        let result = crate::from_sequence(&source)
            .root(declare)
            .build()
            .expect("source is bound");
        match result {
            Some(errors) => errors.get(ROOT_KEY).map(<[String]>::to_vec).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    #[test]
    fn emptiness_of_the_sequence_itself() {
        assert_eq!(root_failures(json!([]), |s| s.is_not_empty()), vec!["isNotEmpty"]);
        assert_eq!(root_failures(json!([1]), |s| s.is_not_empty()), Vec::<String>::new());
    }

    #[test]
    fn membership_rules() {
        assert_eq!(root_failures(json!([1, 2, 3]), |r| r.includes(2)), Vec::<String>::new());
        assert_eq!(root_failures(json!([1, 3]), |r| r.includes(2)), vec!["includes"]);
        assert_eq!(
            root_failures(json!(["a", "b", "c"]), |r| r.includes_all(["a", "c"])),
            Vec::<String>::new()
        );
        assert_eq!(
            root_failures(json!(["a"]), |r| r.includes_all(["a", "c"])),
            vec!["includesAll"]
        );
    }

    #[test]
    fn quantified_element_predicates() {
        assert_eq!(
            root_failures(json!([2, 4, 6]), |r| r.every(|v| v.as_i64().is_some_and(|n| n % 2 == 0))),
            Vec::<String>::new()
        );
        assert_eq!(
            root_failures(json!([2, 3]), |r| r.every(|v| v.as_i64().is_some_and(|n| n % 2 == 0))),
            vec!["every"]
        );
        // `every` holds vacuously on empty.
        assert_eq!(root_failures(json!([]), |r| r.every(|_| false)), Vec::<String>::new());

        assert_eq!(
            root_failures(json!([1, 2]), |r| r.some(|v| v.as_i64() == Some(2))),
            Vec::<String>::new()
        );
        assert_eq!(root_failures(json!([]), |r| r.some(|_| true)), vec!["some"]);
    }

    #[test]
    fn element_count_rules() {
        assert_eq!(root_failures(json!([1, 2]), |r| r.length(2)), Vec::<String>::new());
        assert_eq!(root_failures(json!([1]), |r| r.length(2)), vec!["length"]);
        assert_eq!(
            root_failures(json!([1, 2, 3]), |r| r.min_length(2).max_length(4)),
            Vec::<String>::new()
        );
        assert_eq!(root_failures(json!([1]), |r| r.min_length(2)), vec!["minLength"]);
        assert_eq!(root_failures(json!([1, 2, 3]), |r| r.max_length(2)), vec!["maxLength"]);
    }

    #[test]
    fn root_rules_accumulate_in_declaration_order() {
        assert_eq!(
            root_failures(json!([]), |r| r.is_not_empty().min_length(1)),
            vec!["isNotEmpty", "minLength"]
        );
    }

    #[test]
    fn message_overrides_last_root_rule() {
        assert_eq!(
            root_failures(json!([]), |r| r.is_not_empty().message("add at least one item")),
            vec!["add at least one item"]
        );
    }
}
