//! Field rule stage
//!
//! [`FieldRules`] is the fluent accumulator handed to `field()` (and to
//! `each()` for sequence elements). Every method translates one named
//! check into a rule descriptor; the stage is consumed by the validator
//! once the declaration closure returns.
//!
//! # Absence tolerance
//!
//! Every rule except [`required`](FieldRules::required) /
//! [`required_if`](FieldRules::required_if) treats an absent value as
//! automatically passing. Absence is only an error when `required` is
//! explicitly declared, so optional fields compose without guarding every
//! subsequent rule:
//!
//! ```
//! use fieldcheck::from_record;
//! use serde_json::json;
//!
//! // `age` is absent: isNumber and min pass through.
//! let result = from_record(&json!({ "name": "John Doe" }))
//!     .field("age", |f| f.is_number().min(18))
//!     .build()
//!     .expect("source is bound");
//! assert!(result.is_none());
//! ```

use std::borrow::Cow;

use regex::Regex;
use serde_json::Value;

use crate::builder::{RecordBuilder, SequenceBuilder};
use crate::foundation::RuleOutcome;
use crate::foundation::rule::{MessageSpec, Rule};
use crate::value;

// ============================================================================
// FIELD RULES
// ============================================================================

/// Fluent accumulator for the rules of one record field (or of every
/// element of a sequence).
///
/// Rules run in declaration order and do not short-circuit: later rules
/// still run when earlier ones fail, so one field can report several
/// failures at once.
pub struct FieldRules<'a> {
    /// Enclosing source, read at declaration time by cross-field rules.
    source: Option<&'a Value>,
    rules: Vec<Rule<'a>>,
}

impl<'a> FieldRules<'a> {
    pub(crate) fn new(source: Option<&'a Value>) -> Self {
        Self {
            source,
            rules: Vec::new(),
        }
    }

    pub(crate) fn into_rules(self) -> Vec<Rule<'a>> {
        self.rules
    }

    /// Registers a rule under its wire-visible name.
    fn push(
        mut self,
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(Option<&Value>, &Value) -> RuleOutcome + 'a,
    ) -> Self {
        self.rules
            .push(Rule::new(name, move |value, source| Ok(check(value, source))));
        self
    }

    /// Registers a plain pass/fail test.
    fn push_test(
        self,
        name: impl Into<Cow<'static, str>>,
        test: impl Fn(Option<&Value>, &Value) -> bool + 'a,
    ) -> Self {
        self.push(name, move |value, source| {
            RuleOutcome::from(test(value, source))
        })
    }

    /// Registers an absence-tolerant test over a defined value.
    fn push_defined(
        self,
        name: impl Into<Cow<'static, str>>,
        test: impl Fn(&Value) -> bool + 'a,
    ) -> Self {
        self.push_test(name, move |value, _| value.is_none_or(&test))
    }

    // ------------------------------------------------------------------
    // Type and shape
    // ------------------------------------------------------------------

    /// The value must be a string.
    #[must_use]
    pub fn is_string(self) -> Self {
        self.push_defined("isString", Value::is_string)
    }

    /// The value must be a number.
    #[must_use]
    pub fn is_number(self) -> Self {
        self.push_defined("isNumber", Value::is_number)
    }

    /// The value must be an integer (i64/u64, or a float with no
    /// fractional part).
    #[must_use]
    pub fn is_integer(self) -> Self {
        self.push_defined("isInteger", value::is_integer)
    }

    /// The value must be a number, or a string that parses as one.
    #[must_use]
    pub fn is_numeric(self) -> Self {
        self.push_defined("isNumeric", value::is_numeric)
    }

    /// The value must be a boolean.
    #[must_use]
    pub fn is_boolean(self) -> Self {
        self.push_defined("isBoolean", Value::is_boolean)
    }

    /// The value must be an object (records only; arrays and `null` fail).
    #[must_use]
    pub fn is_object(self) -> Self {
        self.push_defined("isObject", Value::is_object)
    }

    /// The value must be an array.
    #[must_use]
    pub fn is_array(self) -> Self {
        self.push_defined("isArray", Value::is_array)
    }

    /// The value must be an ISO 8601 date or datetime string.
    #[must_use]
    pub fn is_date(self) -> Self {
        self.push_defined("isDate", value::is_date)
    }

    // ------------------------------------------------------------------
    // Presence
    // ------------------------------------------------------------------

    /// The value must be present and neither `null` nor `""`.
    ///
    /// This is the only rule that fails on an absent value.
    #[must_use]
    pub fn required(self) -> Self {
        self.push_test("required", |value, _| is_present(value))
    }

    /// Applies the `required` test only when `condition` holds for the
    /// sibling field `field` (the condition sees `None` when the sibling
    /// is absent).
    #[must_use]
    pub fn required_if(
        self,
        field: impl Into<String>,
        condition: impl Fn(Option<&Value>) -> bool + 'a,
    ) -> Self {
        let field = field.into();
        self.push_test("requiredIf", move |value, source| {
            !condition(source.get(field.as_str())) || is_present(value)
        })
    }

    // ------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------

    /// The value must equal `expected`.
    #[must_use]
    pub fn equals(self, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        self.push_defined("equals", move |value| *value == expected)
    }

    /// The value must not equal `expected`.
    #[must_use]
    pub fn not_equals(self, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        self.push_defined("notEquals", move |value| *value != expected)
    }

    // ------------------------------------------------------------------
    // Emptiness
    // ------------------------------------------------------------------

    /// The value must be non-empty: arrays check length, objects check
    /// key count, strings check non-blank; `null` fails.
    #[must_use]
    pub fn is_not_empty(self) -> Self {
        self.push_defined("isNotEmpty", value::is_not_empty)
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    /// The value must be `>= bound`. Numbers compare numerically; ISO
    /// 8601 date strings compare chronologically. Unordered pairs fail.
    #[must_use]
    pub fn min(self, bound: impl Into<Value>) -> Self {
        let bound = bound.into();
        self.push_defined("min", move |value| {
            value::compare(value, &bound).is_some_and(std::cmp::Ordering::is_ge)
        })
    }

    /// The value must be `<= bound`. Same ordering rules as
    /// [`min`](Self::min).
    #[must_use]
    pub fn max(self, bound: impl Into<Value>) -> Self {
        let bound = bound.into();
        self.push_defined("max", move |value| {
            value::compare(value, &bound).is_some_and(std::cmp::Ordering::is_le)
        })
    }

    /// The value's length must be exactly `expected` (strings in chars,
    /// arrays in elements).
    #[must_use]
    pub fn length(self, expected: usize) -> Self {
        self.push_defined("length", move |value| value::measure(value) == Some(expected))
    }

    /// The value's length must be at least `min`.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.push_defined("minLength", move |value| {
            value::measure(value).is_some_and(|len| len >= min)
        })
    }

    /// The value's length must be at most `max`.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.push_defined("maxLength", move |value| {
            value::measure(value).is_some_and(|len| len <= max)
        })
    }

    // ------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------

    /// The value must be a string matching `pattern`.
    #[must_use]
    pub fn regex(self, pattern: Regex) -> Self {
        self.push_defined("regex", move |value| {
            value.as_str().is_some_and(|s| pattern.is_match(s))
        })
    }

    /// The value must be a string in email format.
    #[must_use]
    pub fn email(self) -> Self {
        self.push_defined("email", value::is_email)
    }

    // ------------------------------------------------------------------
    // Cross-field and extension points
    // ------------------------------------------------------------------

    /// Custom pass/fail test; receives the value and the whole enclosing
    /// source. Reported under the rule name `custom`.
    #[must_use]
    pub fn custom(self, test: impl Fn(&Value, &Value) -> bool + 'a) -> Self {
        self.push_test("custom", move |value, source| {
            value.is_none_or(|v| test(v, source))
        })
    }

    /// Like [`custom`](Self::custom) but reported as `custom:<label>`.
    #[must_use]
    pub fn custom_labeled(
        self,
        label: impl Into<String>,
        test: impl Fn(&Value, &Value) -> bool + 'a,
    ) -> Self {
        let name = format!("custom:{}", label.into());
        self.push_test(name, move |value, source| {
            value.is_none_or(|v| test(v, source))
        })
    }

    /// Compares the value against the sibling field `field`.
    ///
    /// The sibling value is read once, at declaration time. The rule
    /// passes unless both sides are defined and `compare` rejects the
    /// pair. Reported as `compareToField:<field>`.
    #[must_use]
    pub fn compare_to_field(
        self,
        field: &str,
        compare: impl Fn(&Value, &Value) -> bool + 'a,
    ) -> Self {
        let name = format!("compareToField:{field}");
        self.compare_against(name, field, compare)
    }

    /// Like [`compare_to_field`](Self::compare_to_field) but reported as
    /// `compareToField:<label>`.
    #[must_use]
    pub fn compare_to_field_labeled(
        self,
        field: &str,
        label: &str,
        compare: impl Fn(&Value, &Value) -> bool + 'a,
    ) -> Self {
        let name = format!("compareToField:{label}");
        self.compare_against(name, field, compare)
    }

    fn compare_against(
        self,
        name: String,
        field: &str,
        compare: impl Fn(&Value, &Value) -> bool + 'a,
    ) -> Self {
        let sibling = self.source.and_then(|s| s.get(field)).cloned();
        self.push_test(name, move |value, _| {
            value.is_none_or(|v| sibling.as_ref().is_none_or(|s| compare(v, s)))
        })
    }

    /// Validates the value as a nested record with its own declarations.
    ///
    /// `declare` receives a fresh builder bound to the value, plus the
    /// enclosing source for cross-level checks. The nested result is
    /// merged into the parent under `"<field>.<nested key>"` keys.
    /// Absent and `null` values pass through; pair with
    /// [`required`](Self::required) / [`is_object`](Self::is_object) to
    /// reject them.
    #[must_use]
    pub fn validate_nested<D>(self, declare: D) -> Self
    where
        D: for<'b> Fn(&mut RecordBuilder<'b>, &'b Value) + 'a,
    {
        self.push_nested("validateNested", move |value, source| {
            let mut builder = RecordBuilder::new();
            builder.from(value);
            declare(&mut builder, source);
            builder.build()
        })
    }

    /// Validates the value as a nested sequence with its own root and
    /// per-element declarations. Key composition and pass-through match
    /// [`validate_nested`](Self::validate_nested).
    #[must_use]
    pub fn validate_array<D>(self, declare: D) -> Self
    where
        D: for<'b> Fn(&mut SequenceBuilder<'b>, &'b Value) + 'a,
    {
        self.push_nested("validateArray", move |value, source| {
            let mut builder = SequenceBuilder::new();
            builder.from(value);
            declare(&mut builder, source);
            builder.build()
        })
    }

    fn push_nested(
        mut self,
        name: &'static str,
        build: impl for<'b> Fn(&'b Value, &'b Value) -> crate::builder::BuildResult + 'a,
    ) -> Self {
        self.rules.push(Rule::new(name, move |value, source| {
            match value {
                // Nested declarations only apply to a materialized value.
                None | Some(Value::Null) => Ok(RuleOutcome::Pass),
                Some(target) => Ok(RuleOutcome::nested(build(target, source)?)),
            }
        }));
        self
    }

    /// Low-level escape hatch: registers a named rule with full control
    /// over the outcome. The check receives the value under test (`None`
    /// when absent) and the enclosing source.
    #[must_use]
    pub fn rule(
        self,
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(Option<&Value>, &Value) -> RuleOutcome + 'a,
    ) -> Self {
        self.push(name, check)
    }

    // ------------------------------------------------------------------
    // Message overrides
    // ------------------------------------------------------------------

    /// Overrides the failure message of the most recently declared rule.
    ///
    /// Has no effect before the first rule of the stage.
    #[must_use]
    pub fn message(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.message = Some(MessageSpec::Text(text.into()));
        }
        self
    }

    /// Like [`message`](Self::message) but computed from the failing
    /// value at report time.
    #[must_use]
    pub fn message_with(mut self, render: impl Fn(Option<&Value>) -> String + 'a) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.message = Some(MessageSpec::Lazy(Box::new(render)));
        }
        self
    }
}

impl std::fmt::Debug for FieldRules<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRules")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// The `required` test: present, not `null`, not the empty string.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

// ============================================================================
// TESTS
// ============================================================================
