//! Rule descriptors and the closed rule outcome type
//!
//! Every declaration made through the stage DSL compiles down to one
//! [`Rule`]: a wire-visible name, a boxed check, and an optional message
//! override. Checks return the closed [`RuleOutcome`] type — pass, fail,
//! or a nested error map — instead of being inspected for their runtime
//! shape.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::error::{ErrorMap, UsageError};

// ============================================================================
// RULE OUTCOME
// ============================================================================

/// Result of evaluating a single rule against a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The value satisfies the rule (or the rule does not apply, e.g. the
    /// value is absent and the rule is absence-tolerant).
    Pass,
    /// The value violates the rule; the rule's name or custom message is
    /// recorded at the target's error key.
    Fail,
    /// A nested validator ran over the value and failed; its error map is
    /// merged into the parent under the target's key.
    Nested(ErrorMap),
}

impl RuleOutcome {
    /// Maps a nested validator's result: a clean result passes, a failed
    /// one carries its error map.
    #[must_use]
    pub fn nested(result: Option<ErrorMap>) -> Self {
        match result {
            Some(errors) => Self::Nested(errors),
            None => Self::Pass,
        }
    }
}

impl From<bool> for RuleOutcome {
    fn from(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }
}

// ============================================================================
// RULE DESCRIPTOR
// ============================================================================

/// Boxed rule check.
///
/// Receives the value under test (`None` when the record field is absent)
/// and the enclosing source for cross-field rules. Usage errors raised by
/// nested declarations propagate through the `Result` channel; ordinary
/// invalidity is a [`RuleOutcome`].
pub(crate) type Check<'a> =
    Box<dyn Fn(Option<&Value>, &Value) -> Result<RuleOutcome, UsageError> + 'a>;

/// Custom failure message attached to a single rule declaration.
pub(crate) enum MessageSpec<'a> {
    /// Fixed text.
    Text(Cow<'static, str>),
    /// Computed from the failing value at report time.
    Lazy(Box<dyn Fn(Option<&Value>) -> String + 'a>),
}

impl MessageSpec<'_> {
    fn resolve(&self, value: Option<&Value>) -> String {
        match self {
            Self::Text(text) => text.clone().into_owned(),
            Self::Lazy(render) => render(value),
        }
    }
}

/// One entry in a validation pipeline.
pub(crate) struct Rule<'a> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) check: Check<'a>,
    pub(crate) message: Option<MessageSpec<'a>>,
}

impl<'a> Rule<'a> {
    pub(crate) fn new(
        name: impl Into<Cow<'static, str>>,
        check: impl Fn(Option<&Value>, &Value) -> Result<RuleOutcome, UsageError> + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            check: Box::new(check),
            message: None,
        }
    }

    /// The failure identifier recorded for this rule: the custom message
    /// when one was declared (and resolves non-empty), the rule name
    /// otherwise.
    pub(crate) fn failure_message(&self, value: Option<&Value>) -> String {
        match &self.message {
            Some(spec) => {
                let resolved = spec.resolve(value);
                if resolved.is_empty() {
                    self.name.clone().into_owned()
                } else {
                    resolved
                }
            }
            None => self.name.clone().into_owned(),
        }
    }

    /// The failure identifier for a rule whose check produced a nested
    /// error map while its target is reported as a single entry (the
    /// whole-sequence case): custom message first, then the nested map's
    /// own first message, then the rule name.
    pub(crate) fn nested_failure_message(&self, value: Option<&Value>, nested: &ErrorMap) -> String {
        if let Some(spec) = &self.message {
            let resolved = spec.resolve(value);
            if !resolved.is_empty() {
                return resolved;
            }
        }
        nested
            .first_message()
            .map_or_else(|| self.name.clone().into_owned(), str::to_string)
    }
}

impl std::fmt::Debug for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("check", &"<function>")
            .field("message", &self.message.is_some())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
