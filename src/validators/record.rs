//! Record validation engine
//!
//! [`RecordValidator`] holds the bound source and one rule pipeline per
//! declared field, and evaluates them on `build()`. The chainable public
//! surface lives in [`crate::builder`]; this type is the engine behind it.

use serde_json::Value;

use crate::foundation::rule::Rule;
use crate::foundation::{ErrorMap, RuleOutcome, UsageError};
use crate::rules::FieldRules;

/// Validates a JSON object against per-field rule pipelines.
///
/// Fields are evaluated in declaration order; within a field, rules run in
/// declaration order without short-circuiting. A source bound to a
/// non-object value simply has every field absent, so only presence rules
/// can fail against it.
#[derive(Debug, Default)]
pub struct RecordValidator<'a> {
    source: Option<&'a Value>,
    fields: Vec<(String, Vec<Rule<'a>>)>,
    duplicate: Option<String>,
}

impl<'a> RecordValidator<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            fields: Vec::new(),
            duplicate: None,
        }
    }

    /// Binds the source record. Must precede `build()`; cross-field rules
    /// read the source bound at their declaration, so bind before
    /// declaring fields.
    pub fn bind(&mut self, source: &'a Value) {
        self.source = Some(source);
    }

    /// Declares the rule pipeline for one field.
    ///
    /// Re-declaring a field is a usage error; it is detected here and
    /// surfaced by `build()` as [`UsageError::DuplicateField`].
    pub fn field(
        &mut self,
        name: impl Into<String>,
        declare: impl FnOnce(FieldRules<'a>) -> FieldRules<'a>,
    ) {
        let name = name.into();
        if self.duplicate.is_none() && self.fields.iter().any(|(n, _)| *n == name) {
            self.duplicate = Some(name.clone());
        }
        let stage = declare(FieldRules::new(self.source));
        self.fields.push((name, stage.into_rules()));
    }

    /// Runs every declared pipeline against the bound source.
    ///
    /// Returns `Ok(None)` when the source satisfies every rule,
    /// `Ok(Some(errors))` when it does not, and `Err` for usage mistakes
    /// (unbound or `null` source, duplicate field declarations).
    pub fn build(&self) -> Result<Option<ErrorMap>, UsageError> {
        let source = self
            .source
            .filter(|v| !v.is_null())
            .ok_or(UsageError::UnboundSource)?;
        if let Some(name) = &self.duplicate {
            return Err(UsageError::DuplicateField(name.clone()));
        }

        let mut errors = ErrorMap::new();
        for (field, rules) in &self.fields {
            let value = source.get(field.as_str());
            for rule in rules {
                match (rule.check)(value, source)? {
                    RuleOutcome::Pass => {}
                    RuleOutcome::Fail => errors.push(field.clone(), rule.failure_message(value)),
                    RuleOutcome::Nested(nested) => errors.merge_nested(field, nested),
                }
            }
        }
        Ok(errors.into_option())
    }
}

// ============================================================================
// TESTS
// ============================================================================
