//! Chainable validation builders
//!
//! [`RecordBuilder`] and [`SequenceBuilder`] are thin facades over the
//! engines in [`crate::validators`], shaped for fluent declaration. The
//! free functions [`from_record`] and [`from_sequence`] are the usual
//! entry points; the builder types themselves appear in nested
//! declarations (`validate_nested` / `validate_array`), where the closure
//! receives a fresh builder already bound to the nested value.
//!
//! Methods chain by `&mut self`, so a builder works the same whether it is
//! a temporary at the call site or a borrow inside a nested closure.

use serde_json::Value;

use crate::foundation::{ErrorMap, UsageError};
use crate::rules::{FieldRules, SequenceRules};
use crate::validators::{RecordValidator, SequenceValidator};

/// Outcome of `build()`: `Ok(None)` valid, `Ok(Some(map))` invalid,
/// `Err` for API misuse.
pub type BuildResult = Result<Option<ErrorMap>, UsageError>;

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Starts validating a JSON object.
///
/// # Examples
///
/// ```
/// use fieldcheck::from_record;
/// use serde_json::json;
///
/// let source = json!({ "name": "John Doe", "age": 16 });
/// let result = from_record(&source)
///     .field("name", |f| f.is_string().required())
///     .field("age", |f| f.is_number().required().min(18))
///     .build()
///     .expect("source is bound");
///
/// let errors = result.expect("invalid");
/// assert_eq!(errors.get("age"), Some(&["min".to_string()][..]));
/// ```
#[must_use]
pub fn from_record(source: &Value) -> RecordBuilder<'_> {
    let mut builder = RecordBuilder::new();
    builder.from(source);
    builder
}

/// Starts validating a JSON array.
///
/// # Examples
///
/// ```
/// use fieldcheck::from_sequence;
/// use serde_json::json;
///
/// let source = json!([]);
/// let result = from_sequence(&source)
///     .root(|r| r.is_not_empty())
///     .build()
///     .expect("source is bound");
///
/// let errors = result.expect("invalid");
/// assert_eq!(errors.get("$root"), Some(&["isNotEmpty".to_string()][..]));
/// ```
#[must_use]
pub fn from_sequence(source: &Value) -> SequenceBuilder<'_> {
    let mut builder = SequenceBuilder::new();
    builder.from(source);
    builder
}

// ============================================================================
// RECORD BUILDER
// ============================================================================

/// Fluent builder for record validation.
#[derive(Debug, Default)]
pub struct RecordBuilder<'a> {
    validator: RecordValidator<'a>,
}

impl<'a> RecordBuilder<'a> {
    pub(crate) fn new() -> Self {
        Self {
            validator: RecordValidator::new(),
        }
    }

    /// Binds the source record. Bind before declaring fields: cross-field
    /// rules read siblings from the source bound at declaration time.
    #[allow(clippy::should_implement_trait)]
    pub fn from(&mut self, source: &'a Value) -> &mut Self {
        self.validator.bind(source);
        self
    }

    /// Declares the rule pipeline for one field. Declaring the same field
    /// twice turns `build()` into [`UsageError::DuplicateField`].
    pub fn field(
        &mut self,
        name: impl Into<String>,
        declare: impl FnOnce(FieldRules<'a>) -> FieldRules<'a>,
    ) -> &mut Self {
        self.validator.field(name, declare);
        self
    }

    /// Evaluates every declared pipeline against the bound source.
    pub fn build(&self) -> BuildResult {
        self.validator.build()
    }
}

// ============================================================================
// SEQUENCE BUILDER
// ============================================================================

/// Fluent builder for sequence validation.
#[derive(Debug, Default)]
pub struct SequenceBuilder<'a> {
    validator: SequenceValidator<'a>,
}

impl<'a> SequenceBuilder<'a> {
    pub(crate) fn new() -> Self {
        Self {
            validator: SequenceValidator::new(),
        }
    }

    /// Binds the source sequence.
    #[allow(clippy::should_implement_trait)]
    pub fn from(&mut self, source: &'a Value) -> &mut Self {
        self.validator.bind(source);
        self
    }

    /// Declares rules for the sequence as a whole. Failures land under the
    /// `$root` key and suppress element validation.
    pub fn root(
        &mut self,
        declare: impl FnOnce(SequenceRules<'a>) -> SequenceRules<'a>,
    ) -> &mut Self {
        self.validator.root(declare);
        self
    }

    /// Declares rules applied to every element.
    pub fn each(
        &mut self,
        declare: impl FnOnce(FieldRules<'a>) -> FieldRules<'a>,
    ) -> &mut Self {
        self.validator.each(declare);
        self
    }

    /// Evaluates the root pipeline, then the element pipeline.
    pub fn build(&self) -> BuildResult {
        self.validator.build()
    }
}

// ============================================================================
// TESTS
// ============================================================================
