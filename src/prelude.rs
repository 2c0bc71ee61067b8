//! Prelude module for convenient imports.
//!
//! Provides a single `use fieldcheck::prelude::*;` import that brings in
//! the entry points, the rule stages, and the result types.
//!
//! # Examples
//!
//! ```rust
//! use fieldcheck::prelude::*;
//! use serde_json::json;
//!
//! let source = json!({ "email": "user@example.com" });
//! let result = from_record(&source)
//!     .field("email", |f| f.is_string().required().email())
//!     .build();
//! assert_eq!(result, Ok(None));
//! ```

// ============================================================================
// ENTRY POINTS AND BUILDERS
// ============================================================================

pub use crate::builder::{BuildResult, RecordBuilder, SequenceBuilder, from_record, from_sequence};

// ============================================================================
// RULE STAGES
// ============================================================================

pub use crate::rules::{FieldRules, SequenceRules};

// ============================================================================
// RESULTS AND ERRORS
// ============================================================================

pub use crate::foundation::{ErrorMap, ROOT_KEY, RuleOutcome, UsageError};

// ============================================================================
// ENGINES
// ============================================================================

pub use crate::validators::{RecordValidator, SequenceValidator};
