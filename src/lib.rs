//! # fieldcheck
//!
//! A declarative validation engine for JSON-shaped values: bind a
//! `serde_json::Value` source, declare named rules per field (or per
//! sequence element), and collect every failure into a structured map
//! keyed by dotted error paths.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldcheck::from_record;
//! use serde_json::json;
//!
//! let source = json!({ "name": "John Doe", "age": 16 });
//!
//! let result = from_record(&source)
//!     .field("name", |f| f.is_string().required())
//!     .field("age", |f| f.is_number().required().min(18))
//!     .build()
//!     .expect("source is bound");
//!
//! let errors = result.expect("age is below the minimum");
//! assert_eq!(errors.get("age"), Some(&["min".to_string()][..]));
//! ```
//!
//! ## Sequences
//!
//! Arrays get two pipelines: whole-sequence rules under the `$root` key
//! (which short-circuit element validation) and per-element rules keyed by
//! index:
//!
//! ```rust
//! use fieldcheck::from_sequence;
//! use serde_json::json;
//!
//! let source = json!([1, "two", 3]);
//!
//! let result = from_sequence(&source)
//!     .root(|r| r.is_not_empty())
//!     .each(|f| f.is_number())
//!     .build()
//!     .expect("source is bound");
//!
//! let errors = result.expect("one element is not a number");
//! assert_eq!(errors.get("1"), Some(&["isNumber".to_string()][..]));
//! ```
//!
//! ## Nesting
//!
//! `validate_nested` and `validate_array` run a fresh validator over a
//! field's value and merge its failures into the parent under dotted keys
//! (`"profile.email"`, `"items.1.y"`).
//!
//! ## Outcomes
//!
//! `build()` separates data invalidity from API misuse:
//!
//! - `Ok(None)` — the source satisfies every rule.
//! - `Ok(Some(errors))` — the source is invalid; [`ErrorMap`] says what
//!   failed where.
//! - `Err(UsageError)` — the validator was misused (no source bound, a
//!   field declared twice).

pub mod builder;
pub mod foundation;
pub mod prelude;
pub mod rules;
pub mod validators;
mod value;

pub use builder::{BuildResult, RecordBuilder, SequenceBuilder, from_record, from_sequence};
pub use foundation::{ErrorMap, ROOT_KEY, RuleOutcome, UsageError};
