//! Validation engines
//!
//! The traversal and aggregation layer: [`RecordValidator`] walks field
//! pipelines over a JSON object, [`SequenceValidator`] runs a root
//! pipeline and a per-element pipeline over a JSON array. Both are driven
//! through the chainable facades in [`crate::builder`].

pub mod record;
pub mod sequence;

pub use record::RecordValidator;
pub use sequence::SequenceValidator;
