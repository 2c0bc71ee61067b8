//! Rule declaration stages
//!
//! The fluent surfaces handed to declaration closures: [`FieldRules`] for
//! one record field (or one sequence element), [`SequenceRules`] for a
//! sequence as a whole. Each method registers one named rule; the
//! validator drains the stage when the closure returns.

pub mod field;
pub mod sequence;

pub use field::FieldRules;
pub use sequence::SequenceRules;
