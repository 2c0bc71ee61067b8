//! Core validation types shared by the whole engine
//!
//! This module contains the building blocks everything else is assembled
//! from:
//!
//! - **Results**: [`ErrorMap`] — the structured "what failed where" map
//!   keyed by dotted paths.
//! - **Errors**: [`UsageError`] — programmer errors (unbound source,
//!   duplicate field declaration), as opposed to data-level failures which
//!   are always folded into the [`ErrorMap`].
//! - **Rules**: [`RuleOutcome`] and the internal rule descriptor that the
//!   stage DSL registers on validators.
//!
//! # Architecture
//!
//! A rule is a name plus a pure check over one value (with read access to
//! the enclosing source for cross-field rules). Checks never panic for
//! ordinary invalidity: a failing check reports [`RuleOutcome::Fail`] or a
//! nested [`ErrorMap`], and only usage errors travel the `Result` channel.

pub mod error;
pub mod rule;

pub use error::{ErrorMap, ROOT_KEY, UsageError};
pub use rule::RuleOutcome;
