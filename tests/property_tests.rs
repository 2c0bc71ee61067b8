//! Property-based tests over the validation engine.

use fieldcheck::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

proptest! {
    /// `build()` has no side effects: evaluating the same declarations
    /// against the same source twice gives the same result.
    #[test]
    fn build_is_idempotent(age in any::<i64>()) {
        let source = json!({ "age": age });
        let mut builder = from_record(&source);
        builder.field("age", |f| f.is_number().min(18).max(120));

        prop_assert_eq!(builder.build(), builder.build());
    }

    /// A numeric bound agrees with plain integer comparison.
    #[test]
    fn min_matches_integer_ordering(age in -1000i64..1000, bound in -1000i64..1000) {
        let source = json!({ "age": age });
        let result = from_record(&source)
            .field("age", |f| f.min(bound))
            .build()
            .expect("source is bound");

        prop_assert_eq!(result.is_none(), age >= bound);
    }

    /// Rules other than `required` never fail on fields the source does
    /// not contain.
    #[test]
    fn absent_fields_never_fail_tolerant_rules(key in "[a-z]{1,8}") {
        let source = json!({});
        let result = from_record(&source)
            .field(key, |f| {
                f.is_string()
                    .is_number()
                    .is_not_empty()
                    .min(0)
                    .max_length(3)
                    .email()
                    .equals("x")
            })
            .build();

        prop_assert_eq!(result, Ok(None));
    }

    /// An invalid result is never an empty map and never holds an empty
    /// message list.
    #[test]
    fn error_maps_are_never_empty(values in proptest::collection::vec(any::<i64>(), 0..8)) {
        let source = Value::Array(values.iter().copied().map(Value::from).collect());
        let result = from_sequence(&source)
            .root(|r| r.is_not_empty())
            .each(|f| f.min(0))
            .build()
            .expect("source is bound");

        if let Some(errors) = result {
            prop_assert!(!errors.is_empty());
            for (_, messages) in errors.iter() {
                prop_assert!(!messages.is_empty());
            }
        }
    }

    /// Element error keys are always in-range decimal indices.
    #[test]
    fn element_keys_are_valid_indices(values in proptest::collection::vec(any::<i64>(), 1..16)) {
        let source = Value::Array(values.iter().copied().map(Value::from).collect());
        let result = from_sequence(&source)
            .each(|f| f.min(0))
            .build()
            .expect("source is bound");

        if let Some(errors) = result {
            for key in errors.keys() {
                let index: usize = key.parse().expect("decimal index key");
                prop_assert!(index < values.len());
                prop_assert!(values[index] < 0);
            }
        }
    }

    /// A string round-tripped through the length rule agrees with its
    /// character count.
    #[test]
    fn length_counts_chars(s in "\\PC{0,16}") {
        let expected = s.chars().count();
        let source = json!({ "v": s });
        let result = from_record(&source)
            .field("v", |f| f.length(expected))
            .build();

        prop_assert_eq!(result, Ok(None));
    }

    /// Numeric strings always satisfy `is_numeric`.
    #[test]
    fn finite_numbers_are_numeric(n in proptest::num::f64::NORMAL) {
        let source = json!({ "v": n.to_string() });
        let result = from_record(&source)
            .field("v", |f| f.is_numeric())
            .build();

        prop_assert_eq!(result, Ok(None));
    }
}
