// wisp-core - Property-based tests for exception matching
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for hierarchical exception identifiers.
//!
//! Tests the following properties:
//! - Every segment prefix of a thrown identifier catches it
//! - The wildcard catches everything
//! - A catch identifier longer than the thrown one never matches
//! - An uncaught exception keeps its identifier and payload

mod common;

use common::{Error, Value, eval_str};
use proptest::prelude::*;
use wisp_core::{Symbol, catch_matches};

// =============================================================================
// Strategies
// =============================================================================

/// Dotted identifiers of one to four short segments.
fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{1,3}", 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_prefixes_match(segments in arb_segments(), take in 1usize..=4) {
        let thrown = Symbol::new(&segments.join("."));
        let k = take.min(segments.len());
        let prefix = Symbol::new(&segments[..k].join("."));
        prop_assert!(catch_matches(&prefix, &thrown));
        prop_assert!(catch_matches(&Symbol::new("..."), &thrown));
    }

    #[test]
    fn prop_longer_catch_never_matches(segments in arb_segments(), extra in "[a-d]{1,3}") {
        let thrown = Symbol::new(&segments.join("."));
        let longer = Symbol::new(&format!("{}.{}", segments.join("."), extra));
        prop_assert!(!catch_matches(&longer, &thrown));
    }

    #[test]
    fn prop_sibling_does_not_match(segments in arb_segments()) {
        let thrown = Symbol::new(&segments.join("."));
        let mut sibling = segments.clone();
        if let Some(last) = sibling.last_mut() {
            last.push('z');
        }
        prop_assert!(!catch_matches(&Symbol::new(&sibling.join(".")), &thrown));
    }

    #[test]
    fn prop_evaluated_catch_agrees(segments in arb_segments(), take in 1usize..=4) {
        let id = segments.join(".");
        let k = take.min(segments.len());
        let source = format!(
            "(try (throw {} 7) (catch {} e (2nd e)))",
            id,
            segments[..k].join(".")
        );
        prop_assert_eq!(eval_str(&source).unwrap(), Value::number(7.0));
    }

    #[test]
    fn prop_uncaught_keeps_identity(segments in arb_segments(), payload in -1000i32..1000) {
        let id = segments.join(".");
        let source = format!("(try (throw {} {}) (catch {}z e 0))", id, payload, id);
        match eval_str(&source) {
            Err(Error::Thrown(exception)) => {
                prop_assert_eq!(exception.id.name(), id.as_str());
                prop_assert_eq!(exception.payload, Value::number(f64::from(payload)));
            }
            other => prop_assert!(false, "expected uncaught exception, got {:?}", other),
        }
    }
}
