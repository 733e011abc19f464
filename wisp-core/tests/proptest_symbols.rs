// wisp-core - Property-based tests for symbols and scopes
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for symbol identity and scope shadowing.
//!
//! Tests the following properties:
//! - Two lookups of a name give the same interned symbol
//! - `sym` interns the same symbol the reader does
//! - `def` in a child scope never touches the parent binding

mod common;

use common::{Env, Reader, Symbol, Value, eval_all, new_env};
use proptest::prelude::*;

/// Names that read as plain symbols: a letter first, no delimiters.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9?!*-]{0,8}".prop_filter("reserved words", |s| {
        !matches!(
            s.as_str(),
            "if" | "def" | "fn" | "defn" | "quote" | "do" | "let" | "loop" | "break" | "try"
                | "catch" | "finally" | "throw" | "nil" | "true" | "false" | "let*" | "set!"
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_symbols_are_interned(name in arb_name()) {
        let a = Symbol::new(&name);
        let b = Symbol::new(&name);
        prop_assert!(a.ptr_eq(&b));

        let read = Reader::read_all(&name).unwrap().remove(0);
        let Value::Symbol(c) = read else {
            return Err(TestCaseError::fail(format!("{} did not read as a symbol", name)));
        };
        prop_assert!(a.ptr_eq(&c));
    }

    #[test]
    fn prop_sym_builtin_interns(name in arb_name()) {
        let env = new_env();
        let value = eval_all(&format!("(sym \"{}\")", name), &env).unwrap();
        let Value::Symbol(sym) = value else {
            return Err(TestCaseError::fail("sym did not return a symbol"));
        };
        prop_assert!(sym.ptr_eq(&Symbol::new(&name)));
    }

    #[test]
    fn prop_child_def_shadows(name in arb_name(), outer in -100i32..100, inner in -100i32..100) {
        let parent = Env::new();
        let sym = Symbol::new(&name);
        parent.define(sym.clone(), Value::number(f64::from(outer))).unwrap();

        let child = parent.child();
        child.define(sym.clone(), Value::number(f64::from(inner))).unwrap();

        prop_assert_eq!(child.lookup(&sym).unwrap(), Value::number(f64::from(inner)));
        prop_assert_eq!(parent.lookup(&sym).unwrap(), Value::number(f64::from(outer)));
    }
}
