// wisp-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers and utilities for Wisp integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`eval_str`] - Evaluate every form of a source text in a fresh global scope
//! - [`eval_all`] - Evaluate every form in an existing scope, returning the last
//! - [`eval_print`] - Like [`eval_str`], but printed, with errors as their message
//! - [`new_env`] - Create a fresh global scope
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that code produces an error, optionally of a given shape

#![allow(dead_code)]

#[allow(unused_imports)]
pub use wisp_core::{Env, Error, Result, Value, eval, global_env};
#[allow(unused_imports)]
pub use wisp_reader::{Reader, Symbol};

/// Evaluate a source text in a fresh global scope, returning the last value.
pub fn eval_str(s: &str) -> Result<Value> {
    eval_all(s, &new_env())
}

/// Evaluate every form of a source text in `env`, returning the last value.
pub fn eval_all(s: &str, env: &Env) -> Result<Value> {
    let mut result = Value::Nil;
    for form in Reader::read_all(s)? {
        result = eval(&form, env)?;
    }
    Ok(result)
}

/// The printed result of [`eval_str`], or the error message.
#[allow(dead_code)]
pub fn eval_print(s: &str) -> String {
    match eval_str(s) {
        Ok(value) => value.to_string(),
        Err(err) => err.to_string(),
    }
}

/// A fresh global scope with no host bindings.
#[must_use]
pub fn new_env() -> Env {
    global_env(Vec::new())
}

/// Assert that evaluating `input` produces the expected value.
///
/// # Example
///
/// ```ignore
/// assert_eval!("(+ 1 2)", Value::number(3.0));
/// ```
#[macro_export]
macro_rules! assert_eval {
    ($input:expr, $expected:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

/// Assert that evaluating `input` produces an error, optionally matching a pattern.
///
/// # Example
///
/// ```ignore
/// assert_eval_err!("(+ 1 \"a\")");
/// assert_eval_err!("nope", Error::Undefined(_));
/// ```
#[macro_export]
macro_rules! assert_eval_err {
    ($input:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_err(),
            "Expected error for '{}' but got {:?}",
            $input,
            result.ok()
        );
    };
    ($input:expr, $pattern:pat) => {
        let result = $crate::common::eval_str($input);
        assert!(
            matches!(result, Err($pattern)),
            "Expected {} for '{}' but got {:?}",
            stringify!($pattern),
            $input,
            result
        );
    };
}
