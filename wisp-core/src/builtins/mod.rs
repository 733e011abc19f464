// wisp-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions for Wisp.
//!
//! Builtins live in a fixed table consulted after the scope chain, so they are
//! never members of any environment. A `def` of the same name in a reachable
//! scope shadows a builtin; nothing else does. The global aliases in
//! [`globals`] are ordinary bindings in the global scope.

mod arithmetic;
mod globals;
pub(crate) mod lists;
mod logic;
mod math;
mod streams;
mod symbols;

use std::collections::HashMap;

use wisp_reader::{Symbol, Value, Vector};

use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::make_native_fn;

pub use globals::{global_env, register_globals};

use arithmetic::{
    builtin_add, builtin_div, builtin_ge, builtin_gt, builtin_le, builtin_lt, builtin_mul,
    builtin_sub,
};
use lists::{
    builtin_apply, builtin_cons, builtin_empty_p, builtin_first, builtin_len, builtin_list,
    builtin_map, builtin_nth, builtin_reduce, builtin_rest, builtin_second, builtin_slice,
    builtin_third,
};
use logic::{
    builtin_and_p, builtin_compose, builtin_eq, builtin_false_p, builtin_nil_p, builtin_or_p,
    builtin_pipe, builtin_proc_p, builtin_true_p,
};
use math::{
    builtin_abs, builtin_exp, builtin_log, builtin_log2, builtin_max, builtin_min, builtin_pow,
    builtin_random, builtin_round, builtin_sqrt,
};
use streams::{
    builtin_chain, builtin_map_stream, builtin_next, builtin_next_p, builtin_stream,
    builtin_stream_p,
};
use symbols::{builtin_str, builtin_sym, builtin_sym_p};

/// Signature shared by every builtin.
pub type BuiltinFn = fn(&[Value]) -> Result<Value>;

thread_local! {
    static BUILTINS: HashMap<Symbol, Value> = builtin_table();
}

/// Look up a name in the builtin table.
#[must_use]
pub fn lookup_builtin(sym: &Symbol) -> Option<Value> {
    BUILTINS.with(|table| table.get(sym).cloned())
}

/// Every name in the builtin table, sorted.
#[must_use]
pub fn builtin_names() -> Vec<Symbol> {
    let mut names: Vec<Symbol> = BUILTINS.with(|table| table.keys().cloned().collect());
    names.sort();
    names
}

fn builtin_table() -> HashMap<Symbol, Value> {
    let mut table = HashMap::new();
    let mut native = |name: &'static str, func: BuiltinFn| {
        table.insert(Symbol::new(name), Value::NativeFn(make_native_fn(name, func)));
    };

    // Arithmetic and comparison
    native("+", builtin_add);
    native("-", builtin_sub);
    native("*", builtin_mul);
    native("/", builtin_div);
    native("<", builtin_lt);
    native(">", builtin_gt);
    native("<=", builtin_le);
    native(">=", builtin_ge);
    native("=", builtin_eq);

    // Lists
    native("1st", builtin_first);
    native("2nd", builtin_second);
    native("3rd", builtin_third);
    native("nth", builtin_nth);
    native("rest", builtin_rest);
    native("list", builtin_list);
    native("cons", builtin_cons);
    native("empty?", builtin_empty_p);
    native("len", builtin_len);
    native("slice", builtin_slice);

    // Higher order
    native("apply", builtin_apply);
    native("map", builtin_map);
    native("reduce", builtin_reduce);
    native("compose", builtin_compose);
    native("pipe", builtin_pipe);

    // Logic and predicates
    native("proc?", builtin_proc_p);
    native("and?", builtin_and_p);
    native("or?", builtin_or_p);
    native("true?", builtin_true_p);
    native("false?", builtin_false_p);
    native("nil?", builtin_nil_p);

    // Streams
    native("stream", builtin_stream);
    native("stream?", builtin_stream_p);
    native("next", builtin_next);
    native("next?", builtin_next_p);
    native("map-stream", builtin_map_stream);
    native("chain", builtin_chain);

    // Symbols and strings
    native("sym", builtin_sym);
    native("sym?", builtin_sym_p);
    native("str", builtin_str);

    // Math
    native("exp", builtin_exp);
    native("log", builtin_log);
    native("log2", builtin_log2);
    native("pow", builtin_pow);
    native("sqrt", builtin_sqrt);
    native("max", builtin_max);
    native("min", builtin_min);
    native("random", builtin_random);
    native("abs", builtin_abs);
    native("round", builtin_round);

    table.insert(Symbol::new("PI"), Value::number(std::f64::consts::PI));
    table.insert(Symbol::new("E"), Value::number(std::f64::consts::E));
    table
}

/// Extension trait for registering native functions.
pub trait EnvExt {
    fn define_native(&self, name: &'static str, func: BuiltinFn);
}

impl EnvExt for Env {
    fn define_native(&self, name: &'static str, func: BuiltinFn) {
        let native = make_native_fn(name, func);
        self.bind(Symbol::new(name), Value::NativeFn(native));
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

pub(crate) fn check_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::arity(expected, args.len()))
    }
}

pub(crate) fn check_arity_at_least(args: &[Value], expected: usize) -> Result<()> {
    if args.len() >= expected {
        Ok(())
    } else {
        Err(Error::arity_at_least(expected, args.len()))
    }
}

pub(crate) fn expect_number(context: &'static str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(Error::type_error_in(context, "number", other)),
    }
}

pub(crate) fn expect_list<'a>(
    context: &'static str,
    value: &'a Value,
) -> Result<&'a Vector<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(Error::type_error_in(context, "list", other)),
    }
}

pub(crate) fn expect_callable<'a>(context: &'static str, value: &'a Value) -> Result<&'a Value> {
    if value.is_callable() {
        Ok(value)
    } else {
        Err(Error::type_error_in(context, "fn", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contents() {
        let names: Vec<String> = builtin_names()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        for expected in ["+", "nth", "map-stream", "sym?", "PI", "round"] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
        // Aliases are global bindings, not builtins
        assert!(!names.iter().any(|n| n == "not"));
    }

    #[test]
    fn test_lookup_is_shared() {
        let a = lookup_builtin(&Symbol::new("+")).unwrap();
        let b = lookup_builtin(&Symbol::new("+")).unwrap();
        assert_eq!(a, b);
        assert!(lookup_builtin(&Symbol::new("no-such")).is_none());
    }

    #[test]
    fn test_constants() {
        assert_eq!(
            lookup_builtin(&Symbol::new("PI")),
            Some(Value::number(std::f64::consts::PI))
        );
    }
}
