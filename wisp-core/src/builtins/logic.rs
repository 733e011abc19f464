// wisp-core - Logic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Logic and predicates: =, proc?, and?, or?, true?, false?, nil?
//! Function combinators: compose, pipe

use wisp_reader::Value;

use crate::error::Result;
use crate::eval::{apply, make_native_fn};

use super::{check_arity, check_arity_at_least, expect_callable};

/// (= x ys*) - every argument equals the first
pub(crate) fn builtin_eq(args: &[Value]) -> Result<Value> {
    let all_equal = match args.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => true,
    };
    Ok(Value::Bool(all_equal))
}

/// (proc? x)
pub(crate) fn builtin_proc_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(args[0].is_callable()))
}

/// (and? xs*) - true when no argument is false or nil; (and?) is true
pub(crate) fn builtin_and_p(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.iter().all(Value::is_truthy)))
}

/// (or? xs*) - true when some argument is truthy; (or?) is false
pub(crate) fn builtin_or_p(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.iter().any(Value::is_truthy)))
}

/// (true? x)
pub(crate) fn builtin_true_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(args[0].is_truthy()))
}

/// (false? x)
pub(crate) fn builtin_false_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}

/// (nil? x)
pub(crate) fn builtin_nil_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Nil)))
}

/// Chain `funcs`: the first receives the call's arguments, each later one the
/// previous result.
fn chained(name: &'static str, funcs: Vec<Value>) -> Value {
    Value::NativeFn(make_native_fn(name, move |args| {
        let Some((first, rest)) = funcs.split_first() else {
            return Ok(Value::Nil);
        };
        let mut value = apply(first, args)?;
        for func in rest {
            value = apply(func, &[value])?;
        }
        Ok(value)
    }))
}

fn callables(context: &'static str, args: &[Value]) -> Result<Vec<Value>> {
    check_arity_at_least(args, 1)?;
    args.iter()
        .map(|arg| expect_callable(context, arg).cloned())
        .collect()
}

/// (compose f g h) - a fn applying h, then g, then f
pub(crate) fn builtin_compose(args: &[Value]) -> Result<Value> {
    let mut funcs = callables("compose", args)?;
    funcs.reverse();
    Ok(chained("compose", funcs))
}

/// (pipe f g h) - a fn applying f, then g, then h
pub(crate) fn builtin_pipe(args: &[Value]) -> Result<Value> {
    Ok(chained("pipe", callables("pipe", args)?))
}
