// wisp-core - Math built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Math operations: exp, log, log2, pow, sqrt, max, min, random, abs, round

use rand::Rng;
use wisp_reader::Value;

use crate::error::Result;

use super::{check_arity, expect_number};

fn unary(context: &'static str, args: &[Value], op: fn(f64) -> f64) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::number(op(expect_number(context, &args[0])?)))
}

pub(crate) fn builtin_exp(args: &[Value]) -> Result<Value> {
    unary("exp", args, f64::exp)
}

/// (log x) - natural logarithm
pub(crate) fn builtin_log(args: &[Value]) -> Result<Value> {
    unary("log", args, f64::ln)
}

pub(crate) fn builtin_log2(args: &[Value]) -> Result<Value> {
    unary("log2", args, f64::log2)
}

pub(crate) fn builtin_sqrt(args: &[Value]) -> Result<Value> {
    unary("sqrt", args, f64::sqrt)
}

pub(crate) fn builtin_abs(args: &[Value]) -> Result<Value> {
    unary("abs", args, f64::abs)
}

/// (round x) - nearest integer, halves round up
pub(crate) fn builtin_round(args: &[Value]) -> Result<Value> {
    unary("round", args, |x| (x + 0.5).floor())
}

/// (pow base exponent)
pub(crate) fn builtin_pow(args: &[Value]) -> Result<Value> {
    check_arity(args, 2)?;
    let base = expect_number("pow", &args[0])?;
    let exponent = expect_number("pow", &args[1])?;
    Ok(Value::number(base.powf(exponent)))
}

/// Fold numbers with `pick`; NaN anywhere makes the result NaN.
fn extremum(
    context: &'static str,
    args: &[Value],
    init: f64,
    pick: fn(f64, f64) -> f64,
) -> Result<Value> {
    let mut result = init;
    for arg in args {
        let n = expect_number(context, arg)?;
        if n.is_nan() {
            return Ok(Value::number(f64::NAN));
        }
        result = pick(result, n);
    }
    Ok(Value::number(result))
}

/// (max nums*) - -Infinity when empty
pub(crate) fn builtin_max(args: &[Value]) -> Result<Value> {
    extremum("max", args, f64::NEG_INFINITY, f64::max)
}

/// (min nums*) - Infinity when empty
pub(crate) fn builtin_min(args: &[Value]) -> Result<Value> {
    extremum("min", args, f64::INFINITY, f64::min)
}

/// (random) - uniform in [0, 1)
pub(crate) fn builtin_random(args: &[Value]) -> Result<Value> {
    check_arity(args, 0)?;
    Ok(Value::number(rand::thread_rng().r#gen::<f64>()))
}
