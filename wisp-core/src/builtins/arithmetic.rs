// wisp-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic and comparison: +, -, *, /, <, >, <=, >=
//!
//! All numbers are doubles, so nothing here overflows or divides by zero:
//! `(/ 1 0)` is `Infinity`.

use wisp_reader::Value;

use crate::error::Result;

use super::{check_arity_at_least, expect_number};

fn numbers(context: &'static str, args: &[Value]) -> Result<Vec<f64>> {
    args.iter().map(|arg| expect_number(context, arg)).collect()
}

/// (+ nums*) - sum, 0 when empty
pub(crate) fn builtin_add(args: &[Value]) -> Result<Value> {
    Ok(Value::number(numbers("+", args)?.into_iter().sum()))
}

/// (- x) negates; (- x ys*) subtracts left to right
pub(crate) fn builtin_sub(args: &[Value]) -> Result<Value> {
    check_arity_at_least(args, 1)?;
    let nums = numbers("-", args)?;
    let result = match nums.split_first() {
        Some((x, [])) => -x,
        Some((x, rest)) => rest.iter().fold(*x, |acc, n| acc - n),
        None => 0.0,
    };
    Ok(Value::number(result))
}

/// (* nums*) - product, 1 when empty
pub(crate) fn builtin_mul(args: &[Value]) -> Result<Value> {
    Ok(Value::number(numbers("*", args)?.into_iter().product()))
}

/// (/ x) is the reciprocal; (/ x ys*) divides left to right
pub(crate) fn builtin_div(args: &[Value]) -> Result<Value> {
    check_arity_at_least(args, 1)?;
    let nums = numbers("/", args)?;
    let result = match nums.split_first() {
        Some((x, [])) => 1.0 / x,
        Some((x, rest)) => rest.iter().fold(*x, |acc, n| acc / n),
        None => 1.0,
    };
    Ok(Value::number(result))
}

/// True when every adjacent pair satisfies `holds`; vacuously true.
fn compare(context: &'static str, args: &[Value], holds: fn(f64, f64) -> bool) -> Result<Value> {
    let nums = numbers(context, args)?;
    Ok(Value::Bool(nums.windows(2).all(|pair| holds(pair[0], pair[1]))))
}

pub(crate) fn builtin_lt(args: &[Value]) -> Result<Value> {
    compare("<", args, |a, b| a < b)
}

pub(crate) fn builtin_gt(args: &[Value]) -> Result<Value> {
    compare(">", args, |a, b| a > b)
}

pub(crate) fn builtin_le(args: &[Value]) -> Result<Value> {
    compare("<=", args, |a, b| a <= b)
}

pub(crate) fn builtin_ge(args: &[Value]) -> Result<Value> {
    compare(">=", args, |a, b| a >= b)
}
