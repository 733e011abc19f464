// wisp-core - List built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! List operations: 1st, 2nd, 3rd, nth, rest, list, cons, empty?, len, slice
//! Higher order: apply, map, reduce

use wisp_reader::{Value, Vector};

use crate::error::{Error, Result};
use crate::eval::apply;

use super::{check_arity, expect_callable, expect_list, expect_number};

fn element(context: &'static str, args: &[Value], index: usize) -> Result<Value> {
    check_arity(args, 1)?;
    let items = expect_list(context, &args[0])?;
    Ok(items.get(index).cloned().unwrap_or(Value::Nil))
}

/// (1st lst)
pub(crate) fn builtin_first(args: &[Value]) -> Result<Value> {
    element("1st", args, 0)
}

/// (2nd lst)
pub(crate) fn builtin_second(args: &[Value]) -> Result<Value> {
    element("2nd", args, 1)
}

/// (3rd lst)
pub(crate) fn builtin_third(args: &[Value]) -> Result<Value> {
    element("3rd", args, 2)
}

/// (nth i lst) - the i-th element, counting from 1
pub(crate) fn builtin_nth(args: &[Value]) -> Result<Value> {
    check_arity(args, 2)?;
    let n = expect_number("nth", &args[0])?;
    let items = expect_list("nth", &args[1])?;
    if n < 1.0 || n.fract() != 0.0 {
        return Ok(Value::Nil);
    }
    Ok(items.get(n as usize - 1).cloned().unwrap_or(Value::Nil))
}

/// (rest lst) - everything after the first element
pub(crate) fn builtin_rest(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    let items = expect_list("rest", &args[0])?;
    Ok(Value::List(items.clone().slice(1.min(items.len())..)))
}

/// (list xs*)
pub(crate) fn builtin_list(args: &[Value]) -> Result<Value> {
    Ok(Value::list(args.iter().cloned()))
}

/// (cons x lst)
pub(crate) fn builtin_cons(args: &[Value]) -> Result<Value> {
    check_arity(args, 2)?;
    let mut items = expect_list("cons", &args[1])?.clone();
    items.push_front(args[0].clone());
    Ok(Value::List(items))
}

/// (empty? lst)
pub(crate) fn builtin_empty_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(expect_list("empty?", &args[0])?.is_empty()))
}

/// (len s) - characters in a string or elements in a list
pub(crate) fn builtin_len(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        other => return Err(Error::type_error_in("len", "string or list", other)),
    };
    Ok(Value::number(len as f64))
}

/// Resolve slice bounds against a length.
///
/// Negative bounds count back from the end, nil leaves the bound open, and
/// the result is clamped to `0..=len` with `start <= end`.
pub(crate) fn slice_bounds(len: usize, start: &Value, end: &Value) -> Result<(usize, usize)> {
    let resolve = |bound: &Value, open: usize| -> Result<usize> {
        let n = match bound {
            Value::Nil => return Ok(open),
            other => expect_number("slice", other)?,
        };
        let n = if n.is_nan() { 0.0 } else { n.trunc() };
        let len_f = len as f64;
        let absolute = if n < 0.0 { (len_f + n).max(0.0) } else { n.min(len_f) };
        Ok(absolute as usize)
    };
    let from = resolve(start, 0)?;
    let to = resolve(end, len)?;
    Ok((from, to.max(from)))
}

/// (slice s start end?) - a sub-list or sub-string
pub(crate) fn builtin_slice(args: &[Value]) -> Result<Value> {
    if !(1..=3).contains(&args.len()) {
        return Err(Error::arity(3, args.len()));
    }
    let start = args.get(1).unwrap_or(&Value::Nil);
    let end = args.get(2).unwrap_or(&Value::Nil);
    match &args[0] {
        Value::List(items) => {
            let (from, to) = slice_bounds(items.len(), start, end)?;
            Ok(Value::List(items.clone().slice(from..to)))
        }
        Value::String(s) => {
            let (from, to) = slice_bounds(s.chars().count(), start, end)?;
            let sub: String = s.chars().skip(from).take(to - from).collect();
            Ok(Value::string(sub))
        }
        other => Err(Error::type_error_in("slice", "string or list", other)),
    }
}

/// (apply f lst) - call f with the list's elements as arguments
pub(crate) fn builtin_apply(args: &[Value]) -> Result<Value> {
    check_arity(args, 2)?;
    let func = expect_callable("apply", &args[0])?;
    let call_args: Vec<Value> = expect_list("apply", &args[1])?.iter().cloned().collect();
    apply(func, &call_args)
}

/// (map f lst) - a new list of f applied to each element
pub(crate) fn builtin_map(args: &[Value]) -> Result<Value> {
    check_arity(args, 2)?;
    let func = expect_callable("map", &args[0])?;
    let items = expect_list("map", &args[1])?;
    let mapped = items
        .iter()
        .map(|item| apply(func, std::slice::from_ref(item)))
        .collect::<Result<Vector<Value>>>()?;
    Ok(Value::List(mapped))
}

/// (reduce f init lst) - left fold
pub(crate) fn builtin_reduce(args: &[Value]) -> Result<Value> {
    check_arity(args, 3)?;
    let func = expect_callable("reduce", &args[0])?;
    let items = expect_list("reduce", &args[2])?;
    items
        .iter()
        .try_fold(args[1].clone(), |acc, item| apply(func, &[acc, item.clone()]))
}
