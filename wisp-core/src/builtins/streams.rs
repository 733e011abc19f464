// wisp-core - Stream built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Stream operations: stream, stream?, next, next?, map-stream, chain

use wisp_reader::Value;

use crate::error::Result;
use crate::stream::{self, expect_stream};

use super::{check_arity, expect_callable};

/// (stream source available?) or (stream x y z...)
pub(crate) fn builtin_stream(args: &[Value]) -> Result<Value> {
    Ok(Value::Stream(stream::from_args(args)))
}

/// (stream? x)
pub(crate) fn builtin_stream_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Stream(_))))
}

/// (next s) - the next element, nil once exhausted
pub(crate) fn builtin_next(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    stream::next(&expect_stream("next", &args[0])?)
}

/// (next? s)
pub(crate) fn builtin_next_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(stream::has_next(&expect_stream("next?", &args[0])?)?))
}

/// (map-stream f s) - lazily apply f to each element of s
pub(crate) fn builtin_map_stream(args: &[Value]) -> Result<Value> {
    check_arity(args, 2)?;
    let func = expect_callable("map-stream", &args[0])?.clone();
    let source = expect_stream("map-stream", &args[1])?;
    Ok(Value::Stream(stream::map(func, source)))
}

/// (chain s t...) - drain each stream in turn
pub(crate) fn builtin_chain(args: &[Value]) -> Result<Value> {
    let streams = args
        .iter()
        .map(|arg| expect_stream("chain", arg))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Stream(stream::chain(streams)))
}
