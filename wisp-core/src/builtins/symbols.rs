// wisp-core - Symbol and string built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols and strings: sym, sym?, str

use wisp_reader::{Symbol, Value};

use crate::error::{Error, Result};

use super::check_arity;

/// (sym "name") - the interned symbol with that name
pub(crate) fn builtin_sym(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    match &args[0] {
        Value::String(name) if !name.is_empty() => Ok(Value::Symbol(Symbol::new(name))),
        Value::Symbol(sym) => Ok(Value::Symbol(sym.clone())),
        other => Err(Error::type_error_in("sym", "non-empty string", other)),
    }
}

/// (sym? x)
pub(crate) fn builtin_sym_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Symbol(_))))
}

/// (str x) - the printed form of x
pub(crate) fn builtin_str(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::string(args[0].to_string()))
}
