// wisp-core - Control flow special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Control flow special forms: if, do, quote, loop.

use wisp_reader::{SpecialForm, Value};

use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::{eval, eval_body, eval_opt};

/// (if test then else?) - evaluate exactly one branch
pub fn eval_if(args: &[Value], env: &Env) -> Result<Value> {
    let test = eval_opt(args.first(), env)?;
    if test.is_truthy() {
        eval_opt(args.get(1), env)
    } else {
        eval_opt(args.get(2), env)
    }
}

/// (do exprs*) - evaluate in order, return the last
pub fn eval_do(args: &[Value], env: &Env) -> Result<Value> {
    eval_body(args, env)
}

/// (quote form) - the form itself, unevaluated
pub fn eval_quote(args: &[Value]) -> Result<Value> {
    Ok(args.first().cloned().unwrap_or(Value::Nil))
}

/// (loop body...) - repeat the body until an expression yields `break`.
///
/// The loop itself has no value: it returns the absent value.
pub fn eval_loop(args: &[Value], env: &Env) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::syntax("loop", "requires a body"));
    }
    loop {
        for expr in args {
            if let Value::SpecialForm(SpecialForm::Break) = eval(expr, env)? {
                return Ok(Value::Void);
            }
        }
    }
}
