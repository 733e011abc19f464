// wisp-core - Binding special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Binding special forms: def, set!, let, let*.

use wisp_reader::{Symbol, Value};

use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::{eval, eval_body, eval_opt};

/// The name a binding form targets: a literal symbol, or an expression that
/// evaluates to one.
pub(crate) fn binding_name(form: &'static str, arg: Option<&Value>, env: &Env) -> Result<Symbol> {
    match arg {
        Some(Value::Symbol(sym)) => Ok(sym.clone()),
        Some(expr) => match eval(expr, env)? {
            Value::Symbol(sym) => Ok(sym),
            _ => Err(Error::syntax(form, format!("invalid name '{}'", expr))),
        },
        None => Err(Error::syntax(form, "missing name")),
    }
}

/// (def name expr) - bind in the current scope, returning the value
pub fn eval_def(args: &[Value], env: &Env) -> Result<Value> {
    let name = binding_name("def", args.first(), env)?;
    let value = eval_opt(args.get(1), env)?;
    env.define(name, value.clone())?;
    Ok(value)
}

/// (set! name expr) - update the nearest existing binding
pub fn eval_set_bang(args: &[Value], env: &Env) -> Result<Value> {
    let name = binding_name("set!", args.first(), env)?;
    let value = eval_opt(args.get(1), env)?;
    env.set(&name, value.clone())?;
    Ok(value)
}

/// Split `((a 1) (b 2))` into (name, init-form) pairs.
fn parse_bindings(form: &'static str, args: &[Value]) -> Result<Vec<(Symbol, Value)>> {
    let Some(Value::List(bindings)) = args.first() else {
        return Err(Error::syntax(form, "bindings must be a list of (name expr) pairs"));
    };
    bindings
        .iter()
        .map(|binding| match binding.as_list() {
            Some(pair) => match pair.front() {
                Some(Value::Symbol(sym)) => {
                    Ok((sym.clone(), pair.get(1).cloned().unwrap_or(Value::Nil)))
                }
                _ => Err(Error::syntax(form, format!("invalid binding '{}'", binding))),
            },
            None => Err(Error::syntax(form, format!("invalid binding '{}'", binding))),
        })
        .collect()
}

/// (let ((name expr)...) body...) - initialisers see only the outer scope
pub fn eval_let(args: &[Value], env: &Env) -> Result<Value> {
    let bindings = parse_bindings("let", args)?;

    let mut values = Vec::with_capacity(bindings.len());
    for (name, init) in bindings {
        values.push((name, eval(&init, env)?));
    }

    let let_env = env.child();
    for (name, value) in values {
        let_env.bind(name, value);
    }
    eval_body(&args[1..], &let_env)
}

/// (let* ((name expr)...) body...) - each initialiser sees the ones before it
pub fn eval_let_star(args: &[Value], env: &Env) -> Result<Value> {
    let bindings = parse_bindings("let*", args)?;

    let let_env = env.child();
    for (name, init) in bindings {
        let value = eval(&init, &let_env)?;
        let_env.bind(name, value);
    }
    eval_body(&args[1..], &let_env)
}
