// wisp-core - Function special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function special forms: fn, defn.
//!
//! A definition is either one clause, `(fn (params) body...)`, or several,
//! `(fn ((params) body...) ((params) body...))`. One clause builds a plain
//! closure; several build a multi-arity function dispatched on argument
//! count.

use std::collections::BTreeMap;
use std::rc::Rc;

use wisp_reader::{Closure, MultiArityFn, Params, Symbol, Value};

use super::binding::binding_name;
use crate::env::Env;
use crate::error::{ArityError, Error, Result};
use crate::eval::apply::make_closure;

/// Marker separating the leading parameter from the rest parameter.
pub const REST_MARKER: &str = "&";

/// (fn (params) body...) or (fn ((params) body...)...)
pub fn eval_fn(args: &[Value], env: &Env) -> Result<Value> {
    build_fn(args, env, None)
}

/// (defn name (params) body...) - define a function in the current scope
pub fn eval_defn(args: &[Value], env: &Env) -> Result<Value> {
    let name = binding_name("defn", args.first(), env)?;
    let func = build_fn(&args[1..], env, Some(name.clone()))?;
    env.define(name, func.clone())?;
    Ok(func)
}

fn is_multi_clause(args: &[Value]) -> bool {
    matches!(
        args.first().and_then(Value::as_list).and_then(|l| l.front()),
        Some(Value::List(_))
    )
}

fn build_fn(args: &[Value], env: &Env, name: Option<Symbol>) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::syntax("fn", "missing parameter list"));
    }

    let clauses: Vec<Vec<Value>> = if is_multi_clause(args) {
        args.iter()
            .map(|clause| match clause {
                Value::List(items) => Ok(items.iter().cloned().collect()),
                other => Err(Error::syntax("fn", format!("invalid clause '{}'", other))),
            })
            .collect::<Result<_>>()?
    } else {
        vec![args.to_vec()]
    };

    let mut fixed: BTreeMap<usize, Rc<Closure>> = BTreeMap::new();
    let mut variadic: Option<Rc<Closure>> = None;

    for clause in &clauses {
        let (params, body) = clause
            .split_first()
            .ok_or_else(|| Error::syntax("fn", "empty clause"))?;
        let params = parse_params(params)?;
        let is_variadic = params.is_variadic();
        let arity = params.arity();
        let closure = Rc::new(make_closure(params, body.to_vec(), env));

        if is_variadic {
            if variadic.is_some() {
                return Err(ArityError::MultipleVariadic.into());
            }
            variadic = Some(closure);
        } else if fixed.insert(arity, closure).is_some() {
            return Err(ArityError::DuplicateArity(arity).into());
        }
    }

    if clauses.len() == 1 {
        let single = fixed.into_values().next().or(variadic);
        return single
            .map(Value::Closure)
            .ok_or(Error::Internal("fn clause vanished"));
    }

    Ok(Value::MultiFn(Rc::new(MultiArityFn {
        name,
        fixed,
        variadic,
    })))
}

/// `(a b c)` is fixed; `(x & xs)` is variadic.
fn parse_params(form: &Value) -> Result<Params> {
    let Value::List(items) = form else {
        return Err(Error::syntax("fn", format!("invalid parameter list '{}'", form)));
    };
    let symbols = items
        .iter()
        .map(|item| match item {
            Value::Symbol(sym) => Ok(sym.clone()),
            other => Err(Error::syntax("fn", format!("invalid parameter '{}'", other))),
        })
        .collect::<Result<Vec<Symbol>>>()?;

    match symbols.as_slice() {
        [first, marker, rest] if marker.name() == REST_MARKER => Ok(Params::Variadic {
            first: first.clone(),
            rest: rest.clone(),
        }),
        [_, marker, ..] if marker.name() == REST_MARKER => Err(Error::syntax(
            "fn",
            "variadic parameters must be (x & xs)",
        )),
        _ => Ok(Params::Fixed(symbols)),
    }
}
