// wisp-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Function application for Wisp.

use std::any::Any;
use std::rc::Rc;

use wisp_reader::{Closure, MultiArityFn, NativeFn, Params, Stream, Value, Vector};

use super::eval_body;
use crate::builtins::lists::slice_bounds;
use crate::env::Env;
use crate::error::{ArityError, Error, Result};
use crate::stream;

/// Type alias for native function signature.
pub type NativeFnImpl = dyn Fn(&[Value]) -> Result<Value>;

/// Apply a function to arguments.
pub fn apply(func: &Value, args: &[Value]) -> Result<Value> {
    match func {
        Value::Closure(closure) => apply_closure(closure, args),
        Value::MultiFn(multi) => apply_multi(multi, args),
        Value::NativeFn(native) => apply_native(native, args),
        Value::List(items) => apply_list(items, args),
        Value::Stream(s) => apply_stream(s, args),
        other => Err(Error::NotCallable(other.to_string())),
    }
}

/// Bind arguments in a fresh child of the captured scope and run the body.
pub(crate) fn apply_closure(closure: &Closure, args: &[Value]) -> Result<Value> {
    let captured_env = closure
        .env
        .downcast_ref::<Env>()
        .ok_or(Error::Internal("closure environment has invalid type"))?;

    let fn_env = captured_env.child();
    match &closure.params {
        Params::Fixed(params) => {
            if args.len() != params.len() {
                return Err(Error::arity(params.len(), args.len()));
            }
            for (param, arg) in params.iter().zip(args) {
                fn_env.bind(param.clone(), arg.clone());
            }
        }
        Params::Variadic { first, rest } => {
            let Some((head, tail)) = args.split_first() else {
                return Err(Error::arity_at_least(1, 0));
            };
            fn_env.bind(first.clone(), head.clone());
            fn_env.bind(rest.clone(), Value::list(tail.iter().cloned()));
        }
    }

    eval_body(&closure.body, &fn_env)
}

fn apply_multi(multi: &MultiArityFn, args: &[Value]) -> Result<Value> {
    let closure = multi
        .select(args.len())
        .ok_or(ArityError::UndefinedArity(args.len()))?;
    apply_closure(closure, args)
}

/// Apply a native function.
pub(crate) fn apply_native(func: &NativeFn, args: &[Value]) -> Result<Value> {
    let f = func
        .func()
        .downcast_ref::<Rc<NativeFnImpl>>()
        .ok_or(Error::Internal("native function has invalid type"))?;
    f(args)
}

/// `(lst i)` indexes, `(lst start end)` slices.
fn apply_list(items: &Vector<Value>, args: &[Value]) -> Result<Value> {
    match args {
        [Value::Number(index)] => {
            let element = (index.fract() == 0.0 && *index >= 0.0)
                .then(|| items.get(*index as usize))
                .flatten();
            Ok(element.cloned().unwrap_or(Value::Nil))
        }
        [index] => Err(Error::type_error_in("list index", "number", index)),
        [start, end] => {
            let (from, to) = slice_bounds(items.len(), start, end)?;
            Ok(Value::List(items.clone().slice(from..to)))
        }
        _ => Err(Error::Arity(ArityError::Mismatch {
            expected: if args.is_empty() { 1 } else { 2 },
            got: args.len(),
        })),
    }
}

/// `(s t u)` chains `s` with the argument streams.
fn apply_stream(s: &Stream, args: &[Value]) -> Result<Value> {
    let mut streams = vec![s.clone()];
    for arg in args {
        streams.push(stream::expect_stream("chain", arg)?);
    }
    Ok(Value::Stream(stream::chain(streams)))
}

/// Create a native function value.
pub fn make_native_fn(
    name: &'static str,
    func: impl Fn(&[Value]) -> Result<Value> + 'static,
) -> NativeFn {
    let func_rc: Rc<NativeFnImpl> = Rc::new(func);
    let func_any: Rc<dyn Any> = Rc::new(func_rc);
    NativeFn::new(name, func_any)
}

/// Create a closure value capturing `env`.
pub fn make_closure(params: Params, body: Vec<Value>, env: &Env) -> Closure {
    let env_any: Rc<dyn Any> = Rc::new(env.clone());
    Closure::new(params, body, env_any)
}
