// wisp-core - Global scope seeding
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The global scope: aliases of builtins, a few small natives, and the
//! `eval`/`read` bindings that close over the scope itself.

use std::cell::RefCell;

use wisp_reader::{Reader, Symbol, Value};

use crate::env::{Env, WeakEnv};
use crate::error::{Error, Result};
use crate::eval::{eval, make_native_fn};

use super::{BuiltinFn, EnvExt, builtin_or_p, check_arity, lookup_builtin};

/// Global names that are other names for builtins.
const ALIASES: &[(&str, &str)] = &[
    ("not", "false?"),
    ("all?", "and?"),
    ("any?", "or?"),
    ("~", "stream"),
    ("map~", "map-stream"),
    ("~~", "chain"),
    (".", "compose"),
    ("<~", "next"),
];

/// Bind the aliases and global natives into `env`.
pub fn register_globals(env: &Env) {
    for (alias, target) in ALIASES {
        if let Some(value) = lookup_builtin(&Symbol::new(target)) {
            env.bind(Symbol::new(alias), value);
        }
    }

    let natives: &[(&'static str, BuiltinFn)] = &[
        ("zero?", global_zero_p),
        ("none?", global_none_p),
        ("id", global_identity),
        ("val", global_identity),
    ];
    for (name, func) in natives {
        env.define_native(*name, *func);
    }
}

/// A fresh global scope: the globals, then `eval` and `read`, then the host's
/// bindings, which may replace any of them.
pub fn global_env(bindings: impl IntoIterator<Item = (Symbol, Value)>) -> Env {
    let env = Env::new();
    register_globals(&env);

    let weak = env.downgrade();
    env.bind(
        Symbol::new("eval"),
        Value::NativeFn(make_native_fn("eval", move |args| global_eval(&weak, args))),
    );

    let reader = RefCell::new(Reader::new());
    env.bind(
        Symbol::new("read"),
        Value::NativeFn(make_native_fn("read", move |args| global_read(&reader, args))),
    );

    for (name, value) in bindings {
        env.bind(name, value);
    }
    env
}

/// (zero? x)
fn global_zero_p(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Number(n) if n == 0.0)))
}

/// (none? xs*) - no argument is truthy
fn global_none_p(args: &[Value]) -> Result<Value> {
    let any = builtin_or_p(args)?;
    Ok(Value::Bool(!any.is_truthy()))
}

/// (id x) / (val x)
fn global_identity(args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    Ok(args[0].clone())
}

/// (eval form) - evaluate in the global scope
fn global_eval(env: &WeakEnv, args: &[Value]) -> Result<Value> {
    check_arity(args, 1)?;
    let env = env
        .upgrade()
        .ok_or(Error::Internal("global scope dropped"))?;
    eval(&args[0], &env)
}

/// (read text allow-incomplete?) parses forms into a list; (read) resets.
///
/// The reader persists between calls, so with a second argument of `false`
/// an incomplete form is carried over to the next call.
fn global_read(reader: &RefCell<Reader>, args: &[Value]) -> Result<Value> {
    let mut reader = reader.borrow_mut();
    match args {
        [] => {
            reader.reset();
            Ok(Value::Nil)
        }
        [Value::String(text), rest @ ..] if rest.len() <= 1 => {
            let allow_incomplete = matches!(rest.first(), Some(Value::Bool(false)));
            let forms = reader.read_forms(text, allow_incomplete)?;
            Ok(Value::list(forms))
        }
        [other, ..] if args.len() <= 2 => Err(Error::type_error_in("read", "string", other)),
        _ => Err(Error::arity(2, args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(env: &Env, name: &str, args: &[Value]) -> Result<Value> {
        let func = env.lookup(&Symbol::new(name))?;
        crate::eval::apply(&func, args)
    }

    #[test]
    fn test_aliases_share_builtins() {
        let env = global_env([]);
        let not = env.lookup(&Symbol::new("not")).unwrap();
        let false_p = lookup_builtin(&Symbol::new("false?")).unwrap();
        assert_eq!(not, false_p);
    }

    #[test]
    fn test_host_bindings_override() {
        let env = global_env([(Symbol::new("id"), Value::number(7.0))]);
        assert_eq!(env.lookup(&Symbol::new("id")).unwrap(), Value::number(7.0));
    }

    #[test]
    fn test_read_native() {
        let env = global_env([]);
        let forms = call(&env, "read", &[Value::string("1 (a b)")]).unwrap();
        assert_eq!(forms.to_string(), "(1 (a b))");

        let err = call(&env, "read", &[Value::string("(a")]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let partial = call(&env, "read", &[Value::string("(a"), Value::Bool(false)]).unwrap();
        assert_eq!(partial, Value::empty_list());
        let rest = call(&env, "read", &[Value::string("b)")]).unwrap();
        assert_eq!(rest.to_string(), "((a b))");
    }

    #[test]
    fn test_eval_native_uses_global_scope() {
        let env = global_env([(Symbol::new("x"), Value::number(3.0))]);
        let form = Value::list([Value::symbol("+"), Value::symbol("x"), Value::number(1.0)]);
        assert_eq!(call(&env, "eval", &[form]).unwrap(), Value::number(4.0));
    }
}
