// wisp-core - Tree-walking evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tree-walking evaluator for Wisp forms.

pub mod apply;
pub mod exceptions;
pub mod special_forms;

pub use apply::{NativeFnImpl, apply, make_native_fn};

use std::cell::Cell;

use log::trace;
use wisp_reader::{SpecialForm, Symbol, Value, Vector};

use crate::builtins::lookup_builtin;
use crate::env::Env;
use crate::error::{Error, Result};

use exceptions::{eval_throw, eval_try};
use special_forms::{
    eval_def, eval_defn, eval_do, eval_fn, eval_if, eval_let, eval_let_star, eval_loop,
    eval_quote, eval_set_bang,
};

// ============================================================================
// Stack Overflow Protection
// ============================================================================

/// Maximum recursion depth for eval. Can be configured via `set_max_eval_depth`.
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_EVAL_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_EVAL_DEPTH) };
}

/// Set the maximum eval recursion depth. Returns the previous value.
#[inline]
pub fn set_max_eval_depth(depth: usize) -> usize {
    MAX_EVAL_DEPTH.with(|d| d.replace(depth))
}

/// Get the current maximum eval recursion depth.
#[inline]
#[must_use]
pub fn get_max_eval_depth() -> usize {
    MAX_EVAL_DEPTH.with(|d| d.get())
}

/// Get the current eval recursion depth.
#[inline]
#[must_use]
pub fn get_eval_depth() -> usize {
    EVAL_DEPTH.with(|d| d.get())
}

/// RAII guard to manage eval depth counter.
struct EvalDepthGuard;

impl EvalDepthGuard {
    fn new() -> Result<Self> {
        let (current, max) = EVAL_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            (current + 1, MAX_EVAL_DEPTH.with(|m| m.get()))
        });
        if current > max {
            EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            Err(Error::StackOverflow(max))
        } else {
            Ok(EvalDepthGuard)
        }
    }
}

impl Drop for EvalDepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate a Wisp form in the given environment.
///
/// # Examples
///
/// ```
/// use wisp_core::{Env, eval};
/// use wisp_reader::{Reader, Value};
///
/// let env = Env::new();
/// let form = Reader::read_all("(* 6 7)").unwrap().remove(0);
/// assert_eq!(eval(&form, &env).unwrap(), Value::number(42.0));
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A symbol cannot be resolved
/// - A function is called with the wrong number of arguments
/// - A special form is malformed or misplaced
/// - A program exception escapes
/// - Stack overflow occurs (configurable via [`set_max_eval_depth`])
#[must_use = "eval returns a value that should be used"]
pub fn eval(expr: &Value, env: &Env) -> Result<Value> {
    let _guard = EvalDepthGuard::new()?;

    match expr {
        Value::Symbol(sym) => resolve(sym, env),
        Value::List(items) if !items.is_empty() => eval_list(items, env),
        // Everything else, the empty list and bare special forms included,
        // evaluates to itself
        _ => Ok(expr.clone()),
    }
}

/// Evaluate a sequence of forms, returning the last value (nil if empty).
pub fn eval_body(body: &[Value], env: &Env) -> Result<Value> {
    let mut result = Value::Nil;
    for expr in body {
        result = eval(expr, env)?;
    }
    Ok(result)
}

/// Evaluate an optional form; a missing form is nil.
pub(crate) fn eval_opt(expr: Option<&Value>, env: &Env) -> Result<Value> {
    match expr {
        Some(expr) => eval(expr, env),
        None => Ok(Value::Nil),
    }
}

/// The scope chain first, then the builtin table.
fn resolve(sym: &Symbol, env: &Env) -> Result<Value> {
    env.lookup(sym)
        .or_else(|err| lookup_builtin(sym).ok_or(err))
}

fn eval_list(items: &Vector<Value>, env: &Env) -> Result<Value> {
    if let Some(Value::SpecialForm(form)) = items.front() {
        let args: Vec<Value> = items.iter().skip(1).cloned().collect();
        trace!("special form: {}", form.keyword());
        return eval_special_form(*form, &args, env);
    }

    let mut evaluated = Vec::with_capacity(items.len());
    for item in items {
        evaluated.push(eval(item, env)?);
    }
    let (func, args) = evaluated.split_at(1);
    apply(&func[0], args)
}

fn eval_special_form(form: SpecialForm, args: &[Value], env: &Env) -> Result<Value> {
    match form {
        SpecialForm::If => eval_if(args, env),
        SpecialForm::Def => eval_def(args, env),
        SpecialForm::SetBang => eval_set_bang(args, env),
        SpecialForm::Fn => eval_fn(args, env),
        SpecialForm::Defn => eval_defn(args, env),
        SpecialForm::Quote => eval_quote(args),
        SpecialForm::Do => eval_do(args, env),
        SpecialForm::Let => eval_let(args, env),
        SpecialForm::LetStar => eval_let_star(args, env),
        SpecialForm::Loop => eval_loop(args, env),
        SpecialForm::Try => eval_try(args, env),
        SpecialForm::Throw => eval_throw(args, env),
        SpecialForm::Break | SpecialForm::Catch | SpecialForm::Finally => {
            Err(Error::Misuse(form.keyword()))
        }
    }
}
