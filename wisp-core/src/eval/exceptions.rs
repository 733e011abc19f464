// wisp-core - Exception handling
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Exception handling special forms: throw, try/catch/finally.
//!
//! A `try` body is scanned in order. Catch clauses are skipped while nothing
//! has failed, and a `finally` ends the scan. When an expression fails, only
//! the clauses after it are considered: the first catch whose identifier
//! matches handles the exception, then any `finally` runs.

use std::rc::Rc;

use log::trace;
use wisp_reader::{Exception, SpecialForm, Symbol, Value, Vector};

use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::{eval, eval_body, eval_opt};

/// Catch identifier that matches every exception.
pub const WILDCARD: &str = "...";

/// (throw id payload) - raise a program exception
pub fn eval_throw(args: &[Value], env: &Env) -> Result<Value> {
    let id = match args.first() {
        Some(Value::Symbol(id)) => id.clone(),
        Some(other) => {
            return Err(Error::syntax(
                "throw",
                format!("identifier must be a symbol, got '{}'", other),
            ));
        }
        None => return Err(Error::syntax("throw", "missing identifier")),
    };
    let payload = eval_opt(args.get(1), env)?;
    trace!("throw {} {}", id, payload);
    Err(Error::Thrown(Exception::new(id, payload)))
}

/// (try body... (catch id name handler...)... (finally cleanup...))
pub fn eval_try(args: &[Value], env: &Env) -> Result<Value> {
    let mut result = Value::Nil;
    for (idx, expr) in args.iter().enumerate() {
        if expr.is_form(SpecialForm::Catch) {
            continue;
        }
        if expr.is_form(SpecialForm::Finally) {
            run_finally(expr, env)?;
            return Ok(result);
        }
        match eval(expr, env) {
            Ok(value) => result = value,
            Err(err) => return recover(err, &args[idx + 1..], env),
        }
    }
    Ok(result)
}

/// Does a catch identifier handle a thrown identifier?
///
/// Equal identifiers match, the wildcard matches everything, and otherwise
/// every segment of the catch identifier must equal the thrown identifier's
/// segment at the same position. `a.b` handles `a.b.c`; `a.b.c.d` does not.
#[must_use]
pub fn catch_matches(catch_id: &Symbol, thrown: &Symbol) -> bool {
    if catch_id == thrown || catch_id.name() == WILDCARD {
        return true;
    }
    let mut thrown_segments = thrown.segments();
    catch_id
        .segments()
        .all(|segment| thrown_segments.next() == Some(segment))
}

/// Handle a failure at some point in a `try` body, given the clauses after it.
fn recover(err: Error, rest: &[Value], env: &Env) -> Result<Value> {
    let catchable = err.to_exception();
    let mut outcome = Err(err);

    if let Some(exception) = catchable {
        let clauses = rest
            .iter()
            .take_while(|expr| !expr.is_form(SpecialForm::Finally))
            .filter(|expr| expr.is_form(SpecialForm::Catch));
        for clause in clauses {
            match catch_id(clause) {
                Ok(id) if catch_matches(&id, &exception.id) => {
                    trace!("caught {} with {}", exception.id, id);
                    outcome = parse_catch(clause)
                        .and_then(|catch| run_catch(&catch, exception, env));
                    break;
                }
                Ok(_) => {}
                Err(malformed) => {
                    outcome = Err(malformed);
                    break;
                }
            }
        }
    }

    if let Some(finally) = rest.iter().find(|expr| expr.is_form(SpecialForm::Finally)) {
        run_finally(finally, env)?;
    }
    outcome
}

/// The binding and handler of a matching `(catch id name handler...)`.
struct CatchClause<'a> {
    name: Symbol,
    handler: Vec<&'a Value>,
}

fn catch_items(clause: &Value) -> Result<&Vector<Value>> {
    clause
        .as_list()
        .ok_or(Error::Internal("catch clause is not a list"))
}

/// The identifier of a catch clause; the rest is only checked once it matches.
fn catch_id(clause: &Value) -> Result<Symbol> {
    match catch_items(clause)?.get(1) {
        Some(Value::Symbol(id)) => Ok(id.clone()),
        _ => Err(Error::syntax("catch", "identifier must be a symbol")),
    }
}

fn parse_catch(clause: &Value) -> Result<CatchClause<'_>> {
    let items = catch_items(clause)?;
    let name = match items.get(2) {
        Some(Value::Symbol(name)) => name.clone(),
        _ => return Err(Error::syntax("catch", "binding must be a symbol")),
    };
    Ok(CatchClause {
        name,
        handler: items.iter().skip(3).collect(),
    })
}

/// Bind `(id payload #<exception>)` in a fresh scope and run the handler.
fn run_catch(catch: &CatchClause<'_>, exception: Exception, env: &Env) -> Result<Value> {
    let record = Value::list([
        Value::Symbol(exception.id.clone()),
        exception.payload.clone(),
        Value::Exception(Rc::new(exception)),
    ]);
    let catch_env = env.child();
    catch_env.bind(catch.name.clone(), record);

    let mut result = Value::Nil;
    for expr in &catch.handler {
        result = eval(expr, &catch_env)?;
    }
    Ok(result)
}

/// Run a finally body for effect.
fn run_finally(clause: &Value, env: &Env) -> Result<()> {
    if let Value::List(items) = clause {
        let body: Vec<Value> = items.iter().skip(1).cloned().collect();
        eval_body(&body, env)?;
    }
    Ok(())
}
