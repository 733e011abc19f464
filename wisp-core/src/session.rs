// wisp-core - Read-eval sessions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A session pairs one reader with one global scope.
//!
//! Lines are fed in as they arrive; every form they complete is evaluated in
//! order. Each session owns its own reader and scope, so several may coexist
//! without sharing anything but the builtin table.
//!
//! # Example
//!
//! ```rust
//! use wisp_core::{Outcome, Session, SessionConfig};
//!
//! let mut session = Session::new("1", [], SessionConfig::default());
//! let first = session.read_line("(def x");
//! assert!(first.outcomes.is_empty());
//! assert_eq!(first.status.depth, 1);
//!
//! let second = session.read_line("  21) (* x 2)");
//! assert_eq!(second.outcomes.len(), 2);
//! assert!(matches!(&second.outcomes[1], Outcome::Value(v) if v.to_string() == "42"));
//! ```

use log::debug;
use wisp_reader::{ParseError, Reader, ReaderStatus, Symbol, Value, Vector};

use crate::builtins::global_env;
use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::{self, DEFAULT_MAX_EVAL_DEPTH, make_native_fn};

/// Name bound to the most recent value.
pub const LAST_VALUE: &str = "_";
/// Name bound to the `(form value)` history, most recent first.
pub const HISTORY: &str = "__";

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Entries kept in the `__` history list
    pub history_len: usize,
    /// Maximum evaluation depth for each top-level form
    pub max_eval_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            history_len: 100,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    #[must_use]
    pub fn with_max_eval_depth(mut self, max_eval_depth: usize) -> Self {
        self.max_eval_depth = max_eval_depth;
        self
    }
}

/// What became of one completed form, or of the line's parse.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A form evaluated to this value
    Value(Value),
    /// A form failed to evaluate
    EvalError(Error),
    /// The input could not be parsed; the reader has been reset
    ParseError(ParseError),
}

/// Everything one line produced.
#[derive(Debug, Clone)]
pub struct LineResult {
    pub outcomes: Vec<Outcome>,
    /// Reader status after the line, for prompting
    pub status: ReaderStatus,
}

/// A reader and a global scope with value history.
pub struct Session {
    id: String,
    reader: Reader,
    env: Env,
    history: Vector<Value>,
    history_list: Option<Value>,
    config: SessionConfig,
}

impl Session {
    /// Create a session whose global scope also holds `bindings`.
    pub fn new(
        id: impl Into<String>,
        bindings: impl IntoIterator<Item = (Symbol, Value)>,
        config: SessionConfig,
    ) -> Self {
        Session {
            id: id.into(),
            reader: Reader::new(),
            env: global_env(bindings),
            history: Vector::new(),
            history_list: None,
            config,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The global scope.
    #[must_use]
    pub fn env(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub fn status(&self) -> ReaderStatus {
        self.reader.status()
    }

    /// Drop any partially read form.
    pub fn reset(&mut self) {
        self.reader.reset();
    }

    /// Feed one line of input and evaluate every form it completes.
    ///
    /// Forms completed before a parse error are still evaluated; the error
    /// comes last and leaves the reader reset.
    pub fn read_line(&mut self, line: &str) -> LineResult {
        let mut text = String::with_capacity(line.len() + 1);
        text.push_str(line);
        text.push('\n');

        let mut forms = Vec::new();
        let parsed = self
            .reader
            .read(&text, |form| forms.push(form))
            .and_then(|()| self.reader.end(|form| forms.push(form)));

        let mut outcomes: Vec<Outcome> = forms
            .iter()
            .map(|form| match self.eval_form(form) {
                Ok(value) => Outcome::Value(value),
                Err(err) => Outcome::EvalError(err),
            })
            .collect();

        if let Err(err) = parsed {
            debug!("[{}] parse error: {}", self.id, err);
            self.reader.reset();
            outcomes.push(Outcome::ParseError(err));
        }

        LineResult {
            outcomes,
            status: self.reader.status(),
        }
    }

    /// Evaluate a complete source text, returning the last value.
    ///
    /// Stops at the first error. A form left open at the end is an error.
    pub fn eval_source(&mut self, source: &str) -> Result<Value> {
        let forms = self.reader.read_forms(source, false)?;
        let mut result = Value::Nil;
        for form in &forms {
            result = self.eval_form(form)?;
        }
        Ok(result)
    }

    /// Evaluate one form in the global scope and record it in the history.
    pub fn eval_form(&mut self, form: &Value) -> Result<Value> {
        let previous = eval::set_max_eval_depth(self.config.max_eval_depth);
        let result = eval::eval(form, &self.env);
        let _ = eval::set_max_eval_depth(previous);

        match result {
            Ok(value) => {
                self.record(form, &value);
                Ok(value)
            }
            Err(err) => {
                debug!("[{}] eval of {} failed: {}", self.id, form, err);
                Err(err)
            }
        }
    }

    /// Bind `_` and prepend `(form value)` to `__`.
    ///
    /// A value equal to the current history list (evaluating `__` itself) is
    /// not recorded, or the list would end up inside itself.
    fn record(&mut self, form: &Value, value: &Value) {
        if self.config.history_len == 0 || self.is_history(value) {
            return;
        }

        self.history.push_front(Value::list([form.clone(), value.clone()]));
        self.history.truncate(self.config.history_len);

        let list = Value::List(self.history.clone());
        self.env.bind(Symbol::new(HISTORY), list.clone());
        self.env.bind(Symbol::new(LAST_VALUE), value.clone());
        self.history_list = Some(list);
    }

    /// Whether `value` is the current `__` list. Length and latest entry are
    /// checked first so ordinary values never walk the whole history.
    fn is_history(&self, value: &Value) -> bool {
        let Value::List(items) = value else {
            return false;
        };
        items.len() == self.history.len()
            && items.front() == self.history.front()
            && self.history_list.as_ref() == Some(value)
    }

    /// The value bound to `name` in the global scope, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.env.lookup(&Symbol::new(name)).ok()
    }

    /// Call a global function by name.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let func = self.env.lookup(&Symbol::new(name))?;
        eval::apply(&func, args)
    }

    /// Bind a native Rust function in the global scope.
    pub fn register_native(
        &self,
        name: &'static str,
        func: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) {
        self.env
            .bind(Symbol::new(name), Value::NativeFn(make_native_fn(name, func)));
    }
}

impl Drop for Session {
    /// Functions defined at the top level capture the global scope they are
    /// stored in, so the scope is cleared for it to be freed.
    fn drop(&mut self) {
        debug!("[{}] dropping session", self.id);
        self.env.clear();
    }
}

/// Build a host binding from a Rust closure.
pub fn native_binding(
    name: &'static str,
    func: impl Fn(&[Value]) -> Result<Value> + 'static,
) -> (Symbol, Value) {
    (Symbol::new(name), Value::NativeFn(make_native_fn(name, func)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("t", [], SessionConfig::default())
    }

    fn values(result: &LineResult) -> Vec<String> {
        result
            .outcomes
            .iter()
            .map(|o| match o {
                Outcome::Value(v) => v.to_string(),
                Outcome::EvalError(e) => format!("eval: {}", e),
                Outcome::ParseError(e) => format!("parse: {}", e),
            })
            .collect()
    }

    #[test]
    fn test_multi_line_form() {
        let mut s = session();
        let first = s.read_line("(+ 1");
        assert!(first.outcomes.is_empty());
        assert_eq!(first.status.depth, 1);
        let second = s.read_line("2)");
        assert_eq!(values(&second), vec!["3"]);
        assert!(second.status.is_ready());
    }

    #[test]
    fn test_last_value_and_history() {
        let mut s = session();
        s.read_line("1 2");
        assert_eq!(s.get("_"), Some(Value::number(2.0)));
        assert_eq!(s.get("__").unwrap().to_string(), "((2 2) (1 1))");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut s = Session::new("t", [], SessionConfig::default().with_history_len(2));
        s.read_line("1 2 3");
        assert_eq!(s.get("__").unwrap().to_string(), "((3 3) (2 2))");
    }

    #[test]
    fn test_history_does_not_record_itself() {
        let mut s = session();
        s.read_line("1");
        s.read_line("__");
        assert_eq!(s.get("__").unwrap().to_string(), "((1 1))");
        assert_eq!(s.get("_"), Some(Value::number(1.0)));
    }

    #[test]
    fn test_parse_error_resets() {
        let mut s = session();
        let result = s.read_line("1 )");
        assert_eq!(values(&result).len(), 2);
        assert!(matches!(result.outcomes[1], Outcome::ParseError(_)));
        assert!(result.status.is_ready());
    }

    #[test]
    fn test_eval_error_reported_and_session_continues() {
        let mut s = session();
        let result = s.read_line("(throw io.eof 5) 7");
        assert_eq!(values(&result), vec!["eval: Uncaught 'io.eof, 5'", "7"]);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut a = session();
        let mut b = session();
        a.read_line("(def x 1)");
        let result = b.read_line("x");
        assert!(matches!(result.outcomes[0], Outcome::EvalError(Error::Undefined(_))));
    }

    #[test]
    fn test_eval_source_and_call() {
        let mut s = session();
        let v = s.eval_source("(defn sq (x) (* x x)) (sq 4)").unwrap();
        assert_eq!(v, Value::number(16.0));
        assert_eq!(s.call("sq", &[Value::number(3.0)]).unwrap(), Value::number(9.0));
        assert!(matches!(
            s.eval_source("(sq"),
            Err(Error::Parse(ParseError::Incomplete))
        ));
    }

    #[test]
    fn test_register_native() {
        let mut s = session();
        s.register_native("triple", |args| match args {
            [Value::Number(n)] => Ok(Value::number(n * 3.0)),
            _ => Err(Error::arity(1, args.len())),
        });
        assert_eq!(values(&s.read_line("(triple 2)")), vec!["6"]);
    }

    #[test]
    fn test_depth_limit_from_config() {
        let mut s = Session::new("t", [], SessionConfig::default().with_max_eval_depth(40));
        let result = s.read_line("(defn f (n) (f n)) (f 1)");
        assert!(matches!(
            result.outcomes[1],
            Outcome::EvalError(Error::StackOverflow(40))
        ));
    }
}
