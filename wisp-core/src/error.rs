// wisp-core - Error types for the Wisp evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for Wisp evaluation.

use thiserror::Error;
use wisp_reader::{Exception, ParseError, Symbol, Value};

/// Result type for Wisp evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifier prefix for host faults converted into program exceptions.
pub const FAULT_PREFIX: &str = "error";

/// Ways a call can disagree with a function's declared arities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("{expected} args expected, got {got}")]
    Mismatch { expected: usize, got: usize },
    #[error("at least {expected} args expected, got {got}")]
    AtLeast { expected: usize, got: usize },
    #[error("same arity ({0}) twice in multi-arity fn")]
    DuplicateArity(usize),
    #[error("only 1 variadic (x & xs) allowed")]
    MultipleVariadic,
    #[error("undefined arity ({0} args)")]
    UndefinedArity(usize),
}

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// `def` of a name already bound in the same scope
    #[error("'{0}' already defined")]
    AlreadyDefined(Symbol),
    /// Name not bound in any scope nor in the builtin table
    #[error("'{0}' undefined")]
    Undefined(Symbol),
    /// `set!` to the absent value
    #[error("set! {0} to an absent value")]
    InvalidValue(Symbol),
    #[error(transparent)]
    Arity(#[from] ArityError),
    /// A construct evaluated outside the form that gives it meaning
    #[error("misplaced '{0}'")]
    Misuse(&'static str),
    #[error("'{0}' is not callable")]
    NotCallable(String),
    #[error("invalid '{form}' syntax: {message}")]
    InvalidSyntax { form: &'static str, message: String },
    /// A primitive was handed a value of the wrong type
    #[error("{context}: expected {expected}, got {got}")]
    Type {
        context: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("stack overflow: maximum eval depth ({0}) exceeded")]
    StackOverflow(usize),
    /// Program exception raised by `throw`
    #[error("Uncaught '{}, {}'", .0.id, .0.payload)]
    Thrown(Exception),
    /// Invariant violation inside the evaluator
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    /// Create an arity error for exact arity.
    pub fn arity(expected: usize, got: usize) -> Self {
        Error::Arity(ArityError::Mismatch { expected, got })
    }

    /// Create an arity error for minimum arity.
    pub fn arity_at_least(expected: usize, got: usize) -> Self {
        Error::Arity(ArityError::AtLeast { expected, got })
    }

    /// Create a type error.
    pub fn type_error_in(context: &'static str, expected: &'static str, got: &Value) -> Self {
        Error::Type {
            context,
            expected,
            got: got.type_name(),
        }
    }

    /// Create an invalid syntax error.
    pub fn syntax(form: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidSyntax {
            form,
            message: message.into(),
        }
    }

    /// Create a program exception.
    pub fn thrown(id: &str, payload: Value) -> Self {
        Error::Thrown(Exception::new(Symbol::new(id), payload))
    }

    /// The program exception this error surfaces as inside `try`.
    ///
    /// Program exceptions pass through unchanged. Primitive contract faults
    /// become `error.type` / `error.call` with their message as payload.
    /// Everything else is not catchable and yields `None`.
    #[must_use]
    pub fn to_exception(&self) -> Option<Exception> {
        let kind = match self {
            Error::Thrown(exception) => return Some(exception.clone()),
            Error::Type { .. } => "type",
            Error::NotCallable(_) => "call",
            _ => return None,
        };
        let id = Symbol::new(&format!("{}.{}", FAULT_PREFIX, kind));
        Some(Exception::new(id, Value::string(self.to_string())))
    }
}
