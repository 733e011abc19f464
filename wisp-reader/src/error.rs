// wisp-reader - Reader error types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Errors raised while tokenizing or reading.

use thiserror::Error;

/// A reader failure. Any of these aborts the current incremental read; the
/// reader must be reset before it is fed again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended inside a string literal.
    #[error("'\"' expected [tokenizer]")]
    UnterminatedString,
    /// A token that cannot start or continue a form here.
    #[error("'{token}' unexpected [reader]")]
    Unexpected { token: String },
    /// An empty word reached the atom resolver.
    #[error("empty token [reader]")]
    EmptyToken,
    /// Input was finalized while a form was still open.
    #[error("Incomplete expression(s) [read]")]
    Incomplete,
}
