// wisp-reader - Incremental tokenizer, reader and value model for Wisp
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # wisp-reader
//!
//! Reads Wisp source text incrementally, chunk by chunk, and produces
//! `Value` forms. Also defines the value model shared with the evaluator.

pub mod error;
pub mod macros;
pub mod reader;
pub mod symbol;
pub mod tokenizer;
pub mod value;

pub use error::ParseError;
pub use im::Vector;
pub use macros::{LambdaMacro, MacroFrame, QuoteMacro, ReaderMacro, Step};
pub use reader::{Reader, ReaderState, ReaderStatus, resolve_word};
pub use symbol::Symbol;
pub use tokenizer::{Recognizer, Token, Tokenizer};
pub use value::{
    Closure, Exception, MultiArityFn, NativeFn, Params, SpecialForm, Stream, StreamState, Value,
};
