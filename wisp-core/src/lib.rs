// wisp-core - Runtime and evaluator for the Wisp language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # wisp-core
//!
//! Runtime and evaluator for the Wisp language: lexical environments, a
//! tree-walking evaluator with closures and multi-arity functions, lazy
//! streams, hierarchical exceptions, the builtin table, and read-eval
//! sessions.

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod session;
pub mod stream;

pub use builtins::{EnvExt, builtin_names, global_env, lookup_builtin, register_globals};
pub use env::{Env, WeakEnv};
pub use error::{ArityError, Error, Result};
pub use eval::exceptions::catch_matches;
pub use eval::{
    apply, eval, get_eval_depth, get_max_eval_depth, make_native_fn, set_max_eval_depth,
};
pub use session::{LineResult, Outcome, Session, SessionConfig, native_binding};

// Re-export reader types for convenience
pub use wisp_reader::{Exception, Reader, ReaderStatus, Stream, Symbol, Value};
