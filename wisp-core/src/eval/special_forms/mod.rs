// wisp-core - Special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special forms for the Wisp evaluator. `try`/`throw` live in
//! `eval::exceptions`.

pub mod binding;
pub mod control;
pub mod functions;

pub use binding::{eval_def, eval_let, eval_let_star, eval_set_bang};
pub use control::{eval_do, eval_if, eval_loop, eval_quote};
pub use functions::{eval_defn, eval_fn};
