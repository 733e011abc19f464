// wisp-core - Special forms integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Integration tests for Wisp special forms.
//!
//! Tests for: if, def, set!, quote, do, let, let*, loop/break, fn, defn,
//! lambda literals and callable lists.

mod common;

use common::*;

fn num(n: f64) -> Value {
    Value::number(n)
}

// =============================================================================
// if
// =============================================================================

#[test]
fn test_if_truthiness() {
    assert_eval!("(if nil 1 2)", num(2.0));
    assert_eval!("(if false 1 2)", num(2.0));
    assert_eval!("(if 0 1 2)", num(1.0));
    assert_eval!("(if \"\" 1 2)", num(1.0));
    assert_eval!("(if () 1 2)", num(1.0));
}

#[test]
fn test_if_missing_else_is_nil() {
    assert_eval!("(if false 1)", Value::Nil);
}

#[test]
fn test_if_evaluates_one_branch() {
    assert_eval!("(if true 1 (undefined-thing))", num(1.0));
    assert_eval!("(if false (undefined-thing) 2)", num(2.0));
}

// =============================================================================
// def / set!
// =============================================================================

#[test]
fn test_def_returns_value() {
    assert_eval!("(def y 3)", num(3.0));
    assert_eval!("(def x 5) x", num(5.0));
    assert_eval!("(def x) x", Value::Nil);
}

#[test]
fn test_def_twice_in_one_scope_fails() {
    assert_eval_err!("(def x 1) (def x 2)", Error::AlreadyDefined(_));
}

#[test]
fn test_def_computed_name() {
    assert_eval!("(def (sym \"z\") 4) z", num(4.0));
    assert_eval_err!("(def 1 2)", Error::InvalidSyntax { form: "def", .. });
}

#[test]
fn test_def_in_child_scope_shadows() {
    let env = new_env();
    assert_eq!(
        eval_all("(def x 1) (let () (def x 2) x)", &env).unwrap(),
        num(2.0)
    );
    assert_eq!(eval_all("x", &env).unwrap(), num(1.0));
}

#[test]
fn test_failed_def_leaves_no_binding() {
    let env = new_env();
    assert!(eval_all("(def x (+ 1 \"a\"))", &env).is_err());
    assert!(matches!(eval_all("x", &env), Err(Error::Undefined(_))));
}

#[test]
fn test_set_bang() {
    assert_eval!("(def x 1) (set! x 2) x", num(2.0));
    assert_eval!(
        "(def n 0) (defn bump () (set! n (+ n 1))) (bump) (bump) n",
        num(2.0)
    );
    assert_eval_err!("(set! nope 1)", Error::Undefined(_));
    assert_eval_err!("(def x 1) (set! x (loop break))", Error::InvalidValue(_));
}

// =============================================================================
// quote / do
// =============================================================================

#[test]
fn test_quote() {
    assert_eval!("(quote x)", Value::symbol("x"));
    assert_eq!(eval_print("'(a b c)"), "(a b c)");
    assert_eq!(eval_print("''a"), "(quote a)");
    assert_eq!(eval_print("'(if x)"), "(if x)");
}

#[test]
fn test_do() {
    assert_eval!("(do 1 2 3)", num(3.0));
    assert_eval!("(do)", Value::Nil);
}

// =============================================================================
// let / let*
// =============================================================================

#[test]
fn test_let_binds_simultaneously() {
    assert_eval!("(def x 1) (let ((x 2) (y x)) y)", num(1.0));
    assert_eval!("(let ((a 1) (b 2)) (+ a b))", num(3.0));
}

#[test]
fn test_let_star_binds_in_order() {
    assert_eval!("(def x 1) (let* ((x 2) (y x)) y)", num(2.0));
}

#[test]
fn test_let_does_not_leak() {
    assert_eval_err!("(let ((a 1)) a) a", Error::Undefined(_));
}

#[test]
fn test_let_malformed() {
    assert_eval_err!("(let x x)", Error::InvalidSyntax { form: "let", .. });
    assert_eval_err!("(let* ((1 2)) 1)", Error::InvalidSyntax { form: "let*", .. });
}

// =============================================================================
// loop / break
// =============================================================================

#[test]
fn test_loop_until_break() {
    assert_eval!(
        "(def i 0) (loop (set! i (+ i 1)) (if (= i 5) break)) i",
        num(5.0)
    );
}

#[test]
fn test_loop_has_no_value() {
    assert_eval!("(loop break)", Value::Void);
    assert_eq!(eval_print("(loop break)"), "void");
}

#[test]
fn test_break_outside_loop() {
    assert_eval_err!("(break)", Error::Misuse("break"));
    assert_eval_err!("(loop)", Error::InvalidSyntax { form: "loop", .. });
}

// =============================================================================
// fn / defn
// =============================================================================

#[test]
fn test_fn_application() {
    assert_eval!("((fn (x y) (+ x y)) 1 2)", num(3.0));
    assert_eval!("((fn () 1 2))", num(2.0));
    assert_eval!("((fn ()))", Value::Nil);
}

#[test]
fn test_fn_arity_mismatch() {
    assert_eval_err!(
        "((fn (x) x) 1 2)",
        Error::Arity(wisp_core::ArityError::Mismatch { expected: 1, got: 2 })
    );
}

#[test]
fn test_variadic() {
    assert_eq!(eval_print("((fn (x & xs) xs) 1 2 3)"), "(2 3)");
    assert_eq!(eval_print("((fn (x & xs) xs) 1)"), "()");
    assert_eval_err!(
        "((fn (x & xs) x))",
        Error::Arity(wisp_core::ArityError::AtLeast { expected: 1, got: 0 })
    );
}

#[test]
fn test_closures_capture_scope() {
    assert_eval!(
        "(defn adder (n) (fn (x) (+ x n))) (def add5 (adder 5)) (add5 10)",
        num(15.0)
    );
}

#[test]
fn test_recursion() {
    assert_eval!(
        "(defn fact (n) (if (<= n 1) 1 (* n (fact (- n 1))))) (fact 10)",
        num(3628800.0)
    );
}

#[test]
fn test_defn_returns_fn() {
    assert_eval!("(proc? (defn f () 1))", Value::Bool(true));
    assert_eval_err!("(defn f)", Error::InvalidSyntax { form: "fn", .. });
}

#[test]
fn test_lambda_literal() {
    assert_eval!("([+ \\a \\b] 1 2)", num(3.0));
    assert_eval!("([* \\x \\x] 3)", num(9.0));
    assert_eq!(eval_print("(map [* 2 \\n] (list 1 2 3))"), "(2 4 6)");
}

// =============================================================================
// Symbols, builtins and application
// =============================================================================

#[test]
fn test_undefined_and_not_callable() {
    assert_eval_err!("nope", Error::Undefined(_));
    assert_eval_err!("(1 2)", Error::NotCallable(_));
    assert_eval_err!("(\"f\")", Error::NotCallable(_));
}

#[test]
fn test_builtins_can_be_shadowed_by_def() {
    assert_eval!("(def + -) (+ 5 3)", num(2.0));
    assert_eval!("(let ((+ *)) (+ 5 3))", num(15.0));
}

#[test]
fn test_lists_are_callable() {
    assert_eval!("(def lst (list 10 20 30)) (lst 1)", num(20.0));
    assert_eval!("(def lst (list 10 20 30)) (lst 5)", Value::Nil);
    assert_eq!(eval_print("((list 10 20 30) 1 nil)"), "(20 30)");
    assert_eq!(eval_print("((list 10 20 30) -2 nil)"), "(20 30)");
    assert_eq!(eval_print("((list 10 20 30) nil -1)"), "(10 20)");
}

#[test]
fn test_global_aliases() {
    assert_eval!("(not nil)", Value::Bool(true));
    assert_eval!("((. [+ 1 \\x] [* 2 \\x]) 5)", num(11.0));
    assert_eval!("((pipe [+ 1 \\x] [* 2 \\x]) 5)", num(12.0));
    assert_eval!("(none? nil false)", Value::Bool(true));
    assert_eval!("(zero? 0)", Value::Bool(true));
    assert_eval!("(id 4)", num(4.0));
}

#[test]
fn test_eval_and_read_bindings() {
    assert_eval!("(eval (1st (read \"(+ 1 2)\")))", num(3.0));
    assert_eval!("(eval '(* 2 3))", num(6.0));
}

#[test]
fn test_higher_order_builtins() {
    assert_eval!("(reduce + 0 (list 1 2 3 4))", num(10.0));
    assert_eval!("(apply + (list 1 2 3))", num(6.0));
    assert_eval!("(nth 2 (list 5 6 7))", num(6.0));
    assert_eq!(eval_print("(cons 0 (rest (list 1 2 3)))"), "(0 2 3)");
    assert_eq!(eval_print("(str (list 1 \"a\" 'b))"), "\"(1 \"a\" b)\"");
    assert_eval!("(len \"abc\")", num(3.0));
    assert_eval!("(round 2.5)", num(3.0));
}

#[test]
fn test_signed_zeros_are_equal() {
    assert_eval!("(= 0 (- 0))", Value::Bool(true));
    assert_eval!("(= 0 -0)", Value::Bool(true));
}
