// wisp-core - Environment for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment for variable bindings with lexical scoping.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wisp_reader::{Symbol, Value};

use crate::error::{Error, Result};

/// A lexical environment for variable bindings.
///
/// Environments form a chain through parent references. A scope owns its
/// own bindings; parents are shared, so closures may keep a defining scope
/// alive after the call that created it has returned.
///
/// # Examples
///
/// ```
/// use wisp_core::Env;
/// use wisp_reader::{Symbol, Value};
///
/// let env = Env::new();
/// env.define(Symbol::new("x"), Value::number(42.0)).unwrap();
///
/// // Child scopes see their parent's bindings
/// let child = env.child();
/// assert_eq!(child.lookup(&Symbol::new("x")).unwrap(), Value::number(42.0));
///
/// // A child definition shadows without touching the parent
/// child.define(Symbol::new("x"), Value::number(1.0)).unwrap();
/// assert_eq!(env.lookup(&Symbol::new("x")).unwrap(), Value::number(42.0));
/// ```
#[derive(Debug, Clone)]
pub struct Env {
    inner: Rc<RefCell<EnvInner>>,
}

#[derive(Debug)]
struct EnvInner {
    bindings: HashMap<Symbol, Value>,
    parent: Option<Env>,
}

/// A non-owning handle to an environment.
#[derive(Debug, Clone)]
pub struct WeakEnv {
    inner: Weak<RefCell<EnvInner>>,
}

impl WeakEnv {
    /// The environment, if anything still owns it.
    #[must_use]
    pub fn upgrade(&self) -> Option<Env> {
        self.inner.upgrade().map(|inner| Env { inner })
    }
}

impl Env {
    /// Create a new root environment with no parent.
    pub fn new() -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// Create a child environment with this environment as parent.
    #[must_use]
    pub fn child(&self) -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakEnv {
        WeakEnv {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Define a new binding in this scope. Fails if this scope already binds
    /// the name; parents are not consulted.
    pub fn define(&self, sym: Symbol, val: Value) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.bindings.contains_key(&sym) {
            return Err(Error::AlreadyDefined(sym));
        }
        inner.bindings.insert(sym, val);
        Ok(())
    }

    /// Bind a name in this scope, replacing any existing binding.
    pub fn bind(&self, sym: Symbol, val: Value) {
        self.inner.borrow_mut().bindings.insert(sym, val);
    }

    /// Look up a symbol in this environment or parent chain.
    /// Uses iterative traversal to avoid stack overflow on deep environments.
    pub fn lookup(&self, sym: &Symbol) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if let Some(val) = inner.bindings.get(sym) {
                return Ok(val.clone());
            }
            let parent = inner.parent.clone();
            drop(inner);
            match parent {
                Some(p) => current = p,
                None => return Err(Error::Undefined(sym.clone())),
            }
        }
    }

    /// Set a binding, looking up the chain to find where it's defined.
    /// The absent value is rejected before the chain is walked.
    pub fn set(&self, sym: &Symbol, val: Value) -> Result<()> {
        if matches!(val, Value::Void) {
            return Err(Error::InvalidValue(sym.clone()));
        }
        let mut current = self.clone();
        loop {
            {
                let mut inner = current.inner.borrow_mut();
                if let Some(slot) = inner.bindings.get_mut(sym) {
                    *slot = val;
                    return Ok(());
                }
            }
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return Err(Error::Undefined(sym.clone())),
            }
        }
    }

    /// Check if a symbol is defined in this environment or parent chain.
    #[must_use]
    pub fn is_defined(&self, sym: &Symbol) -> bool {
        self.lookup(sym).is_ok()
    }

    /// Drop every binding in this scope.
    ///
    /// Closures stored in a scope they capture keep it alive through a
    /// reference cycle; clearing the scope breaks every such cycle.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut self.inner.borrow_mut().bindings);
        drop(bindings);
    }

    /// Names bound directly in this scope, sorted.
    #[must_use]
    pub fn local_names(&self) -> Vec<Symbol> {
        let mut names: Vec<Symbol> = self.inner.borrow().bindings.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    fn num(n: f64) -> Value {
        Value::number(n)
    }

    #[test]
    fn test_define_and_lookup() {
        let env = Env::new();
        env.define(sym("x"), num(42.0)).unwrap();
        assert_eq!(env.lookup(&sym("x")).unwrap(), num(42.0));
    }

    #[test]
    fn test_define_twice_fails() {
        let env = Env::new();
        env.define(sym("x"), num(1.0)).unwrap();
        let err = env.define(sym("x"), num(2.0)).unwrap_err();
        assert!(matches!(err, Error::AlreadyDefined(s) if s == sym("x")));
        assert_eq!(env.lookup(&sym("x")).unwrap(), num(1.0));
    }

    #[test]
    fn test_undefined_symbol() {
        let env = Env::new();
        assert!(matches!(env.lookup(&sym("x")), Err(Error::Undefined(_))));
    }

    #[test]
    fn test_child_shadows_parent() {
        let parent = Env::new();
        parent.define(sym("x"), num(42.0)).unwrap();

        let child = parent.child();
        child.define(sym("x"), num(100.0)).unwrap();

        assert_eq!(child.lookup(&sym("x")).unwrap(), num(100.0));
        assert_eq!(parent.lookup(&sym("x")).unwrap(), num(42.0));
    }

    #[test]
    fn test_set_in_parent() {
        let parent = Env::new();
        parent.define(sym("x"), num(42.0)).unwrap();

        let child = parent.child();
        child.set(&sym("x"), num(100.0)).unwrap();

        // Parent is updated, not child
        assert_eq!(parent.lookup(&sym("x")).unwrap(), num(100.0));
        assert!(child.local_names().is_empty());
    }

    #[test]
    fn test_set_undefined_fails() {
        let env = Env::new();
        assert!(matches!(env.set(&sym("y"), num(1.0)), Err(Error::Undefined(_))));
    }

    #[test]
    fn test_set_absent_value_fails() {
        let env = Env::new();
        env.define(sym("x"), num(1.0)).unwrap();
        assert!(matches!(env.set(&sym("x"), Value::Void), Err(Error::InvalidValue(_))));
        assert_eq!(env.lookup(&sym("x")).unwrap(), num(1.0));
    }

    #[test]
    fn test_bind_overwrites() {
        let env = Env::new();
        env.bind(sym("_"), num(1.0));
        env.bind(sym("_"), num(2.0));
        assert_eq!(env.lookup(&sym("_")).unwrap(), num(2.0));
    }

    #[test]
    fn test_clear_frees_self_referencing_scope() {
        use crate::eval::apply::make_closure;
        use std::rc::Rc;
        use wisp_reader::Params;

        let env = Env::new();
        let f = make_closure(Params::Fixed(Vec::new()), Vec::new(), &env);
        env.bind(sym("f"), Value::Closure(Rc::new(f)));
        let weak = env.downgrade();

        env.clear();
        assert!(env.local_names().is_empty());
        drop(env);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_weak_handle() {
        let env = Env::new();
        let weak = env.downgrade();
        assert!(weak.upgrade().is_some());
        drop(env);
        assert!(weak.upgrade().is_none());
    }
}
