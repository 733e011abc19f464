// wisp-reader - Symbol type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are interned identifiers.
//!
//! # Interning
//!
//! Every symbol is created through a global interner, so two symbols with the
//! same name share one allocation:
//!
//! - **O(1) equality**: comparing symbols is a pointer comparison
//! - **O(1) hashing**: the hash is taken from the pointer address
//! - **Identity**: two independent lookups of a name yield the same object
//!
//! # Memory Behaviour
//!
//! Interned symbols are never deallocated. The interner keeps a strong
//! reference to every name for the lifetime of the process, so memory grows
//! with the number of distinct names seen by the reader or created with
//! `sym`.
//!
//! The interner sits behind a `Mutex`, which makes symbol creation safe from
//! any thread. Comparison and hashing never take the lock.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock};

/// An interned name.
#[derive(Clone)]
pub struct Symbol {
    inner: Arc<str>,
}

static SYMBOL_INTERNER: OnceLock<Mutex<HashSet<Arc<str>>>> = OnceLock::new();

fn get_interner() -> &'static Mutex<HashSet<Arc<str>>> {
    SYMBOL_INTERNER.get_or_init(|| Mutex::new(HashSet::new()))
}

impl Symbol {
    /// Return the unique symbol for `name`, creating it on first use.
    pub fn new(name: &str) -> Self {
        let mut table = get_interner()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = table.get(name) {
            return Symbol {
                inner: Arc::clone(existing),
            };
        }
        let inner: Arc<str> = Arc::from(name);
        table.insert(Arc::clone(&inner));
        Symbol { inner }
    }

    /// Get the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner
    }

    /// Split a dotted identifier into its segments: `a.b.c` gives `["a", "b", "c"]`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.')
    }

    /// True when both symbols are the very same interned object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        // Due to interning, pointer comparison is sufficient
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Use pointer hash for interned symbols
        Arc::as_ptr(&self.inner).cast::<u8>().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_symbol() {
        let sym = Symbol::new("foo");
        assert_eq!(sym.name(), "foo");
        assert_eq!(format!("{}", sym), "foo");
    }

    #[test]
    fn test_interning() {
        let sym1 = Symbol::new("foo");
        let sym2 = Symbol::new("foo");
        assert_eq!(sym1, sym2);
        assert!(sym1.ptr_eq(&sym2));
    }

    #[test]
    fn test_equality() {
        let sym1 = Symbol::new("foo");
        let sym2 = Symbol::new("foo");
        let sym3 = Symbol::new("bar");

        assert_eq!(sym1, sym2);
        assert_ne!(sym1, sym3);
    }

    #[test]
    fn test_segments() {
        let sym = Symbol::new("io.file.missing");
        assert_eq!(sym.segments().collect::<Vec<_>>(), vec!["io", "file", "missing"]);
        assert_eq!(Symbol::new("plain").segments().count(), 1);
    }

    #[test]
    fn test_ordering() {
        assert!(Symbol::new("a") < Symbol::new("b"));
    }
}
