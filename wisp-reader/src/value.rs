// wisp-reader - Value types
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value types for Wisp.
//!
//! `Value` serves both as the parsed form produced by the reader and as the
//! runtime value produced by the evaluator: a quoted list is just a list.
//! Runtime-only variants (closures, streams) carry their evaluator state in
//! type-erased form so that this crate does not depend on the evaluator.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use im::Vector;

use crate::symbol::Symbol;

// ============================================================================
// Special forms
// ============================================================================

/// The fixed set of syntax keywords. The reader tags a head token with one of
/// these instead of producing a symbol, so dispatch never goes through lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    If,
    Def,
    Fn,
    Defn,
    Quote,
    Do,
    Let,
    LetStar,
    Loop,
    Break,
    Try,
    Catch,
    Finally,
    Throw,
    SetBang,
}

impl SpecialForm {
    pub const ALL: [SpecialForm; 15] = [
        SpecialForm::If,
        SpecialForm::Def,
        SpecialForm::Fn,
        SpecialForm::Defn,
        SpecialForm::Quote,
        SpecialForm::Do,
        SpecialForm::Let,
        SpecialForm::LetStar,
        SpecialForm::Loop,
        SpecialForm::Break,
        SpecialForm::Try,
        SpecialForm::Catch,
        SpecialForm::Finally,
        SpecialForm::Throw,
        SpecialForm::SetBang,
    ];

    /// The source keyword for this form.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            SpecialForm::If => "if",
            SpecialForm::Def => "def",
            SpecialForm::Fn => "fn",
            SpecialForm::Defn => "defn",
            SpecialForm::Quote => "quote",
            SpecialForm::Do => "do",
            SpecialForm::Let => "let",
            SpecialForm::LetStar => "let*",
            SpecialForm::Loop => "loop",
            SpecialForm::Break => "break",
            SpecialForm::Try => "try",
            SpecialForm::Catch => "catch",
            SpecialForm::Finally => "finally",
            SpecialForm::Throw => "throw",
            SpecialForm::SetBang => "set!",
        }
    }

    /// Look up a keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<SpecialForm> {
        SpecialForm::ALL.into_iter().find(|sf| sf.keyword() == word)
    }
}

// ============================================================================
// Function Types
// ============================================================================

/// Parameter list of a single closure clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// `(a b c)` - exactly this many arguments.
    Fixed(Vec<Symbol>),
    /// `(x & xs)` - one leading argument, the rest collected into a list.
    Variadic { first: Symbol, rest: Symbol },
}

impl Params {
    /// Number of declared parameter slots.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Params::Fixed(params) => params.len(),
            Params::Variadic { .. } => 2,
        }
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        matches!(self, Params::Variadic { .. })
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Params::Fixed(params) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ")")
            }
            Params::Variadic { first, rest } => write!(f, "({} & {})", first, rest),
        }
    }
}

/// A parameter list and body paired with the scope it was created in.
pub struct Closure {
    pub params: Params,
    pub body: Rc<[Value]>,
    /// Captured environment (type-erased to avoid circular dependency)
    pub env: Rc<dyn Any>,
}

impl Closure {
    pub fn new(params: Params, body: Vec<Value>, env: Rc<dyn Any>) -> Self {
        Closure {
            params,
            body: body.into(),
            env,
        }
    }
}

/// Several closures sharing one name, selected by argument count.
pub struct MultiArityFn {
    pub name: Option<Symbol>,
    pub fixed: BTreeMap<usize, Rc<Closure>>,
    pub variadic: Option<Rc<Closure>>,
}

impl MultiArityFn {
    /// Exact arity first, then the variadic fallback.
    #[must_use]
    pub fn select(&self, argc: usize) -> Option<&Rc<Closure>> {
        self.fixed.get(&argc).or(self.variadic.as_ref())
    }
}

/// A function implemented in Rust.
#[derive(Clone)]
pub struct NativeFn {
    name: &'static str,
    /// The actual function (type-erased)
    func: Rc<dyn Any>,
}

impl NativeFn {
    pub fn new(name: &'static str, func: Rc<dyn Any>) -> Self {
        NativeFn { name, func }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn func(&self) -> &Rc<dyn Any> {
        &self.func
    }
}

// ============================================================================
// Streams
// ============================================================================

/// Cursor state of a stream. The evaluator drives these; this crate only
/// stores them.
pub enum StreamState {
    /// Always exhausted.
    Empty,
    /// A fixed collection with an advancing cursor.
    Sequence { items: Vector<Value>, cursor: usize },
    /// A zero-argument production callable, optionally paired with an
    /// availability callable. Without one, `cached` holds the element pulled
    /// ahead by `hasNext`.
    Procedure {
        produce: Value,
        available: Option<Value>,
        cached: Option<Value>,
    },
    /// Elements of `source` passed through `func` as they are pulled.
    Mapped { func: Value, source: Stream },
    /// Each stream drained in turn.
    Chain { streams: Vec<Stream>, current: usize },
}

/// A lazy, single-pass, pull-based sequence.
#[derive(Clone)]
pub struct Stream {
    state: Rc<RefCell<StreamState>>,
}

impl Stream {
    pub fn new(state: StreamState) -> Self {
        Stream {
            state: Rc::new(RefCell::new(state)),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Stream::new(StreamState::Empty)
    }

    #[must_use]
    pub fn from_items(items: Vector<Value>) -> Self {
        Stream::new(StreamState::Sequence { items, cursor: 0 })
    }

    #[must_use]
    pub fn state(&self) -> &RefCell<StreamState> {
        &self.state
    }
}

impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

// ============================================================================
// Exceptions
// ============================================================================

/// A program exception: a hierarchical identifier and a payload.
#[derive(Clone, PartialEq)]
pub struct Exception {
    pub id: Symbol,
    pub payload: Value,
}

impl Exception {
    pub fn new(id: Symbol, payload: Value) -> Self {
        Exception { id, payload }
    }
}

impl fmt::Debug for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exception({}, {})", self.id, self.payload)
    }
}

// ============================================================================
// Value
// ============================================================================

/// A Wisp value.
#[derive(Clone)]
pub enum Value {
    /// The nil literal
    Nil,
    Bool(bool),
    /// All numbers are doubles
    Number(f64),
    /// Immutable string
    String(Rc<str>),
    Symbol(Symbol),
    /// A syntax keyword; also serves as the `break` marker inside `loop`
    SpecialForm(SpecialForm),
    /// Persistent list with structural sharing
    List(Vector<Value>),
    Closure(Rc<Closure>),
    MultiFn(Rc<MultiArityFn>),
    NativeFn(NativeFn),
    Stream(Stream),
    /// Raw exception, the third element of a caught exception record
    Exception(Rc<Exception>),
    /// The absent value: what a `loop` leaves behind once broken out of
    Void,
}

impl Value {
    #[must_use]
    pub fn nil() -> Self {
        Value::Nil
    }

    #[must_use]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    #[must_use]
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    #[must_use]
    pub fn empty_list() -> Self {
        Value::List(Vector::new())
    }

    /// Everything except `false` and `nil` is true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Closure(_)
                | Value::MultiFn(_)
                | Value::NativeFn(_)
                | Value::List(_)
                | Value::Stream(_)
        )
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&Vector<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for a list whose head is the given special form.
    #[must_use]
    pub fn is_form(&self, form: SpecialForm) -> bool {
        match self {
            Value::List(items) => matches!(items.front(), Some(Value::SpecialForm(sf)) if *sf == form),
            _ => false,
        }
    }

    /// Name of the value's type, for error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::SpecialForm(_) => "special form",
            Value::List(_) => "list",
            Value::Closure(_) | Value::MultiFn(_) | Value::NativeFn(_) => "fn",
            Value::Stream(_) => "stream",
            Value::Exception(_) => "exception",
            Value::Void => "void",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<SpecialForm> for Value {
    fn from(sf: SpecialForm) -> Self {
        Value::SpecialForm(sf)
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        }
    } else {
        write!(f, "{}", n)
    }
}

/// The printer: a pure rendering of any value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => format_number(*n, f),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::SpecialForm(sf) => write!(f, "{}", sf.keyword()),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Closure(_) | Value::MultiFn(_) | Value::NativeFn(_) => write!(f, "#<fn>"),
            Value::Stream(_) => write!(f, "#<stream>"),
            Value::Exception(ex) => write!(f, "#<exception {}>", ex.id),
            Value::Void => write!(f, "void"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::NativeFn(native) => write!(f, "#<fn {}>", native.name()),
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            // NaN equals itself; 0 and -0 are equal
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::SpecialForm(a), Value::SpecialForm(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::MultiFn(a), Value::MultiFn(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFn(a), Value::NativeFn(b)) => Rc::ptr_eq(a.func(), b.func()),
            (Value::Stream(a), Value::Stream(b)) => a == b,
            (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
