// wisp-reader - Incremental reader
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The reader: a resumable state machine that turns tokens into forms.
//!
//! Input arrives in chunks. Each call to [`Reader::read`] tokenizes the chunk
//! and advances the machine until the token queue runs dry; every top-level
//! form that completes along the way is handed to the caller's callback. The
//! open constructs live on an explicit frame stack, so nothing is lost
//! between calls.

use std::fmt;

use log::debug;

use crate::error::ParseError;
use crate::macros::{LambdaMacro, MacroFrame, QuoteMacro, ReaderMacro, Step};
use crate::tokenizer::{Token, Tokenizer};
use crate::value::{SpecialForm, Value};

/// The named state a reader is in, as reported to a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No form in progress
    Ready,
    /// Deciding what the next token begins
    Form,
    /// About to resolve a single token
    Atom,
    /// Collecting list items
    List,
    /// Inside a macro construct, by its state name
    Macro(&'static str),
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderState::Ready => write!(f, "ready"),
            ReaderState::Form => write!(f, "form"),
            ReaderState::Atom => write!(f, "atom"),
            ReaderState::List => write!(f, "list"),
            ReaderState::Macro(name) => write!(f, "{}", name),
        }
    }
}

/// Snapshot returned by [`Reader::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStatus {
    pub state: ReaderState,
    pub depth: usize,
}

impl ReaderStatus {
    /// True when no form is in progress.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == ReaderState::Ready
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ready,
    Form,
    Atom,
    Frame,
}

enum Frame {
    List(Vec<Value>),
    Macro(Box<dyn MacroFrame>),
}

/// What the top frame decided; applied once the frame borrow is released.
enum Action {
    ReadForm,
    Stay,
    Close(Value),
}

pub struct Reader {
    tokenizer: Tokenizer,
    macros: Vec<Box<dyn ReaderMacro>>,
    stack: Vec<Frame>,
    mode: Mode,
    depth: usize,
}

impl Default for Reader {
    fn default() -> Self {
        Reader::new()
    }
}

impl Reader {
    pub const LIST_OPEN: char = '(';
    pub const LIST_CLOSE: char = ')';

    /// A reader with the standard quote and lambda macros.
    #[must_use]
    pub fn new() -> Self {
        Reader::with_macros(vec![Box::new(QuoteMacro), Box::new(LambdaMacro)])
    }

    /// A reader with exactly these macros, consulted in order.
    pub fn with_macros(macros: Vec<Box<dyn ReaderMacro>>) -> Self {
        let mut prefixes = Vec::new();
        let mut delimiters = vec![Self::LIST_OPEN, Self::LIST_CLOSE];
        let mut recognizers = Vec::new();
        for m in &macros {
            prefixes.extend(m.prefixes());
            delimiters.extend(m.delimiters());
            recognizers.extend(m.recognizers());
        }
        Reader {
            tokenizer: Tokenizer::new(prefixes, delimiters, recognizers),
            macros,
            stack: Vec::new(),
            mode: Mode::Ready,
            depth: 0,
        }
    }

    /// Ingest a chunk of text, emitting each top-level form as it completes.
    ///
    /// On error the reader is left mid-form; call [`Reader::reset`] before
    /// reading again.
    pub fn read<F: FnMut(Value)>(&mut self, text: &str, mut emit: F) -> Result<(), ParseError> {
        self.tokenizer.tokenize(text);
        self.feed(&mut emit)
    }

    /// Flush the tokenizer and drain the remaining tokens. An incomplete form
    /// is not an error here; the reader simply stays non-ready.
    pub fn end<F: FnMut(Value)>(&mut self, mut emit: F) -> Result<(), ParseError> {
        self.tokenizer.end()?;
        self.feed(&mut emit)
    }

    /// Read `text` to the end and collect the forms. With
    /// `allow_incomplete` false, a form left open is an error and the reader
    /// is reset; otherwise the open form carries over to the next call.
    pub fn read_forms(
        &mut self,
        text: &str,
        allow_incomplete: bool,
    ) -> Result<Vec<Value>, ParseError> {
        let mut forms = Vec::new();
        let result = self
            .read(text, |form| forms.push(form))
            .and_then(|()| self.end(|form| forms.push(form)));
        if let Err(e) = result {
            self.reset();
            return Err(e);
        }
        if !allow_incomplete && self.mode != Mode::Ready {
            self.reset();
            return Err(ParseError::Incomplete);
        }
        Ok(forms)
    }

    /// Read a complete source text in one go.
    pub fn read_all(text: &str) -> Result<Vec<Value>, ParseError> {
        Reader::new().read_forms(text, false)
    }

    #[must_use]
    pub fn status(&self) -> ReaderStatus {
        let state = match self.mode {
            Mode::Ready => ReaderState::Ready,
            Mode::Form => ReaderState::Form,
            Mode::Atom => ReaderState::Atom,
            Mode::Frame => match self.stack.last() {
                Some(Frame::Macro(frame)) => ReaderState::Macro(frame.state_name()),
                _ => ReaderState::List,
            },
        };
        ReaderStatus {
            state,
            depth: self.depth,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.mode == Mode::Ready
    }

    /// Discard partial input and buffered tokens.
    pub fn reset(&mut self) {
        if self.mode != Mode::Ready || self.tokenizer.peek().is_some() {
            debug!("reader reset at depth {}", self.depth);
        }
        self.tokenizer.reset();
        self.stack.clear();
        self.mode = Mode::Ready;
        self.depth = 0;
    }

    // ========================================================================
    // State machine
    // ========================================================================

    fn feed(&mut self, emit: &mut dyn FnMut(Value)) -> Result<(), ParseError> {
        while self.tokenizer.peek().is_some() {
            match self.mode {
                Mode::Ready => self.mode = Mode::Form,
                Mode::Form => self.begin_form(),
                Mode::Atom => {
                    if let Some(token) = self.tokenizer.next_token() {
                        let value = resolve_atom(token)?;
                        self.complete(value, emit);
                    }
                }
                Mode::Frame => self.step_frame(emit)?,
            }
        }
        Ok(())
    }

    fn begin_form(&mut self) {
        if self.tokenizer.peek() == Some(&Token::Delim(Self::LIST_OPEN)) {
            self.tokenizer.next_token();
            self.stack.push(Frame::List(Vec::new()));
            self.depth += 1;
            self.mode = Mode::Frame;
            return;
        }
        let tokenizer = &mut self.tokenizer;
        if let Some(frame) = self.macros.iter().find_map(|m| m.matches(tokenizer)) {
            if frame.nests() {
                self.depth += 1;
            }
            self.stack.push(Frame::Macro(frame));
            self.mode = Mode::Frame;
        } else {
            self.mode = Mode::Atom;
        }
    }

    fn step_frame(&mut self, emit: &mut dyn FnMut(Value)) -> Result<(), ParseError> {
        let action = match self.stack.last_mut() {
            Some(Frame::List(items)) => {
                if self.tokenizer.peek() == Some(&Token::Delim(Self::LIST_CLOSE)) {
                    self.tokenizer.next_token();
                    Action::Close(Value::list(std::mem::take(items)))
                } else {
                    Action::ReadForm
                }
            }
            Some(Frame::Macro(frame)) => match frame.step(&mut self.tokenizer)? {
                Step::ReadForm => Action::ReadForm,
                Step::Consumed => Action::Stay,
                Step::Complete(value) => Action::Close(value),
            },
            None => Action::ReadForm,
        };
        match action {
            Action::ReadForm => self.mode = Mode::Form,
            Action::Stay => {}
            Action::Close(value) => {
                self.pop_frame();
                self.complete(value, emit);
            }
        }
        Ok(())
    }

    fn pop_frame(&mut self) {
        let nests = match self.stack.pop() {
            Some(Frame::List(_)) => true,
            Some(Frame::Macro(frame)) => frame.nests(),
            None => false,
        };
        if nests {
            self.depth = self.depth.saturating_sub(1);
        }
    }

    /// Hand a finished form to the enclosing frame, unwinding every macro
    /// frame it completes, or emit it at top level.
    fn complete(&mut self, mut value: Value, emit: &mut dyn FnMut(Value)) {
        loop {
            match self.stack.last_mut() {
                None => {
                    debug!("read form: {}", value);
                    self.mode = Mode::Ready;
                    self.depth = 0;
                    emit(value);
                    return;
                }
                Some(Frame::List(items)) => {
                    items.push(value);
                    self.mode = Mode::Frame;
                    return;
                }
                Some(Frame::Macro(frame)) => match frame.accept(value) {
                    None => {
                        self.mode = Mode::Frame;
                        return;
                    }
                    Some(done) => {
                        self.pop_frame();
                        value = done;
                    }
                },
            }
        }
    }
}

// ============================================================================
// Atoms
// ============================================================================

fn resolve_atom(token: Token) -> Result<Value, ParseError> {
    match token {
        Token::Str(s) => Ok(Value::string(s)),
        Token::Word(word) => resolve_word(&word),
        other => Err(ParseError::Unexpected {
            token: other.to_string(),
        }),
    }
}

/// Resolve a bare word: special form keyword, literal, number or symbol.
pub fn resolve_word(word: &str) -> Result<Value, ParseError> {
    if word.is_empty() {
        return Err(ParseError::EmptyToken);
    }
    if let Some(sf) = SpecialForm::from_keyword(word) {
        return Ok(Value::SpecialForm(sf));
    }
    match word {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "nil" => return Ok(Value::Nil),
        _ => {}
    }
    if let Some(n) = parse_number(word) {
        return Ok(Value::Number(n));
    }
    Ok(Value::symbol(word))
}

/// Numeric literal syntax: decimal with optional sign, fraction and
/// exponent, or unsigned `0x`/`0o`/`0b` integers.
fn parse_number(word: &str) -> Option<f64> {
    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| word.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix {
        return parse_radix(digits, radix);
    }

    let unsigned = word.strip_prefix(['+', '-']).unwrap_or(word);
    let unsigned = unsigned.strip_prefix('.').unwrap_or(unsigned);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    word.parse::<f64>().ok()
}

/// Digits in `radix`, accumulated as a double so wide literals lose
/// precision instead of failing.
fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}
