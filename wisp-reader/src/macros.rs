// wisp-reader - Reader macros
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Declarative syntax extensions for the reader.
//!
//! A macro contributes characters to the tokenizer (prefixes and
//! delimiters), optional custom token recognizers, and a matcher. When the
//! reader is about to begin a form it offers the next token to each matcher
//! in registration order; the first one to claim it supplies a frame that is
//! pushed on the reader's frame stack and driven until it completes.

use crate::error::ParseError;
use crate::symbol::Symbol;
use crate::tokenizer::{Recognizer, Token, Tokenizer};
use crate::value::{SpecialForm, Value};

/// What a macro frame wants after looking at the next token.
pub enum Step {
    /// Read one complete sub-form and hand it to [`MacroFrame::accept`].
    ReadForm,
    /// The token was consumed; offer the following token to the frame again.
    Consumed,
    /// The construct is finished and produced this form.
    Complete(Value),
}

/// A syntax extension registered with the reader.
pub trait ReaderMacro {
    /// Characters that form a token of their own at the start of a word.
    fn prefixes(&self) -> Vec<char> {
        Vec::new()
    }

    /// Characters that always form a token of their own.
    fn delimiters(&self) -> Vec<char> {
        Vec::new()
    }

    /// Recognizers tried on every completed word.
    fn recognizers(&self) -> Vec<Recognizer> {
        Vec::new()
    }

    /// Claim the next token (consuming whatever the construct opens with) or
    /// decline with `None`. Only called when a token is available.
    fn matches(&self, tokens: &mut Tokenizer) -> Option<Box<dyn MacroFrame>>;
}

/// The in-progress state of one macro construct.
pub trait MacroFrame {
    /// Name reported by `Reader::status` while this frame is on top.
    fn state_name(&self) -> &'static str;

    /// Whether the frame counts toward the reader's nesting depth.
    fn nests(&self) -> bool {
        true
    }

    /// Inspect the next token. Only called when a token is available.
    fn step(&mut self, tokens: &mut Tokenizer) -> Result<Step, ParseError>;

    /// Receive a completed sub-form. `Some` finishes the construct.
    fn accept(&mut self, form: Value) -> Option<Value>;
}

// ============================================================================
// Quote: 'form => (quote form)
// ============================================================================

pub struct QuoteMacro;

impl QuoteMacro {
    pub const PREFIX: char = '\'';
}

impl ReaderMacro for QuoteMacro {
    fn prefixes(&self) -> Vec<char> {
        vec![Self::PREFIX]
    }

    fn matches(&self, tokens: &mut Tokenizer) -> Option<Box<dyn MacroFrame>> {
        if tokens.peek() == Some(&Token::Prefix(Self::PREFIX)) {
            tokens.next_token();
            Some(Box::new(QuotedFrame))
        } else {
            None
        }
    }
}

struct QuotedFrame;

impl MacroFrame for QuotedFrame {
    fn state_name(&self) -> &'static str {
        "quoted"
    }

    fn step(&mut self, _tokens: &mut Tokenizer) -> Result<Step, ParseError> {
        Ok(Step::ReadForm)
    }

    fn accept(&mut self, form: Value) -> Option<Value> {
        Some(Value::list(vec![
            Value::SpecialForm(SpecialForm::Quote),
            form,
        ]))
    }
}

// ============================================================================
// Lambda literal: [+ \x \y] => (fn (x y) (+ x y))
// ============================================================================

pub struct LambdaMacro;

impl LambdaMacro {
    pub const OPEN: char = '[';
    pub const CLOSE: char = ']';
    pub const PARAM_PREFIX: char = '\\';
    pub const PARAM_TAG: &'static str = "lambda-param";

    fn recognize_param(word: &str) -> Option<Token> {
        let name = word.strip_prefix(Self::PARAM_PREFIX)?;
        if name.is_empty() {
            return None;
        }
        Some(Token::Custom {
            tag: Self::PARAM_TAG,
            value: name.to_string(),
            raw: word.to_string(),
        })
    }
}

impl ReaderMacro for LambdaMacro {
    fn delimiters(&self) -> Vec<char> {
        vec![Self::OPEN, Self::CLOSE]
    }

    fn recognizers(&self) -> Vec<Recognizer> {
        vec![LambdaMacro::recognize_param]
    }

    fn matches(&self, tokens: &mut Tokenizer) -> Option<Box<dyn MacroFrame>> {
        if tokens.peek() == Some(&Token::Delim(Self::OPEN)) {
            tokens.next_token();
            Some(Box::new(LambdaFrame::default()))
        } else {
            None
        }
    }
}

#[derive(Default)]
struct LambdaFrame {
    params: Vec<Symbol>,
    body: Vec<Value>,
}

impl MacroFrame for LambdaFrame {
    fn state_name(&self) -> &'static str {
        "lambda"
    }

    fn step(&mut self, tokens: &mut Tokenizer) -> Result<Step, ParseError> {
        match tokens.peek() {
            Some(Token::Delim(LambdaMacro::CLOSE)) => {
                tokens.next_token();
                let params = std::mem::take(&mut self.params);
                let body = std::mem::take(&mut self.body);
                Ok(Step::Complete(Value::list(vec![
                    Value::SpecialForm(SpecialForm::Fn),
                    Value::list(params.into_iter().map(Value::Symbol)),
                    Value::list(body),
                ])))
            }
            Some(Token::Custom { tag, .. }) if *tag == LambdaMacro::PARAM_TAG => {
                if let Some(Token::Custom { value, .. }) = tokens.next_token() {
                    let sym = Symbol::new(&value);
                    // Parameters appear in first-use order, once each
                    if !self.params.contains(&sym) {
                        self.params.push(sym.clone());
                    }
                    self.body.push(Value::Symbol(sym));
                }
                Ok(Step::Consumed)
            }
            _ => Ok(Step::ReadForm),
        }
    }

    fn accept(&mut self, form: Value) -> Option<Value> {
        self.body.push(form);
        None
    }
}
