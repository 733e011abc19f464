// wisp-reader - Incremental tokenizer
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tokenizer (lexer) for Wisp source text.
//!
//! Text is fed in arbitrary chunks; a token split across two chunks is
//! stitched together because the partially accumulated word survives between
//! calls. Completed tokens wait in a FIFO for the reader.

use std::collections::VecDeque;
use std::fmt;

use crate::error::ParseError;

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Generic word: numbers, symbols, keywords
    Word(String),
    /// String literal contents, without the quotes
    Str(String),
    /// A delimiter character, always a token of its own
    Delim(char),
    /// A prefix character seen at the start of a token
    Prefix(char),
    /// A token claimed by a registered recognizer
    Custom {
        tag: &'static str,
        value: String,
        raw: String,
    },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{}", w),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Delim(c) | Token::Prefix(c) => write!(f, "{}", c),
            Token::Custom { raw, .. } => write!(f, "{}", raw),
        }
    }
}

/// A custom token recognizer. Tried against every completed word, in
/// registration order; the first `Some` replaces the generic `Word`.
pub type Recognizer = fn(&str) -> Option<Token>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    InString,
}

/// Character-at-a-time tokenizer with state that persists across `tokenize`
/// calls.
pub struct Tokenizer {
    mode: Mode,
    pending: String,
    tokens: VecDeque<Token>,
    prefixes: Vec<char>,
    delimiters: Vec<char>,
    recognizers: Vec<Recognizer>,
}

impl Tokenizer {
    pub const STRING_DELIMITER: char = '"';

    pub fn new(prefixes: Vec<char>, delimiters: Vec<char>, recognizers: Vec<Recognizer>) -> Self {
        Tokenizer {
            mode: Mode::Normal,
            pending: String::new(),
            tokens: VecDeque::new(),
            prefixes,
            delimiters,
            recognizers,
        }
    }

    /// Consume a chunk of text.
    pub fn tokenize(&mut self, text: &str) {
        for c in text.chars() {
            match self.mode {
                Mode::Normal => self.normal(c),
                Mode::InString => self.in_string(c),
            }
        }
    }

    /// Flush the pending token. Fails if a string literal is still open.
    pub fn end(&mut self) -> Result<(), ParseError> {
        if self.mode == Mode::InString {
            return Err(ParseError::UnterminatedString);
        }
        self.push_pending();
        Ok(())
    }

    /// Look at the oldest completed token.
    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    /// Remove and return the oldest completed token.
    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Drop all buffered text and tokens.
    pub fn reset(&mut self) {
        self.mode = Mode::Normal;
        self.pending.clear();
        self.tokens.clear();
    }

    /// True while inside an unterminated string literal.
    #[must_use]
    pub fn is_in_string(&self) -> bool {
        self.mode == Mode::InString
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn normal(&mut self, c: char) {
        if c.is_whitespace() {
            self.push_pending();
        } else if c == Self::STRING_DELIMITER {
            self.push_pending();
            self.mode = Mode::InString;
        } else if self.delimiters.contains(&c) {
            self.push_pending();
            self.tokens.push_back(Token::Delim(c));
        } else if self.pending.is_empty() && self.prefixes.contains(&c) {
            self.tokens.push_back(Token::Prefix(c));
        } else {
            self.pending.push(c);
        }
    }

    fn in_string(&mut self, c: char) {
        if c == Self::STRING_DELIMITER {
            let contents = std::mem::take(&mut self.pending);
            self.tokens.push_back(Token::Str(contents));
            self.mode = Mode::Normal;
        } else {
            self.pending.push(c);
        }
    }

    fn push_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let word = std::mem::take(&mut self.pending);
        let token = self
            .recognizers
            .iter()
            .find_map(|recognize| recognize(&word))
            .unwrap_or(Token::Word(word));
        self.tokens.push_back(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Tokenizer {
        Tokenizer::new(vec!['\''], vec!['(', ')'], Vec::new())
    }

    fn drain(t: &mut Tokenizer) -> Vec<Token> {
        std::iter::from_fn(|| t.next_token()).collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_delimiters_split_words() {
        let mut t = plain();
        t.tokenize("(foo bar)");
        assert_eq!(
            drain(&mut t),
            vec![Token::Delim('('), word("foo"), word("bar"), Token::Delim(')')]
        );
    }

    #[test]
    fn test_pending_word_survives_chunks() {
        let mut t = plain();
        t.tokenize("(fo");
        assert_eq!(drain(&mut t), vec![Token::Delim('(')]);
        t.tokenize("o ");
        assert_eq!(drain(&mut t), vec![word("foo")]);
    }

    #[test]
    fn test_end_flushes_pending() {
        let mut t = plain();
        t.tokenize("abc");
        assert!(t.peek().is_none());
        t.end().unwrap();
        assert_eq!(drain(&mut t), vec![word("abc")]);
    }

    #[test]
    fn test_prefix_only_at_token_start() {
        let mut t = plain();
        t.tokenize("'a b'c ");
        assert_eq!(
            drain(&mut t),
            vec![Token::Prefix('\''), word("a"), word("b'c")]
        );
    }

    #[test]
    fn test_strings_are_literal() {
        let mut t = plain();
        t.tokenize("\"a (b) 'c\\\" d ");
        assert_eq!(
            drain(&mut t),
            vec![Token::Str("a (b) 'c\\".to_string()), word("d")]
        );
    }

    #[test]
    fn test_string_ends_pending_word() {
        let mut t = plain();
        t.tokenize("ab\"cd\"");
        assert_eq!(drain(&mut t), vec![word("ab"), Token::Str("cd".to_string())]);
    }

    #[test]
    fn test_empty_string_token() {
        let mut t = plain();
        t.tokenize("\"\"");
        assert_eq!(drain(&mut t), vec![Token::Str(String::new())]);
    }

    #[test]
    fn test_unterminated_string() {
        let mut t = plain();
        t.tokenize("\"open");
        assert!(t.is_in_string());
        assert_eq!(t.end(), Err(ParseError::UnterminatedString));
    }

    #[test]
    fn test_string_spans_chunks() {
        let mut t = plain();
        t.tokenize("\"line one\n");
        assert!(t.peek().is_none());
        t.tokenize("line two\"");
        assert_eq!(
            drain(&mut t),
            vec![Token::Str("line one\nline two".to_string())]
        );
    }

    #[test]
    fn test_recognizers_in_order() {
        fn hash(w: &str) -> Option<Token> {
            w.strip_prefix('#').map(|rest| Token::Custom {
                tag: "hash",
                value: rest.to_string(),
                raw: w.to_string(),
            })
        }
        fn anything(w: &str) -> Option<Token> {
            Some(Token::Custom {
                tag: "any",
                value: w.to_string(),
                raw: w.to_string(),
            })
        }
        let mut t = Tokenizer::new(Vec::new(), vec!['(', ')'], vec![hash, anything]);
        t.tokenize("#x y ");
        let tokens = drain(&mut t);
        assert!(matches!(&tokens[0], Token::Custom { tag: "hash", value, .. } if value == "x"));
        assert!(matches!(&tokens[1], Token::Custom { tag: "any", .. }));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut t = plain();
        t.tokenize("(a \"unfinished");
        t.reset();
        assert!(t.peek().is_none());
        assert!(!t.is_in_string());
        t.tokenize("b ");
        assert_eq!(drain(&mut t), vec![word("b")]);
    }
}
