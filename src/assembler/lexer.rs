//! This lexer splits source text into words and statement terminators.
//!
//! It never fails: deciding whether a word is a real opcode or register
//! is the parser's job.
use std::collections::VecDeque;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A single delimiter character, or a run of non-delimiter, non-blank text.
static LEXEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;\n]|[^ \t\r;\n]+").unwrap());

/// A position in the source text. Lines and columns are 1-based,
/// columns count characters, and the offset is in bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Location { line, column, offset }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        self.offset += c.len_utf8();
    }

    fn advance_over(&mut self, text: &str) {
        text.chars().for_each(|c| self.advance(c));
    }
}

impl Default for Location {
    fn default() -> Self {
        Location { line: 1, column: 1, offset: 0 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Word(String),
    StatementEnd,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn word<S: Into<String>>(text: S, location: Location) -> Self {
        Token { kind: TokenKind::Word(text.into()), location }
    }

    pub fn statement_end(location: Location) -> Self {
        Token { kind: TokenKind::StatementEnd, location }
    }
}

/// Splits the source into tokens.
///
/// A `StatementEnd` is only emitted between two words: delimiters before
/// the first word, after the last word, or directly after another
/// delimiter produce nothing. It carries the location of the first
/// delimiter in its run.
pub fn tokenize(source: &str) -> VecDeque<Token> {
    let mut tokens: VecDeque<Token> = VecDeque::with_capacity(source.len() / 3);
    let mut location = Location::default();
    let mut cursor: usize = 0;
    let mut pending_end: Option<Location> = None;

    for lexeme in LEXEME.find_iter(source) {
        location.advance_over(&source[cursor..lexeme.start()]);
        cursor = lexeme.start();

        match lexeme.as_str() {
            ";" | "\n" => {
                if !tokens.is_empty() && pending_end.is_none() {
                    pending_end = Some(location);
                }
            }
            word => {
                if let Some(at) = pending_end.take() {
                    tokens.push_back(Token::statement_end(at));
                }
                tokens.push_back(Token::word(word, location));
            }
        }
    }

    trace!("Tokenized {} bytes into {} token(s).", source.len(), tokens.len());
    tokens
}
