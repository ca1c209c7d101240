//! The `Lexer` struct and its top-level dispatch, split away from the
//! per-token-family scanning routines in the sibling modules.

use std::io;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::lexer::number::NumberValue;
use crate::lexer::{comment, identifier, number, string};
use crate::source::CharSource;
use crate::strictness::Strictness;

/// What the lexer recognized at the current position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lexeme {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name(String),
    String(String),
    Number(NumberValue),
    True,
    False,
    Null,
    /// True end-of-input: no more characters at all, not even whitespace.
    EndOfDocument,
}

/// A lexeme plus the 1-based position of its first character, captured
/// before any of the token's characters were consumed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Peeked {
    pub(crate) lexeme: Lexeme,
    pub(crate) line: u64,
    pub(crate) column: u64,
}

pub(crate) struct Lexer<S> {
    buffer: Buffer<S>,
    bom_checked: bool,
    prefix_checked: bool,
}

impl<S: CharSource> Lexer<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            buffer: Buffer::new(source),
            bom_checked: false,
            prefix_checked: false,
        }
    }

    pub(crate) fn line(&self) -> u64 {
        self.buffer.line()
    }

    pub(crate) fn column(&self) -> u64 {
        self.buffer.column()
    }

    pub(crate) fn peek_char(&mut self, path: &str) -> Result<Option<char>> {
        self.io(self.buffer.current_char(), path)
    }

    pub(crate) fn peek_char_at(&mut self, offset: usize, path: &str) -> Result<Option<char>> {
        let (line, column) = (self.line(), self.column());
        self.buffer
            .peek_char(offset)
            .map_err(|e| io_to_error(e, line, column, path))
    }

    pub(crate) fn advance_char(&mut self, path: &str) -> Result<Option<char>> {
        self.io(self.buffer.advance(), path)
    }

    pub(crate) fn match_char(&mut self, expected: char, path: &str) -> Result<bool> {
        self.io(self.buffer.match_char(expected), path)
    }

    fn io<T>(&self, result: io::Result<T>, path: &str) -> Result<T> {
        result.map_err(|e| io_to_error(e, self.line(), self.column(), path))
    }

    /// Consumes a leading U+FEFF exactly once. Idempotent no-op after the
    /// first call (or once any other character has been looked at).
    pub(crate) fn consume_bom(&mut self, path: &str) -> Result<()> {
        if self.bom_checked {
            return Ok(());
        }
        self.bom_checked = true;
        self.match_char('\u{feff}', path)?;
        Ok(())
    }

    /// Consumes a leading `)]}'\n` non-execute prefix exactly once, if
    /// present. Must run after [`Lexer::consume_bom`] and before the
    /// first whitespace skip.
    pub(crate) fn consume_non_execute_prefix(&mut self, path: &str) -> Result<()> {
        if self.prefix_checked {
            return Ok(());
        }
        self.prefix_checked = true;
        const PREFIX: &str = ")]}'\n";
        for (i, expected) in PREFIX.chars().enumerate() {
            if self.peek_char_at(i, path)? != Some(expected) {
                return Ok(());
            }
        }
        for _ in PREFIX.chars() {
            self.advance_char(path)?;
        }
        Ok(())
    }

    pub(crate) fn skip_whitespace_and_comments(
        &mut self,
        strictness: Strictness,
        path: &str,
    ) -> Result<()> {
        comment::skip_whitespace_and_comments(self, strictness, path)
    }

    /// Peeks the next structural separator character (`,`, `:`, `;`,
    /// `=`, `=>`, `]`, `}`) after skipping whitespace, without consuming
    /// it. Returns `None` at true end-of-input.
    pub(crate) fn peek_non_whitespace(
        &mut self,
        strictness: Strictness,
        path: &str,
    ) -> Result<Option<char>> {
        self.skip_whitespace_and_comments(strictness, path)?;
        self.peek_char(path)
    }

    /// Skips whitespace, then consumes `expected` if present.
    pub(crate) fn match_structural(
        &mut self,
        expected: char,
        strictness: Strictness,
        path: &str,
    ) -> Result<bool> {
        self.skip_whitespace_and_comments(strictness, path)?;
        self.match_char(expected, path)
    }

    /// Skips whitespace, then consumes a two-character structural
    /// separator (`=>`) if present.
    pub(crate) fn match_structural_str(
        &mut self,
        expected: &str,
        strictness: Strictness,
        path: &str,
    ) -> Result<bool> {
        self.skip_whitespace_and_comments(strictness, path)?;
        for (i, c) in expected.chars().enumerate() {
            if self.peek_char_at(i, path)? != Some(c) {
                return Ok(false);
            }
        }
        for _ in expected.chars() {
            self.advance_char(path)?;
        }
        Ok(true)
    }

    /// Classifies the next value-position token: a container delimiter,
    /// a literal, a number, or a string. Fully consumes whatever it
    /// recognizes.
    pub(crate) fn classify_value(&mut self, strictness: Strictness, path: &str) -> Result<Peeked> {
        self.skip_whitespace_and_comments(strictness, path)?;
        let (line, column) = (self.line(), self.column());
        let lexeme = match self.peek_char(path)? {
            None => Lexeme::EndOfDocument,
            Some('{') => {
                self.advance_char(path)?;
                Lexeme::BeginObject
            }
            Some('}') => {
                self.advance_char(path)?;
                Lexeme::EndObject
            }
            Some('[') => {
                self.advance_char(path)?;
                Lexeme::BeginArray
            }
            Some(']') => {
                self.advance_char(path)?;
                Lexeme::EndArray
            }
            Some('"') => Lexeme::String(string::lex_quoted_string(self, '"', strictness, path)?),
            Some('\'') if strictness.allows_single_quotes() => {
                Lexeme::String(string::lex_quoted_string(self, '\'', strictness, path)?)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                number::lex_number(self, strictness, path)?
            }
            Some(c) if strictness.allows_non_finite_numbers() && (c == 'I' || c == 'N') => {
                match number::try_lex_bare_non_finite(self, path)? {
                    Some(lexeme) => lexeme,
                    None => identifier::lex_bareword(self, strictness, path)?,
                }
            }
            Some(c) if identifier::is_bareword_start(c) => {
                identifier::lex_bareword(self, strictness, path)?
            }
            Some(c) => {
                return Err(Error::malformed(
                    format!("unexpected character '{c}'"),
                    line,
                    column,
                    path,
                ))
            }
        };
        Ok(Peeked {
            lexeme,
            line,
            column,
        })
    }

    /// Classifies the next name-position token: `}` or a string (quoted
    /// always, unquoted in lenient mode).
    pub(crate) fn classify_name(&mut self, strictness: Strictness, path: &str) -> Result<Peeked> {
        self.skip_whitespace_and_comments(strictness, path)?;
        let (line, column) = (self.line(), self.column());
        let lexeme = match self.peek_char(path)? {
            None => Lexeme::EndOfDocument,
            Some('}') => {
                self.advance_char(path)?;
                Lexeme::EndObject
            }
            Some('"') => Lexeme::Name(string::lex_quoted_string(self, '"', strictness, path)?),
            Some('\'') if strictness.allows_single_quotes() => {
                Lexeme::Name(string::lex_quoted_string(self, '\'', strictness, path)?)
            }
            Some(c) if strictness.allows_unquoted_strings() && identifier::is_bareword_start(c) => {
                Lexeme::Name(identifier::scan_bareword(self, path)?)
            }
            Some(c) => {
                return Err(Error::malformed(
                    format!("unexpected character '{c}' where a name was expected"),
                    line,
                    column,
                    path,
                ))
            }
        };
        Ok(Peeked {
            lexeme,
            line,
            column,
        })
    }
}

pub(crate) fn io_to_error(e: io::Error, line: u64, column: u64, path: &str) -> Error {
    if e.kind() == io::ErrorKind::InvalidData {
        Error::malformed(e.to_string(), line, column, path)
    } else {
        Error::unexpected_eof(line, column, path)
    }
}
