//! Number lexing: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE][+-]?[0-9]+)?`,
//! plus the lenient `NaN`/`Infinity`/`-Infinity` spellings and the
//! unquoted-string fallback shared with [`identifier`](super::identifier).

use crate::error::{Error, Result};
use crate::lexer::core::{Lexeme, Lexer};
use crate::lexer::identifier;
use crate::source::CharSource;
use crate::strictness::Strictness;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NonFiniteKind {
    NaN,
    Infinity,
    NegInfinity,
}

/// The raw lexeme text of a number token, kept intact (not normalized)
/// so `next_string` can surface e.g. `-0` unchanged.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumberValue {
    pub(crate) text: String,
    pub(crate) non_finite: Option<NonFiniteKind>,
}

impl NumberValue {
    fn finite(text: String) -> Self {
        Self {
            text,
            non_finite: None,
        }
    }

    fn non_finite(text: String, kind: NonFiniteKind) -> Self {
        Self {
            text,
            non_finite: Some(kind),
        }
    }
}

/// Recognizes a bare (not preceded by `-`) `Infinity` or `NaN` as a
/// non-finite number. Non-destructive if the next characters don't
/// exactly spell one of those words.
pub(crate) fn try_lex_bare_non_finite<S: CharSource>(
    lexer: &mut Lexer<S>,
    path: &str,
) -> Result<Option<Lexeme>> {
    if let Some(word) = identifier::try_match_exact(lexer, "Infinity", path)? {
        return Ok(Some(Lexeme::Number(NumberValue::non_finite(
            word,
            NonFiniteKind::Infinity,
        ))));
    }
    if let Some(word) = identifier::try_match_exact(lexer, "NaN", path)? {
        return Ok(Some(Lexeme::Number(NumberValue::non_finite(
            word,
            NonFiniteKind::NaN,
        ))));
    }
    Ok(None)
}

pub(crate) fn lex_number<S: CharSource>(
    lexer: &mut Lexer<S>,
    strictness: Strictness,
    path: &str,
) -> Result<Lexeme> {
    let (line, column) = (lexer.line(), lexer.column());
    let mut text = String::new();
    let negative = lexer.match_char('-', path)?;
    if negative {
        text.push('-');
    }

    if strictness.allows_non_finite_numbers() {
        if negative {
            if let Some(word) = identifier::try_match_exact(lexer, "Infinity", path)? {
                text.push_str(&word);
                return Ok(Lexeme::Number(NumberValue::non_finite(
                    text,
                    NonFiniteKind::NegInfinity,
                )));
            }
        } else if let Some(lexeme) = try_lex_bare_non_finite(lexer, path)? {
            return Ok(lexeme);
        }
        if negative && lexer.peek_char(path)?.map_or(false, identifier::is_bareword_start) {
            // Consumed '-' but it is not followed by a valid number or
            // "Infinity": this can only be a malformed token.
            let rest = identifier::scan_bareword(lexer, path)?;
            return Err(Error::malformed(
                format!("invalid number '-{rest}'"),
                line,
                column,
                path,
            ));
        }
    }

    match lexer.peek_char(path)? {
        Some('0') => {
            text.push('0');
            lexer.advance_char(path)?;
            if matches!(lexer.peek_char(path)?, Some(d) if d.is_ascii_digit()) {
                if !strictness.allows_leading_zero() {
                    return Err(Error::malformed_strict(
                        "leading zero in number",
                        line,
                        column,
                        path,
                    ));
                }
                return lex_fallback_bareword(lexer, text, strictness, line, column, path);
            }
        }
        Some(c) if c.is_ascii_digit() => {
            while matches!(lexer.peek_char(path)?, Some(d) if d.is_ascii_digit()) {
                text.push(lexer.advance_char(path)?.unwrap());
            }
        }
        _ => {
            return Err(Error::malformed("expected a number", line, column, path));
        }
    }

    if lexer.peek_char(path)? == Some('.')
        && matches!(lexer.peek_char_at(1, path)?, Some(d) if d.is_ascii_digit())
    {
        text.push(lexer.advance_char(path)?.unwrap());
        while matches!(lexer.peek_char(path)?, Some(d) if d.is_ascii_digit()) {
            text.push(lexer.advance_char(path)?.unwrap());
        }
    }

    if matches!(lexer.peek_char(path)?, Some('e') | Some('E')) {
        let mut offset = 1;
        let has_sign = matches!(lexer.peek_char_at(1, path)?, Some('+') | Some('-'));
        if has_sign {
            offset += 1;
        }
        if matches!(lexer.peek_char_at(offset, path)?, Some(d) if d.is_ascii_digit()) {
            text.push(lexer.advance_char(path)?.unwrap());
            if has_sign {
                text.push(lexer.advance_char(path)?.unwrap());
            }
            while matches!(lexer.peek_char(path)?, Some(d) if d.is_ascii_digit()) {
                text.push(lexer.advance_char(path)?.unwrap());
            }
        }
    }

    if strictness.allows_unquoted_strings()
        && matches!(lexer.peek_char(path)?, Some(c) if identifier::is_bareword_continue(c))
    {
        return lex_fallback_bareword(lexer, text, strictness, line, column, path);
    }

    Ok(Lexeme::Number(NumberValue::finite(text)))
}

fn lex_fallback_bareword<S: CharSource>(
    lexer: &mut Lexer<S>,
    mut prefix: String,
    _strictness: Strictness,
    _line: u64,
    _column: u64,
    path: &str,
) -> Result<Lexeme> {
    let rest = identifier::scan_bareword(lexer, path)?;
    prefix.push_str(&rest);
    Ok(Lexeme::String(prefix))
}
