//! Literal (`true`/`false`/`null`) and unquoted-string lexing.
//!
//! Both share one scan: a maximal run of non-structural,
//! non-whitespace characters. What it means is decided afterwards —
//! exact lowercase spelling is a literal, any-case spelling is a
//! literal only under [`Strictness::allows_mixed_case_literals`], and
//! anything else is an unquoted string under
//! [`Strictness::allows_unquoted_strings`].

use crate::error::{Error, Result};
use crate::lexer::core::{Lexeme, Lexer};
use crate::source::CharSource;
use crate::strictness::Strictness;

pub(crate) fn is_bareword_stop(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '{' | '}' | '[' | ']' | ',' | ':' | ';' | '"' | '\'' | '=' | '/' | '#'
        )
}

pub(crate) fn is_bareword_start(c: char) -> bool {
    !is_bareword_stop(c)
}

pub(crate) fn is_bareword_continue(c: char) -> bool {
    !is_bareword_stop(c)
}

pub(crate) fn scan_bareword<S: CharSource>(lexer: &mut Lexer<S>, path: &str) -> Result<String> {
    let mut word = String::new();
    while let Some(c) = lexer.peek_char(path)? {
        if is_bareword_stop(c) {
            break;
        }
        word.push(c);
        lexer.advance_char(path)?;
    }
    Ok(word)
}

/// Consumes `word` exactly if it appears next and is not itself the
/// prefix of a longer bareword run. Non-destructive on a non-match.
pub(crate) fn try_match_exact<S: CharSource>(
    lexer: &mut Lexer<S>,
    word: &str,
    path: &str,
) -> Result<Option<String>> {
    let chars: Vec<char> = word.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if lexer.peek_char_at(i, path)? != Some(*c) {
            return Ok(None);
        }
    }
    if matches!(lexer.peek_char_at(chars.len(), path)?, Some(c) if is_bareword_continue(c)) {
        return Ok(None);
    }
    for _ in &chars {
        lexer.advance_char(path)?;
    }
    Ok(Some(word.to_string()))
}

pub(crate) fn lex_bareword<S: CharSource>(
    lexer: &mut Lexer<S>,
    strictness: Strictness,
    path: &str,
) -> Result<Lexeme> {
    let (line, column) = (lexer.line(), lexer.column());
    let word = scan_bareword(lexer, path)?;

    if word == "true" {
        return Ok(Lexeme::True);
    }
    if word == "false" {
        return Ok(Lexeme::False);
    }
    if word == "null" {
        return Ok(Lexeme::Null);
    }

    if strictness.allows_mixed_case_literals() {
        if word.eq_ignore_ascii_case("true") {
            return Ok(Lexeme::True);
        }
        if word.eq_ignore_ascii_case("false") {
            return Ok(Lexeme::False);
        }
        if word.eq_ignore_ascii_case("null") {
            return Ok(Lexeme::Null);
        }
    }

    if strictness.allows_unquoted_strings() {
        return Ok(Lexeme::String(word));
    }

    Err(Error::malformed_strict(
        format!("unrecognized literal '{word}'"),
        line,
        column,
        path,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn bareword(s: &str, strictness: Strictness) -> Result<Lexeme> {
        let mut l: Lexer<StrSource> = Lexer::new(StrSource::new(s));
        lex_bareword(&mut l, strictness, "$")
    }

    #[test]
    fn exact_lowercase_literals() {
        assert_eq!(bareword("true", Strictness::Strict).unwrap(), Lexeme::True);
        assert_eq!(
            bareword("false", Strictness::Strict).unwrap(),
            Lexeme::False
        );
        assert_eq!(bareword("null", Strictness::Strict).unwrap(), Lexeme::Null);
    }

    #[test]
    fn strict_rejects_mixed_case() {
        let err = bareword("True", Strictness::Strict).unwrap_err();
        assert!(err.to_string().contains("lenient"));
    }

    #[test]
    fn legacy_strict_accepts_mixed_case() {
        assert_eq!(
            bareword("True", Strictness::LegacyStrict).unwrap(),
            Lexeme::True
        );
        assert_eq!(
            bareword("FALSE", Strictness::LegacyStrict).unwrap(),
            Lexeme::False
        );
    }

    #[test]
    fn lenient_falls_back_to_unquoted_string() {
        assert_eq!(
            bareword("banana", Strictness::Lenient).unwrap(),
            Lexeme::String("banana".to_string())
        );
    }

    #[test]
    fn strict_rejects_unquoted_string() {
        let err = bareword("banana", Strictness::Strict).unwrap_err();
        assert!(err.to_string().contains("lenient"));
    }
}
