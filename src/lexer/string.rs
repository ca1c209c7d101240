//! Quoted string lexing: escapes, `\uXXXX` (including surrogate pairs),
//! and the strict control-character check.

use crate::error::{Error, Result};
use crate::lexer::core::Lexer;
use crate::source::CharSource;
use crate::strictness::Strictness;

pub(crate) fn lex_quoted_string<S: CharSource>(
    lexer: &mut Lexer<S>,
    quote: char,
    strictness: Strictness,
    path: &str,
) -> Result<String> {
    let (line, column) = (lexer.line(), lexer.column());
    lexer.advance_char(path)?; // opening quote, already peeked by the caller

    let mut out = String::new();
    loop {
        match lexer.peek_char(path)? {
            None => {
                return Err(Error::malformed(
                    "unterminated string",
                    line,
                    column,
                    path,
                ))
            }
            Some(c) if c == quote => {
                lexer.advance_char(path)?;
                return Ok(out);
            }
            Some('\\') => {
                lexer.advance_char(path)?;
                out.push(lex_escape(lexer, line, column, path)?);
            }
            Some(c) if (c as u32) < 0x20 => {
                if !strictness.allows_unescaped_control_chars() {
                    return Err(Error::malformed_strict(
                        format!("unescaped control character U+{:04X} in string", c as u32),
                        line,
                        column,
                        path,
                    ));
                }
                lexer.advance_char(path)?;
                out.push(c);
            }
            Some(c) => {
                lexer.advance_char(path)?;
                out.push(c);
            }
        }
    }
}

fn lex_escape<S: CharSource>(
    lexer: &mut Lexer<S>,
    line: u64,
    column: u64,
    path: &str,
) -> Result<char> {
    let c = lexer
        .peek_char(path)?
        .ok_or_else(|| Error::malformed("unterminated escape sequence", line, column, path))?;
    match c {
        '"' | '\'' | '\\' | '/' => {
            lexer.advance_char(path)?;
            Ok(c)
        }
        'b' => {
            lexer.advance_char(path)?;
            Ok('\u{8}')
        }
        'f' => {
            lexer.advance_char(path)?;
            Ok('\u{c}')
        }
        'n' => {
            lexer.advance_char(path)?;
            Ok('\n')
        }
        'r' => {
            lexer.advance_char(path)?;
            Ok('\r')
        }
        't' => {
            lexer.advance_char(path)?;
            Ok('\t')
        }
        'u' => {
            lexer.advance_char(path)?;
            let high = lex_hex4(lexer, line, column, path)?;
            if (0xD800..=0xDBFF).contains(&high) {
                // High surrogate: a valid pair requires an immediately
                // following `\uDC..DFFF` low surrogate.
                if lexer.peek_char(path)? == Some('\\') && lexer.peek_char_at(1, path)? == Some('u')
                {
                    let save_high = high;
                    lexer.advance_char(path)?; // '\\'
                    lexer.advance_char(path)?; // 'u'
                    let low = lex_hex4(lexer, line, column, path)?;
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let combined =
                            0x10000 + ((save_high - 0xD800) << 10) + (low - 0xDC00);
                        return Ok(char::from_u32(combined).unwrap_or('\u{fffd}'));
                    }
                    return Ok('\u{fffd}');
                }
                return Ok('\u{fffd}');
            }
            Ok(char::from_u32(high).unwrap_or('\u{fffd}'))
        }
        other => Err(Error::malformed(
            format!("invalid escape sequence '\\{other}'"),
            line,
            column,
            path,
        )),
    }
}

fn lex_hex4<S: CharSource>(lexer: &mut Lexer<S>, line: u64, column: u64, path: &str) -> Result<u32> {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let c = lexer
            .peek_char(path)?
            .ok_or_else(|| Error::malformed("malformed Unicode escape", line, column, path))?;
        let digit = c.to_digit(16).ok_or_else(|| {
            Error::malformed(
                format!("malformed Unicode escape: '{c}' is not a hex digit"),
                line,
                column,
                path,
            )
        })?;
        value = (value << 4) | digit;
        lexer.advance_char(path)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn string(s: &str, strictness: Strictness) -> Result<String> {
        let mut l: Lexer<StrSource> = Lexer::new(StrSource::new(s));
        lex_quoted_string(&mut l, '"', strictness, "$")
    }

    #[test]
    fn plain_string() {
        assert_eq!(string("\"hello\"", Strictness::Strict).unwrap(), "hello");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(
            string("\"a\\nb\\tc\"", Strictness::Strict).unwrap(),
            "a\nb\tc"
        );
    }

    #[test]
    fn unicode_escape() {
        assert_eq!(string("\"\\u0041\"", Strictness::Strict).unwrap(), "A");
    }

    #[test]
    fn surrogate_pair_escape() {
        // U+1F600 GRINNING FACE, encoded as a surrogate pair.
        assert_eq!(
            string("\"\\uD83D\\uDE00\"", Strictness::Strict).unwrap(),
            "\u{1F600}"
        );
    }

    #[test]
    fn unterminated_string_fails() {
        let err = string("\"abc", Strictness::Strict).unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn strict_rejects_raw_control_char() {
        let err = string("\"a\tb\"", Strictness::Strict).unwrap_err();
        assert!(err.to_string().contains("lenient"));
    }

    #[test]
    fn lenient_allows_raw_control_char() {
        assert_eq!(string("\"a\tb\"", Strictness::Lenient).unwrap(), "a\tb");
    }

    #[test]
    fn single_quoted_when_lenient() {
        let mut l: Lexer<StrSource> = Lexer::new(StrSource::new("'abc'"));
        assert_eq!(
            lex_quoted_string(&mut l, '\'', Strictness::Lenient, "$").unwrap(),
            "abc"
        );
    }
}
