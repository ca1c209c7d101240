//! Whitespace and comment skipping.

use crate::error::{Error, Result};
use crate::lexer::core::Lexer;
use crate::source::CharSource;
use crate::strictness::Strictness;

pub(crate) fn skip_whitespace_and_comments<S: CharSource>(
    lexer: &mut Lexer<S>,
    strictness: Strictness,
    path: &str,
) -> Result<()> {
    loop {
        match lexer.peek_char(path)? {
            Some(c) if c.is_whitespace() => {
                lexer.advance_char(path)?;
            }
            Some('/') if strictness.allows_comments() => {
                if lexer.peek_char_at(1, path)? == Some('/') {
                    skip_line_comment(lexer, path)?;
                } else if lexer.peek_char_at(1, path)? == Some('*') {
                    skip_block_comment(lexer, strictness, path)?;
                } else {
                    break;
                }
            }
            Some('/') => {
                let (line, column) = (lexer.line(), lexer.column());
                return Err(Error::malformed_strict(
                    "comments are not permitted",
                    line,
                    column,
                    path,
                ));
            }
            Some('#') if strictness.allows_comments() => {
                skip_line_comment(lexer, path)?;
            }
            Some('#') => {
                let (line, column) = (lexer.line(), lexer.column());
                return Err(Error::malformed_strict(
                    "comments are not permitted",
                    line,
                    column,
                    path,
                ));
            }
            _ => break,
        }
    }
    Ok(())
}

fn skip_line_comment<S: CharSource>(lexer: &mut Lexer<S>, path: &str) -> Result<()> {
    loop {
        match lexer.peek_char(path)? {
            None => return Ok(()),
            Some('\n') => return Ok(()),
            Some('\r') => return Ok(()),
            _ => {
                lexer.advance_char(path)?;
            }
        }
    }
}

fn skip_block_comment<S: CharSource>(
    lexer: &mut Lexer<S>,
    _strictness: Strictness,
    path: &str,
) -> Result<()> {
    let (line, column) = (lexer.line(), lexer.column());
    lexer.advance_char(path)?; // '/'
    lexer.advance_char(path)?; // '*'
    loop {
        match lexer.peek_char(path)? {
            None => {
                return Err(Error::malformed(
                    "unterminated block comment",
                    line,
                    column,
                    path,
                ))
            }
            Some('*') => {
                lexer.advance_char(path)?;
                if lexer.match_char('/', path)? {
                    return Ok(());
                }
            }
            _ => {
                lexer.advance_char(path)?;
            }
        }
    }
}
