//! Chunked input buffer over a [`CharSource`].
//!
//! A window that refills from a possibly-blocking source and shifts its
//! residual left when it runs low, exposing the same per-character API
//! (`current_char`/`peek_char`/`advance`/`is_at_end`/`match_char`) a
//! whole-string cursor would. There is no snapshot/restore: the grammar
//! never needs to backtrack past an already-consumed character, so every
//! lex routine either look-aheads non-destructively via `peek_char` or
//! accumulates consumed characters into an owned `String` as it
//! advances.

use std::io;

use crate::source::CharSource;

/// Nominal initial capacity; grows only if a caller ever asks for more
/// look-ahead than this in one `fill` call (never happens for JSON's
/// small fixed look-aheads).
const DEFAULT_CAPACITY: usize = 1024;

pub(crate) struct Buffer<S> {
    source: S,
    data: Vec<char>,
    /// Index of the next character to read.
    pos: usize,
    /// One past the last valid character in `data`.
    limit: usize,
    /// 1-based current line.
    line: u64,
    /// Buffer offset (may be negative after a shift) of column 1 on
    /// the current line.
    line_start: i64,
    source_eof: bool,
}

impl<S: CharSource> Buffer<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            data: vec!['\0'; DEFAULT_CAPACITY],
            pos: 0,
            limit: 0,
            line: 1,
            line_start: 0,
            source_eof: false,
        }
    }

    /// Ensures at least `min_chars` characters are available starting
    /// at `pos`, shifting the residual to offset 0 and reading more if
    /// necessary. Returns `false` only when the source is exhausted and
    /// fewer than `min_chars` remain.
    pub(crate) fn fill(&mut self, min_chars: usize) -> io::Result<bool> {
        if self.limit - self.pos >= min_chars {
            return Ok(true);
        }
        if self.source_eof {
            return Ok(self.limit - self.pos >= min_chars);
        }

        if self.pos > 0 {
            let residual = self.limit - self.pos;
            self.data.copy_within(self.pos..self.limit, 0);
            self.line_start -= self.pos as i64;
            self.pos = 0;
            self.limit = residual;
        }

        if min_chars > self.data.len() {
            let new_cap = min_chars.max(self.data.len() * 2);
            self.data.resize(new_cap, '\0');
        }

        while self.limit - self.pos < min_chars && !self.source_eof {
            let n = self.source.read_chars(&mut self.data[self.limit..])?;
            if n == 0 {
                self.source_eof = true;
                break;
            }
            self.limit += n;
        }

        Ok(self.limit - self.pos >= min_chars)
    }

    /// Non-destructive look-ahead; `offset` 0 is the next character to
    /// be consumed.
    pub(crate) fn peek_char(&mut self, offset: usize) -> io::Result<Option<char>> {
        self.fill(offset + 1)?;
        if self.pos + offset < self.limit {
            Ok(Some(self.data[self.pos + offset]))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn current_char(&mut self) -> io::Result<Option<char>> {
        self.peek_char(0)
    }

    pub(crate) fn is_at_end(&mut self) -> io::Result<bool> {
        Ok(self.current_char()?.is_none())
    }

    /// Consumes and returns the next character, updating line/column
    /// bookkeeping.
    pub(crate) fn advance(&mut self) -> io::Result<Option<char>> {
        match self.current_char()? {
            Some(c) => {
                self.pos += 1;
                if c == '\n' {
                    self.line += 1;
                    self.line_start = self.pos as i64;
                }
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    /// Consumes `expected` if it is next; returns whether it matched.
    pub(crate) fn match_char(&mut self, expected: char) -> io::Result<bool> {
        if self.current_char()? == Some(expected) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 1-based current line.
    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    /// 1-based current column (of the next character to be consumed).
    pub(crate) fn column(&self) -> u64 {
        (self.pos as i64 - self.line_start + 1).max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StrSource;

    fn buffer(s: &str) -> Buffer<StrSource<'_>> {
        Buffer::new(StrSource::new(s))
    }

    #[test]
    fn reads_characters_in_order() {
        let mut buf = buffer("abc");
        assert_eq!(buf.advance().unwrap(), Some('a'));
        assert_eq!(buf.advance().unwrap(), Some('b'));
        assert_eq!(buf.advance().unwrap(), Some('c'));
        assert_eq!(buf.advance().unwrap(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut buf = buffer("xy");
        assert_eq!(buf.peek_char(0).unwrap(), Some('x'));
        assert_eq!(buf.peek_char(1).unwrap(), Some('y'));
        assert_eq!(buf.peek_char(0).unwrap(), Some('x'));
        assert_eq!(buf.advance().unwrap(), Some('x'));
    }

    #[test]
    fn line_and_column_track_newlines() {
        let mut buf = buffer("ab\ncd");
        assert_eq!((buf.line(), buf.column()), (1, 1));
        buf.advance().unwrap();
        assert_eq!((buf.line(), buf.column()), (1, 2));
        buf.advance().unwrap();
        assert_eq!((buf.line(), buf.column()), (1, 3));
        buf.advance().unwrap(); // consume '\n'
        assert_eq!((buf.line(), buf.column()), (2, 1));
        buf.advance().unwrap();
        assert_eq!((buf.line(), buf.column()), (2, 2));
    }

    #[test]
    fn shifting_preserves_absolute_column() {
        // Force many small fills by requesting 1 char at a time past a
        // buffer far smaller than the input, to exercise the shift path.
        let long = "x".repeat(5000) + "\nY";
        let mut buf: Buffer<StrSource> = Buffer::new(StrSource::new(&long));
        for _ in 0..5000 {
            buf.advance().unwrap();
        }
        assert_eq!(buf.line(), 1);
        assert_eq!(buf.column(), 5001);
        buf.advance().unwrap(); // consume '\n'
        assert_eq!((buf.line(), buf.column()), (2, 1));
        assert_eq!(buf.advance().unwrap(), Some('Y'));
    }

    #[test]
    fn match_char_consumes_only_on_match() {
        let mut buf = buffer("=>");
        assert!(buf.match_char('=').unwrap());
        assert!(!buf.match_char('=').unwrap());
        assert!(buf.match_char('>').unwrap());
        assert!(buf.is_at_end().unwrap());
    }
}
