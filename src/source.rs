//! The character source capability: the only seam between the reader's
//! internals and wherever the bytes actually come from.
//!
//! A [`CharSource`] is anything that can fill a `&mut [char]` slice and
//! report how many characters it produced; `0` means end-of-stream. The
//! buffer never asks for backward seeks, so this is the entire contract.

use std::collections::VecDeque;
use std::io::{self, Read};

/// Minimal capability a character source must provide.
pub trait CharSource {
    /// Fill as much of `buf` as there is input for, returning the count
    /// written. Returns `Ok(0)` only at true end-of-stream.
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize>;
}

/// A source over an in-memory string slice. The common case: tests,
/// small request/response bodies, anything already fully buffered.
pub struct StrSource<'a> {
    remaining: std::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            remaining: source.chars(),
        }
    }
}

impl<'a> CharSource for StrSource<'a> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.remaining.next() {
                Some(c) => {
                    buf[n] = c;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

/// A source that incrementally UTF-8-decodes an arbitrary byte reader
/// (files, sockets, anything blocking). Handles multi-byte sequences
/// that straddle a single `read` call.
pub struct ReadSource<R> {
    inner: R,
    raw: Box<[u8]>,
    /// Bytes read from `inner` but not yet decoded (a trailing partial
    /// UTF-8 sequence carried over from the previous fill).
    leftover: Vec<u8>,
    /// Decoded characters not yet handed to the caller, because the
    /// caller's buffer was shorter than what one `read` produced.
    pending: VecDeque<char>,
    eof: bool,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_raw_capacity(inner, 4096)
    }

    pub fn with_raw_capacity(inner: R, raw_capacity: usize) -> Self {
        Self {
            inner,
            raw: vec![0u8; raw_capacity.max(4)].into_boxed_slice(),
            leftover: Vec::new(),
            pending: VecDeque::new(),
            eof: false,
        }
    }

    fn fill_pending(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() || self.eof {
            return Ok(());
        }
        loop {
            let read = self.inner.read(&mut self.raw)?;
            if read == 0 {
                if !self.leftover.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "truncated UTF-8 sequence at end of input",
                    ));
                }
                self.eof = true;
                return Ok(());
            }

            let mut chunk = std::mem::take(&mut self.leftover);
            chunk.extend_from_slice(&self.raw[..read]);

            match std::str::from_utf8(&chunk) {
                Ok(text) => {
                    self.pending.extend(text.chars());
                    return Ok(());
                }
                Err(e) => {
                    let valid_len = e.valid_up_to();
                    let text = std::str::from_utf8(&chunk[..valid_len])
                        .expect("valid_up_to prefix is always valid UTF-8");
                    self.pending.extend(text.chars());

                    match e.error_len() {
                        // Invalid byte sequence, not just truncated.
                        Some(_) => {
                            return Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                "invalid UTF-8 byte sequence",
                            ));
                        }
                        // Truncated multi-byte sequence at the chunk's
                        // tail; carry it over and read more.
                        None => {
                            self.leftover = chunk[valid_len..].to_vec();
                            if !self.pending.is_empty() {
                                return Ok(());
                            }
                            // No full characters decoded yet; loop and
                            // read more bytes to complete the sequence.
                        }
                    }
                }
            }
        }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn read_chars(&mut self, buf: &mut [char]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            if self.pending.is_empty() {
                self.fill_pending()?;
                if self.pending.is_empty() {
                    break; // true EOF
                }
            }
            while n < buf.len() {
                match self.pending.pop_front() {
                    Some(c) => {
                        buf[n] = c;
                        n += 1;
                    }
                    None => break,
                }
            }
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_source_yields_all_chars() {
        let mut src = StrSource::new("héllo");
        let mut buf = vec!['\0'; 10];
        let n = src.read_chars(&mut buf).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf[..n], &['h', 'é', 'l', 'l', 'o']);
    }

    #[test]
    fn str_source_reports_eof() {
        let mut src = StrSource::new("");
        let mut buf = vec!['\0'; 4];
        assert_eq!(src.read_chars(&mut buf).unwrap(), 0);
    }

    #[test]
    fn read_source_decodes_ascii() {
        let mut src = ReadSource::new("hello world".as_bytes());
        let mut out = String::new();
        let mut buf = vec!['\0'; 4];
        loop {
            let n = src.read_chars(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend(&buf[..n]);
        }
        assert_eq!(out, "hello world");
    }

    #[test]
    fn read_source_decodes_multibyte_split_across_reads() {
        // "é" is 2 bytes (0xC3 0xA9); force a 1-byte raw read so the
        // sequence straddles two inner `read` calls.
        let bytes = "a\u{e9}b".as_bytes().to_vec(); // a é b
        let mut src = ReadSource::with_raw_capacity(&bytes[..], 1);
        let mut out = String::new();
        let mut buf = vec!['\0'; 1];
        loop {
            let n = src.read_chars(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend(&buf[..n]);
        }
        assert_eq!(out, "a\u{e9}b");
    }

    #[test]
    fn read_source_rejects_truncated_trailing_sequence() {
        let bytes: Vec<u8> = vec![0xC3]; // half of "é"
        let mut src = ReadSource::new(&bytes[..]);
        let mut buf = vec!['\0'; 4];
        let err = src.read_chars(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
