//! A pull-based streaming JSON tokenizer.
//!
//! [`Reader`] consumes a character stream and exposes a JSON document as
//! a forward-only sequence of lexical tokens — array/object delimiters,
//! object names, and primitive values — rather than materializing a
//! tree. The caller drives the cursor one token at a time and decides
//! how to interpret each value; [`Reader::path`] reports the cursor's
//! current position as a JSONPath string at any time, which makes error
//! messages and ad hoc navigation practical even for documents far too
//! large to hold in memory as a tree.
//!
//! Three things make this more than a thin wrapper over a one-token-at-
//! a-time loop:
//!
//! - [`Strictness`] controls a well-defined lenient superset of RFC 8259
//!   (comments, unquoted and single-quoted strings, non-finite numbers,
//!   multiple top-level values, and more) without turning the grammar
//!   into a second, incompatible dialect.
//! - `peek`/`next_*` follow a strict peek-then-commit discipline: a
//!   failed coercion (asking for an `i32` when the value doesn't fit)
//!   never advances the cursor, so the caller can retry with a
//!   different extraction method.
//! - The path tracker and scope stack are maintained incrementally and
//!   cheaply as the cursor moves, with byte-exact line/column reporting
//!   preserved across internal buffer refills.
//!
//! ```
//! use jscan::{Reader, StrSource};
//!
//! let mut reader = Reader::new(StrSource::new(r#"{"a":[1,2,3]}"#));
//! reader.begin_object().unwrap();
//! assert_eq!(reader.next_name().unwrap(), "a");
//! reader.begin_array().unwrap();
//! let mut sum = 0i64;
//! while reader.has_next().unwrap() {
//!     sum += reader.next_long().unwrap();
//! }
//! reader.end_array().unwrap();
//! reader.end_object().unwrap();
//! assert_eq!(sum, 6);
//! ```

mod buffer;
mod error;
mod lexer;
mod path;
mod reader;
mod scope;
mod source;
mod strictness;

pub use error::{Error, Result};
pub use reader::{Reader, TokenKind};
pub use source::{CharSource, ReadSource, StrSource};
pub use strictness::Strictness;
