//! The reader core: the public pull API, coordinating the lexer, scope
//! stack, and path tracker, and implementing the peek/commit discipline
//! that keeps failed coercions non-destructive.

use crate::error::{Error, Result};
use crate::lexer::{Lexeme, Lexer, NonFiniteKind, Peeked};
use crate::path::PathStack;
use crate::scope::{Scope, ScopeStack};
use crate::source::CharSource;
use crate::strictness::Strictness;

const DEFAULT_NESTING_LIMIT: usize = 255;

/// The public token kind returned by [`Reader::peek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name,
    String,
    Number,
    Boolean,
    Null,
    EndDocument,
}

fn kind_of(lexeme: &Lexeme) -> TokenKind {
    match lexeme {
        Lexeme::BeginArray => TokenKind::BeginArray,
        Lexeme::EndArray => TokenKind::EndArray,
        Lexeme::BeginObject => TokenKind::BeginObject,
        Lexeme::EndObject => TokenKind::EndObject,
        Lexeme::Name(_) => TokenKind::Name,
        Lexeme::String(_) => TokenKind::String,
        Lexeme::Number(_) => TokenKind::Number,
        Lexeme::True | Lexeme::False => TokenKind::Boolean,
        Lexeme::Null => TokenKind::Null,
        Lexeme::EndOfDocument => TokenKind::EndDocument,
    }
}

fn parse_integral(text: &str) -> Option<i64> {
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    // Not an exact i64: only accept a fractional literal that is a
    // lossless whole number well inside i64's range, where rounding
    // through f64 cannot silently change the value. An integral-looking
    // literal (no '.'/'e'/'E') that failed the parse above is out of
    // i64's range outright and must not be re-attempted here.
    if !text.contains(['.', 'e', 'E']) {
        return None;
    }
    let f: f64 = text.parse().ok()?;
    if f.fract() != 0.0 || f < -9.007199254740992e15 || f > 9.007199254740992e15 {
        return None;
    }
    Some(f as i64)
}

/// Recognizes a quoted `"NaN"`/`"Infinity"`/`"-Infinity"` string as its
/// non-finite double, for lenient `next_double` parity with the
/// unquoted spellings the lexer already produces as `Lexeme::Number`.
fn non_finite_from_str(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// A pull-based streaming JSON tokenizer with a live JSONPath cursor.
pub struct Reader<S> {
    lexer: Lexer<S>,
    scope: ScopeStack,
    path: PathStack,
    strictness: Strictness,
    nesting_limit: usize,
    peeked: Option<Peeked>,
    document_started: bool,
    closed: bool,
}

impl<S: CharSource> Reader<S> {
    /// A reader over `source` in strict (RFC 8259) mode.
    pub fn new(source: S) -> Self {
        Self::with_strictness(source, Strictness::Strict)
    }

    pub fn with_strictness(source: S, strictness: Strictness) -> Self {
        Self {
            lexer: Lexer::new(source),
            scope: ScopeStack::new(),
            path: PathStack::new(),
            strictness,
            nesting_limit: DEFAULT_NESTING_LIMIT,
            peeked: None,
            document_started: false,
            closed: false,
        }
    }

    pub fn set_nesting_limit(&mut self, limit: usize) {
        self.nesting_limit = limit;
    }

    pub fn path(&self) -> String {
        self.path.path()
    }

    pub fn previous_path(&self) -> String {
        self.path.previous_path()
    }

    /// Releases the reader's buffer and closes its source. Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.scope.close();
            self.peeked = None;
        }
    }

    fn require_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::illegal_state("reader is closed"))
        } else {
            Ok(())
        }
    }

    fn ensure_peeked(&mut self) -> Result<()> {
        if self.peeked.is_none() {
            self.peek()?;
        }
        Ok(())
    }

    /// Returns the kind of the next token without consuming it. Callable
    /// repeatedly; performs no net state change until a value-extracting
    /// call commits it.
    pub fn peek(&mut self) -> Result<TokenKind> {
        self.require_open()?;
        if let Some(p) = &self.peeked {
            return Ok(kind_of(&p.lexeme));
        }

        if !self.document_started {
            let path = self.path.path();
            self.lexer.consume_bom(&path)?;
            if self.strictness.allows_non_execute_prefix() {
                self.lexer.consume_non_execute_prefix(&path)?;
            }
            self.document_started = true;
        }

        let path = self.path.path();
        let peeked = match self.scope.top() {
            Scope::EmptyDocument | Scope::EmptyArray => {
                self.lexer.classify_value(self.strictness, &path)?
            }
            Scope::NonEmptyDocument => {
                if self.strictness.allows_multiple_top_level_values() {
                    self.lexer.classify_value(self.strictness, &path)?
                } else {
                    let candidate = self.lexer.classify_value(self.strictness, &path)?;
                    if !matches!(candidate.lexeme, Lexeme::EndOfDocument) {
                        return Err(Error::malformed_strict(
                            "multiple top-level values",
                            candidate.line,
                            candidate.column,
                            &path,
                        ));
                    }
                    candidate
                }
            }
            Scope::NonEmptyArray => {
                self.consume_array_separator(&path)?;
                self.lexer.classify_value(self.strictness, &path)?
            }
            Scope::EmptyObject => self.lexer.classify_name(self.strictness, &path)?,
            Scope::NonEmptyObject => {
                self.consume_object_separator(&path)?;
                self.lexer.classify_name(self.strictness, &path)?
            }
            Scope::DanglingName => {
                self.consume_name_separator(&path)?;
                self.lexer.classify_value(self.strictness, &path)?
            }
            Scope::Closed => return Err(Error::illegal_state("reader is closed")),
        };

        let kind = kind_of(&peeked.lexeme);
        self.peeked = Some(peeked);
        Ok(kind)
    }

    fn consume_array_separator(&mut self, path: &str) -> Result<()> {
        let (line, column) = (self.lexer.line(), self.lexer.column());
        match self.lexer.peek_non_whitespace(self.strictness, path)? {
            Some(']') => Ok(()),
            Some(',') => {
                self.lexer.match_structural(',', self.strictness, path)?;
                Ok(())
            }
            Some(';') if self.strictness.allows_lenient_separators() => {
                self.lexer.match_structural(';', self.strictness, path)?;
                Ok(())
            }
            _ => Err(Error::malformed(
                "expected ',' between array elements",
                line,
                column,
                path,
            )),
        }
    }

    fn consume_object_separator(&mut self, path: &str) -> Result<()> {
        let (line, column) = (self.lexer.line(), self.lexer.column());
        match self.lexer.peek_non_whitespace(self.strictness, path)? {
            Some('}') => Ok(()),
            Some(',') => {
                self.lexer.match_structural(',', self.strictness, path)?;
                Ok(())
            }
            Some(';') if self.strictness.allows_lenient_separators() => {
                self.lexer.match_structural(';', self.strictness, path)?;
                Ok(())
            }
            _ => Err(Error::malformed(
                "expected ',' between object entries",
                line,
                column,
                path,
            )),
        }
    }

    fn consume_name_separator(&mut self, path: &str) -> Result<()> {
        let (line, column) = (self.lexer.line(), self.lexer.column());
        if self.lexer.match_structural(':', self.strictness, path)? {
            return Ok(());
        }
        if self.strictness.allows_lenient_separators() {
            if self
                .lexer
                .match_structural_str("=>", self.strictness, path)?
            {
                return Ok(());
            }
            if self.lexer.match_structural('=', self.strictness, path)? {
                return Ok(());
            }
        }
        Err(Error::malformed(
            "expected ':' after name",
            line,
            column,
            path,
        ))
    }

    /// Applies the "a value was just consumed" transition to whatever
    /// scope is currently on top, and bumps the innermost array counter
    /// if that scope is an array. For a nested container this runs at
    /// `end_array`/`end_object`, once the container is fully consumed —
    /// not at `begin_array`/`begin_object` — so that `path()` reports
    /// the index of the container while its contents are still being
    /// read.
    fn commit_value_scope_only(&mut self) {
        let in_array = matches!(self.scope.top(), Scope::EmptyArray | Scope::NonEmptyArray);
        self.scope.advance_after_value();
        if in_array {
            self.path.increment_array_counter();
        }
    }

    fn commit_primitive(&mut self) {
        self.commit_value_scope_only();
        self.peeked = None;
    }

    pub fn begin_array(&mut self) -> Result<()> {
        self.ensure_peeked()?;
        let p = self.peeked.as_ref().unwrap();
        if !matches!(p.lexeme, Lexeme::BeginArray) {
            return Err(Error::illegal_state("expected begin_array"));
        }
        if self.scope.container_depth() >= self.nesting_limit {
            let (line, column) = (p.line, p.column);
            let path = self.path.path();
            return Err(Error::malformed(
                format!("Nesting limit {} reached", self.nesting_limit),
                line,
                column,
                &path,
            ));
        }
        self.scope.push(Scope::EmptyArray);
        self.path.push_array();
        self.peeked = None;
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<()> {
        self.ensure_peeked()?;
        match self.peeked.as_ref().unwrap().lexeme {
            Lexeme::EndArray => {
                self.scope.pop();
                self.path.pop();
                self.commit_value_scope_only();
                self.peeked = None;
                Ok(())
            }
            _ => Err(Error::illegal_state("expected end_array")),
        }
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.ensure_peeked()?;
        let p = self.peeked.as_ref().unwrap();
        if !matches!(p.lexeme, Lexeme::BeginObject) {
            return Err(Error::illegal_state("expected begin_object"));
        }
        if self.scope.container_depth() >= self.nesting_limit {
            let (line, column) = (p.line, p.column);
            let path = self.path.path();
            return Err(Error::malformed(
                format!("Nesting limit {} reached", self.nesting_limit),
                line,
                column,
                &path,
            ));
        }
        self.scope.push(Scope::EmptyObject);
        self.path.push_object();
        self.peeked = None;
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.ensure_peeked()?;
        match self.peeked.as_ref().unwrap().lexeme {
            Lexeme::EndObject => {
                self.scope.pop();
                self.path.pop();
                self.commit_value_scope_only();
                self.peeked = None;
                Ok(())
            }
            _ => Err(Error::illegal_state("expected end_object")),
        }
    }

    pub fn next_name(&mut self) -> Result<String> {
        self.ensure_peeked()?;
        match &self.peeked.as_ref().unwrap().lexeme {
            Lexeme::Name(_) => {
                let name = match self.peeked.take().unwrap().lexeme {
                    Lexeme::Name(n) => n,
                    _ => unreachable!(),
                };
                self.scope.set_top(Scope::DanglingName);
                self.path.set_name(name.clone());
                Ok(name)
            }
            _ => Err(Error::illegal_state("expected a name")),
        }
    }

    pub fn next_string(&mut self) -> Result<String> {
        self.ensure_peeked()?;
        let lexeme = self.peeked.as_ref().unwrap().lexeme.clone();
        let rendered = match lexeme {
            Lexeme::String(s) => Some(s),
            Lexeme::Number(n) if self.strictness.allows_unquoted_strings() => Some(n.text),
            Lexeme::True if self.strictness.allows_unquoted_strings() => Some("true".to_string()),
            Lexeme::False if self.strictness.allows_unquoted_strings() => {
                Some("false".to_string())
            }
            Lexeme::Null if self.strictness.allows_unquoted_strings() => Some("null".to_string()),
            _ => None,
        };
        match rendered {
            Some(s) => {
                self.commit_primitive();
                Ok(s)
            }
            None => Err(Error::illegal_state("expected a string")),
        }
    }

    pub fn next_boolean(&mut self) -> Result<bool> {
        self.ensure_peeked()?;
        let value = match self.peeked.as_ref().unwrap().lexeme {
            Lexeme::True => Some(true),
            Lexeme::False => Some(false),
            _ => None,
        };
        match value {
            Some(b) => {
                self.commit_primitive();
                Ok(b)
            }
            None => Err(Error::illegal_state("expected a boolean")),
        }
    }

    pub fn next_null(&mut self) -> Result<()> {
        self.ensure_peeked()?;
        match self.peeked.as_ref().unwrap().lexeme {
            Lexeme::Null => {
                self.commit_primitive();
                Ok(())
            }
            _ => Err(Error::illegal_state("expected null")),
        }
    }

    pub fn next_long(&mut self) -> Result<i64> {
        self.ensure_peeked()?;
        let Peeked {
            lexeme,
            line,
            column,
        } = self.peeked.clone().unwrap();
        let number = match lexeme {
            Lexeme::Number(n) => n,
            _ => return Err(Error::illegal_state("expected a number")),
        };
        let path = self.path.path();
        if number.non_finite.is_some() {
            return Err(Error::number_format(
                "non-finite value has no long representation",
                line,
                column,
                &path,
            ));
        }
        match parse_integral(&number.text) {
            Some(v) => {
                self.commit_primitive();
                Ok(v)
            }
            None => Err(Error::number_format(
                format!("'{}' is not a valid long", number.text),
                line,
                column,
                &path,
            )),
        }
    }

    pub fn next_int(&mut self) -> Result<i32> {
        self.ensure_peeked()?;
        let Peeked {
            lexeme,
            line,
            column,
        } = self.peeked.clone().unwrap();
        let number = match lexeme {
            Lexeme::Number(n) => n,
            _ => return Err(Error::illegal_state("expected a number")),
        };
        let path = self.path.path();
        if number.non_finite.is_some() {
            return Err(Error::number_format(
                "non-finite value has no int representation",
                line,
                column,
                &path,
            ));
        }
        match parse_integral(&number.text) {
            Some(v) if v >= i32::MIN as i64 && v <= i32::MAX as i64 => {
                self.commit_primitive();
                Ok(v as i32)
            }
            Some(_) => Err(Error::number_format(
                format!("'{}' does not fit in a 32-bit integer", number.text),
                line,
                column,
                &path,
            )),
            None => Err(Error::number_format(
                format!("'{}' is not a valid int", number.text),
                line,
                column,
                &path,
            )),
        }
    }

    pub fn next_double(&mut self) -> Result<f64> {
        self.ensure_peeked()?;
        let Peeked {
            lexeme,
            line,
            column,
        } = self.peeked.clone().unwrap();
        let number = match lexeme {
            Lexeme::Number(n) => n,
            Lexeme::String(s) if self.strictness.allows_non_finite_numbers() => {
                return match non_finite_from_str(&s) {
                    Some(v) => {
                        self.commit_primitive();
                        Ok(v)
                    }
                    None => Err(Error::illegal_state("expected a number")),
                };
            }
            _ => return Err(Error::illegal_state("expected a number")),
        };
        if let Some(kind) = number.non_finite {
            let v = match kind {
                NonFiniteKind::NaN => f64::NAN,
                NonFiniteKind::Infinity => f64::INFINITY,
                NonFiniteKind::NegInfinity => f64::NEG_INFINITY,
            };
            self.commit_primitive();
            return Ok(v);
        }
        match number.text.parse::<f64>() {
            Ok(v) => {
                self.commit_primitive();
                Ok(v)
            }
            Err(_) => {
                let path = self.path.path();
                Err(Error::number_format(
                    format!("'{}' is not a valid double", number.text),
                    line,
                    column,
                    &path,
                ))
            }
        }
    }

    pub fn has_next(&mut self) -> Result<bool> {
        self.ensure_peeked()?;
        Ok(!matches!(
            self.peeked.as_ref().unwrap().lexeme,
            Lexeme::EndArray | Lexeme::EndObject | Lexeme::EndOfDocument
        ))
    }

    fn skip_name(&mut self) -> Result<()> {
        self.next_name()?;
        self.path.set_skipped_name();
        Ok(())
    }

    /// Consumes exactly one logical "next thing": a value at array/
    /// document scope, or a name-value pair at object scope (the name
    /// is recorded in the path as the `null` placeholder, matching the
    /// same compatibility behavior as an explicitly read-then-discarded
    /// name).
    pub fn skip_value(&mut self) -> Result<()> {
        if matches!(self.scope.top(), Scope::EmptyObject | Scope::NonEmptyObject) {
            self.skip_name()?;
        }
        self.skip_current_value()
    }

    fn skip_current_value(&mut self) -> Result<()> {
        self.ensure_peeked()?;
        match self.peeked.as_ref().unwrap().lexeme.clone() {
            Lexeme::BeginArray => {
                self.begin_array()?;
                while self.has_next()? {
                    self.skip_current_value()?;
                }
                self.end_array()
            }
            Lexeme::BeginObject => {
                self.begin_object()?;
                while self.has_next()? {
                    self.skip_name()?;
                    self.skip_current_value()?;
                }
                self.end_object()
            }
            Lexeme::String(_) | Lexeme::Number(_) | Lexeme::True | Lexeme::False | Lexeme::Null => {
                self.commit_primitive();
                Ok(())
            }
            Lexeme::Name(_) => unreachable!("skip_current_value is only reached in value position"),
            Lexeme::EndArray | Lexeme::EndObject | Lexeme::EndOfDocument => {
                Err(Error::illegal_state("no value to skip"))
            }
        }
    }
}
