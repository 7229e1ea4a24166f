//! A single unvisited value.

use bstr::BStr;

use super::{Cursor, LazyArray, LazyObject};
use crate::{Error, Kind, Result, atoms, number};

/// Handle on the value the cursor is parked on.
///
/// Scalar getters consume the value; `get_array`/`get_object` consume the
/// handle and return the container. Type mismatches (`IncorrectType`) do
/// not consume and do not poison, so a caller may probe getters in turn;
/// malformed content does poison.
pub struct LazyValue<'c, 'p, 'b> {
    pub(crate) cursor: &'c mut Cursor<'p, 'b>,
}

impl<'c, 'p, 'b> LazyValue<'c, 'p, 'b> {
    pub(crate) fn new(cursor: &'c mut Cursor<'p, 'b>) -> Self {
        LazyValue { cursor }
    }

    /// Best-effort kind from the leading byte, without parsing. Numbers
    /// always report [`Kind::F64`]; parse to learn the exact width.
    #[must_use]
    pub fn kind_hint(&self) -> Option<Kind> {
        match self.cursor.peek()? {
            (b'{', _) => Some(Kind::Object),
            (b'[', _) => Some(Kind::Array),
            (b'"', _) => Some(Kind::String),
            (b't' | b'f', _) => Some(Kind::Bool),
            (b'n', _) => Some(Kind::Null),
            (b'-' | b'0'..=b'9', _) => Some(Kind::F64),
            _ => None,
        }
    }

    /// `true`/`false`.
    pub fn get_bool(&mut self) -> Result<bool> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b't', off)) => match atoms::parse_true(&self.cursor.buf[off..]) {
                Ok(()) => {
                    self.cursor.advance();
                    Ok(true)
                }
                Err(e) => Err(self.cursor.fail(e)),
            },
            Some((b'f', off)) => match atoms::parse_false(&self.cursor.buf[off..]) {
                Ok(()) => {
                    self.cursor.advance();
                    Ok(false)
                }
                Err(e) => Err(self.cursor.fail(e)),
            },
            Some(_) => Err(Error::IncorrectType),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }

    /// Consumes a `null`, or reports `false` without moving.
    pub fn is_null(&mut self) -> Result<bool> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b'n', off)) => match atoms::parse_null(&self.cursor.buf[off..]) {
                Ok(()) => {
                    self.cursor.advance();
                    Ok(true)
                }
                Err(e) => Err(self.cursor.fail(e)),
            },
            Some(_) => Ok(false),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }

    /// A signed integer.
    pub fn get_i64(&mut self) -> Result<i64> {
        self.number(number::parse_i64)
    }

    /// An unsigned integer (non-negative signed spellings included).
    pub fn get_u64(&mut self) -> Result<u64> {
        self.number(number::parse_u64)
    }

    /// Any number, widened to f64.
    pub fn get_f64(&mut self) -> Result<f64> {
        self.number(number::parse_f64)
    }

    fn number<T>(&mut self, parse: impl Fn(&[u8]) -> Result<T>) -> Result<T> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b'-' | b'0'..=b'9', off)) => match parse(&self.cursor.buf[off..]) {
                Ok(v) => {
                    self.cursor.advance();
                    Ok(v)
                }
                // A wrong width is recoverable; malformed content is not.
                Err(Error::IncorrectType) => Err(Error::IncorrectType),
                Err(e) => Err(self.cursor.fail(e)),
            },
            Some(_) => Err(Error::IncorrectType),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }

    /// Decodes the string into the parser's staging area. The returned
    /// slice lives as long as this borrow of the value.
    pub fn get_str(&mut self) -> Result<&str> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b'"', off)) => {
                let start = self.cursor.staging.len();
                match crate::strings::decode(&self.cursor.buf[off + 1..], self.cursor.staging) {
                    Ok(_) => {
                        self.cursor.advance();
                        let bytes = &self.cursor.staging[start..];
                        // SAFETY: scanner-validated input decoded by the
                        // string decoder is UTF-8 by construction.
                        Ok(unsafe { core::str::from_utf8_unchecked(bytes) })
                    }
                    Err(e) => Err(self.cursor.fail(e)),
                }
            }
            Some(_) => Err(Error::IncorrectType),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }

    /// The raw bytes of a string value, escapes untouched, quotes
    /// stripped. Consumes the value without running the string decoder;
    /// pair this with [`LazyObject::find`]-style raw comparisons.
    pub fn get_raw_str(&mut self) -> Result<&'b BStr> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b'"', off)) => {
                let buf: &'b [u8] = self.cursor.buf;
                match super::raw_string_end(buf, off) {
                    Some(end) => {
                        self.cursor.advance();
                        Ok(BStr::new(&buf[off + 1..end]))
                    }
                    None => Err(self.cursor.fail(Error::UnclosedString)),
                }
            }
            Some(_) => Err(Error::IncorrectType),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }

    /// Enters an array.
    pub fn get_array(self) -> Result<LazyArray<'c, 'p, 'b>> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b'[', _)) => {
                self.cursor.advance();
                Ok(LazyArray::new(self.cursor))
            }
            Some(_) => Err(Error::IncorrectType),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }

    /// Enters an object.
    pub fn get_object(self) -> Result<LazyObject<'c, 'p, 'b>> {
        self.cursor.check()?;
        match self.cursor.peek() {
            Some((b'{', _)) => {
                self.cursor.advance();
                Ok(LazyObject::new(self.cursor))
            }
            Some(_) => Err(Error::IncorrectType),
            None => Err(self.cursor.fail(Error::TapeError)),
        }
    }
}
