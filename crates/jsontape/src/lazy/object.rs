//! Lazy object iteration and ordered field lookup.

use bstr::BStr;

use super::{Cursor, LazyValue};
use crate::{Error, Result};

/// An entered object.
///
/// `find` compares keys against the raw JSON bytes without unescaping, so
/// escaped keys must be looked up in their raw spelling. Lookups are
/// ordered: chained `find` calls only move forward, and a key that sits
/// before the current position is unreachable without re-entering the
/// object. The first matching field wins when keys repeat.
pub struct LazyObject<'c, 'p, 'b> {
    cursor: &'c mut Cursor<'p, 'b>,
    depth: usize,
    first: bool,
    done: bool,
    pending: Option<usize>,
}

/// One field: the raw key and the still-unvisited value.
pub struct LazyField<'c, 'p, 'b> {
    key: &'b [u8],
    /// The field's value handle.
    pub value: LazyValue<'c, 'p, 'b>,
}

impl<'b> LazyField<'_, '_, 'b> {
    /// The key exactly as spelled in the document, escapes included.
    #[must_use]
    pub fn raw_key(&self) -> &'b BStr {
        BStr::new(self.key)
    }

    /// Decodes the key through the string decoder.
    pub fn unescape_key(&mut self) -> Result<&str> {
        let start = self.value.cursor.staging.len();
        match crate::strings::decode_fragment(self.key, self.value.cursor.staging) {
            Ok(()) => {
                let bytes = &self.value.cursor.staging[start..];
                // SAFETY: scanner-validated input decoded by the string
                // decoder is UTF-8 by construction.
                Ok(unsafe { core::str::from_utf8_unchecked(bytes) })
            }
            Err(e) => Err(self.value.cursor.fail(e)),
        }
    }
}

impl<'c, 'p, 'b> LazyObject<'c, 'p, 'b> {
    pub(crate) fn new(cursor: &'c mut Cursor<'p, 'b>) -> Self {
        let depth = cursor.depth;
        LazyObject {
            cursor,
            depth,
            first: true,
            done: false,
            pending: None,
        }
    }

    /// The next field in document order, `None` at the closing brace.
    pub fn next_field(&mut self) -> Option<Result<LazyField<'_, 'p, 'b>>> {
        match self.advance_to_key() {
            Ok(Some(key)) => {
                self.pending = Some(self.cursor.pos);
                Some(Ok(LazyField {
                    key,
                    value: LazyValue::new(&mut *self.cursor),
                }))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }

    /// Ordered lookup: scans forward for `key`, skipping mismatching
    /// fields. `NoSuchField` is reported without poisoning the cursor.
    pub fn find(&mut self, key: &str) -> Result<LazyValue<'_, 'p, 'b>> {
        let wanted = key.as_bytes();
        loop {
            match self.advance_to_key()? {
                None => return Err(Error::NoSuchField),
                Some(raw) if raw == wanted => {
                    self.pending = Some(self.cursor.pos);
                    return Ok(LazyValue::new(&mut *self.cursor));
                }
                Some(_) => {
                    self.cursor.skip_one()?;
                }
            }
        }
    }

    /// Whether iteration has reached the closing brace.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Moves to the next key token; `Ok(None)` at the closing brace. The
    /// returned slice is the raw key without its quotes; the colon has been
    /// consumed, leaving the cursor on the value.
    fn advance_to_key(&mut self) -> Result<Option<&'b [u8]>> {
        if self.done {
            return Ok(None);
        }
        self.cursor.check()?;
        if let Some(start) = self.pending.take() {
            self.cursor.settle_child(start, self.depth)?;
        }
        let key_off = if self.first {
            self.first = false;
            match self.cursor.peek() {
                Some((b'}', _)) => {
                    self.cursor.advance();
                    self.done = true;
                    return Ok(None);
                }
                Some((b'"', off)) => {
                    self.cursor.advance();
                    off
                }
                _ => {
                    self.done = true;
                    return Err(self.cursor.fail(Error::TapeError));
                }
            }
        } else {
            match self.cursor.advance() {
                Some((b'}', _)) => {
                    self.done = true;
                    return Ok(None);
                }
                Some((b',', _)) => match self.cursor.advance() {
                    Some((b'"', off)) => off,
                    _ => {
                        self.done = true;
                        return Err(self.cursor.fail(Error::TapeError));
                    }
                },
                _ => {
                    self.done = true;
                    return Err(self.cursor.fail(Error::TapeError));
                }
            }
        };
        let buf: &'b [u8] = self.cursor.buf;
        let key_end = match super::raw_string_end(buf, key_off) {
            Some(end) => end,
            None => {
                self.done = true;
                return Err(self.cursor.fail(Error::UnclosedString));
            }
        };
        match self.cursor.advance() {
            Some((b':', _)) => {}
            _ => {
                self.done = true;
                return Err(self.cursor.fail(Error::TapeError));
            }
        }
        // The colon must introduce a value, not a close or separator.
        match self.cursor.peek() {
            Some((b'}' | b']' | b',' | b':', _)) | None => {
                self.done = true;
                return Err(self.cursor.fail(Error::TapeError));
            }
            Some(_) => {}
        }
        Ok(Some(&buf[key_off + 1..key_end]))
    }
}
