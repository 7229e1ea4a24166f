//! The on-demand surface: navigate the structural stream, decode on visit.
//!
//! Only stage 1 runs up front. A [`Cursor`] walks the offset stream
//! forward; values, arrays, objects and fields are thin handles holding an
//! exclusive borrow of it, so at any instant exactly one handle chain is
//! live. Creating a child suspends the parent and dropping the child
//! resumes it, checked at compile time rather than at run time.
//!
//! Skipping is deliberately shallow: abandoning a half-read container walks
//! to its matching close by brace balance alone, without validating the
//! scalars it hops over. That is the documented trade for not touching
//! unvisited bytes.
//!
//! The first error observed poisons the cursor: every subsequent
//! navigation reports it again, so a caller may chain without checking and
//! inspect one terminal error at the end.

mod array;
mod object;
mod value;

pub use array::LazyArray;
pub use object::{LazyField, LazyObject};
pub use value::LazyValue;

use alloc::vec::Vec;

use crate::{Error, Result};

/// Forward-only position over the structural stream.
pub(crate) struct Cursor<'p, 'b> {
    pub(crate) buf: &'b [u8],
    /// Offsets including the sentinel (not the guard).
    structurals: &'p [u32],
    pub(crate) pos: usize,
    pub(crate) depth: usize,
    pub(crate) staging: &'p mut Vec<u8>,
    error: Option<Error>,
}

impl<'p, 'b> Cursor<'p, 'b> {
    /// Latches `e` if nothing is latched yet; returns the ruling error.
    pub(crate) fn fail(&mut self, e: Error) -> Error {
        *self.error.get_or_insert(e)
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Byte and offset of the next token; `None` at the sentinel.
    pub(crate) fn peek(&self) -> Option<(u8, usize)> {
        if self.pos + 1 >= self.structurals.len() {
            return None;
        }
        let off = self.structurals[self.pos] as usize;
        Some((self.buf[off], off))
    }

    /// Consumes the next token, tracking container depth.
    pub(crate) fn advance(&mut self) -> Option<(u8, usize)> {
        let token = self.peek()?;
        self.pos += 1;
        match token.0 {
            b'{' | b'[' => self.depth += 1,
            b'}' | b']' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Some(token)
    }

    /// Skips exactly one value (scalar or whole container) by brace
    /// balance.
    pub(crate) fn skip_one(&mut self) -> Result<()> {
        let floor = self.depth;
        if self.advance().is_none() {
            return Err(self.fail(Error::TapeError));
        }
        self.skip_to_depth(floor)
    }

    /// Walks forward until the depth drops back to `target`.
    pub(crate) fn skip_to_depth(&mut self, target: usize) -> Result<()> {
        while self.depth > target {
            if self.advance().is_none() {
                return Err(self.fail(Error::TapeError));
            }
        }
        Ok(())
    }

    /// Brings the cursor back to a container boundary after a child handle
    /// was dropped in an arbitrary state. `start` is where the child's
    /// value began; `container_depth` is the depth inside the container.
    pub(crate) fn settle_child(&mut self, start: usize, container_depth: usize) -> Result<()> {
        if self.pos == start && self.depth == container_depth {
            // Never touched: hop over the whole value.
            self.skip_one()
        } else {
            // Touched: either fully consumed (no-op) or abandoned inside.
            self.skip_to_depth(container_depth)
        }
    }

    /// Whether every token except the sentinel has been consumed.
    pub(crate) fn at_sentinel(&self) -> bool {
        self.pos == self.structurals.len() - 1
    }
}

/// Offset of the closing quote of the string opening at `start`, skipping
/// escape pairs.
pub(crate) fn raw_string_end(buf: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < buf.len() {
        match buf[i] {
            b'"' => return Some(i),
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    None
}

/// A lazily parsed document; hand out the root with [`LazyDocument::value`].
pub struct LazyDocument<'p, 'b> {
    cursor: Cursor<'p, 'b>,
}

impl<'p, 'b> LazyDocument<'p, 'b> {
    pub(crate) fn new(buf: &'b [u8], structurals: &'p [u32], staging: &'p mut Vec<u8>) -> Self {
        LazyDocument {
            cursor: Cursor {
                buf,
                structurals,
                pos: 0,
                depth: 0,
                staging,
                error: None,
            },
        }
    }

    /// The root value. Call once; navigating the returned handle advances
    /// the document.
    pub fn value(&mut self) -> Result<LazyValue<'_, 'p, 'b>> {
        self.cursor.check()?;
        Ok(LazyValue::new(&mut self.cursor))
    }

    /// Skips whatever remains of the root value and verifies the document
    /// ends at the EOF sentinel.
    pub fn finish(&mut self) -> Result<()> {
        self.cursor.check()?;
        if self.cursor.pos == 0 {
            self.cursor.skip_one()?;
        } else {
            self.cursor.skip_to_depth(0)?;
        }
        if !self.cursor.at_sentinel() {
            return Err(self.cursor.fail(Error::TapeError));
        }
        Ok(())
    }

    /// The latched error, if any navigation failed.
    #[must_use]
    pub fn error(&self) -> Option<Error> {
        self.cursor.error
    }
}

#[cfg(test)]
mod tests;
