//! Lazy array iteration.

use super::{Cursor, LazyValue};
use crate::{Error, Result};

/// An entered array. `next` is a lending iterator: each element borrows the
/// array until it is consumed or dropped, and dropped elements are skipped
/// automatically before the next sibling is surfaced.
pub struct LazyArray<'c, 'p, 'b> {
    cursor: &'c mut Cursor<'p, 'b>,
    /// Depth inside the container.
    depth: usize,
    first: bool,
    done: bool,
    /// Start position of the last element handed out, until settled.
    pending: Option<usize>,
}

impl<'c, 'p, 'b> LazyArray<'c, 'p, 'b> {
    pub(crate) fn new(cursor: &'c mut Cursor<'p, 'b>) -> Self {
        let depth = cursor.depth;
        LazyArray {
            cursor,
            depth,
            first: true,
            done: false,
            pending: None,
        }
    }

    /// The next element, `None` once the closing bracket is reached.
    pub fn next(&mut self) -> Option<Result<LazyValue<'_, 'p, 'b>>> {
        if self.done {
            return None;
        }
        if let Err(e) = self.cursor.check() {
            self.done = true;
            return Some(Err(e));
        }
        if let Some(start) = self.pending.take() {
            if let Err(e) = self.cursor.settle_child(start, self.depth) {
                self.done = true;
                return Some(Err(e));
            }
        }
        if self.first {
            self.first = false;
            match self.cursor.peek() {
                Some((b']', _)) => {
                    self.cursor.advance();
                    self.done = true;
                    return None;
                }
                Some((b'}' | b',' | b':', _)) | None => {
                    self.done = true;
                    return Some(Err(self.cursor.fail(Error::TapeError)));
                }
                Some(_) => {}
            }
        } else {
            match self.cursor.advance() {
                Some((b',', _)) => {}
                Some((b']', _)) => {
                    self.done = true;
                    return None;
                }
                _ => {
                    self.done = true;
                    return Some(Err(self.cursor.fail(Error::TapeError)));
                }
            }
            // A separator must introduce a value, not a close.
            match self.cursor.peek() {
                Some((b']' | b'}' | b',' | b':', _)) | None => {
                    self.done = true;
                    return Some(Err(self.cursor.fail(Error::TapeError)));
                }
                Some(_) => {}
            }
        }
        self.pending = Some(self.cursor.pos);
        Some(Ok(LazyValue::new(&mut *self.cursor)))
    }

    /// Whether iteration has reached the closing bracket.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.done
    }
}
