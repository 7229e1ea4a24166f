//! Stage 2, eager mode: the structural walk that builds the tape.
//!
//! The walker consumes the stage-1 offset stream in order and drives an
//! explicit state machine over the JSON grammar:
//!
//! ```text
//! root        → value EOF
//! value       → '{' object_body | '[' array_body | scalar
//! object_body → '}' | string ':' value (',' string ':' value)* '}'
//! array_body  → ']' | value (',' value)* ']'
//! ```
//!
//! Open containers live on an explicit scope stack (never the host call
//! stack: document depth is capped by configuration, not by recursion), and
//! each close back-patches its matching open word. Scalars dispatch to the
//! number, string, and atom parsers; any grammar violation aborts the walk
//! with `TapeError` immediately.

use alloc::vec::Vec;

use crate::{
    Error, Result, atoms, number,
    number::Number,
    strings,
    tape::{Tag, word},
};

/// One open container: where its open word sits, and which close it wants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope {
    tape_index: usize,
    is_array: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ObjectBegin,
    ObjectField,
    ObjectContinue,
    ArrayBegin,
    ArrayValue,
    ArrayContinue,
    ScopeEnd,
}

/// Builds the tape and string heap for `buf` from the structural stream
/// (`structurals` includes the sentinel, not the guard).
pub(crate) fn build_tape(
    buf: &[u8],
    structurals: &[u32],
    tape: &mut Vec<u64>,
    strings: &mut Vec<u8>,
    scopes: &mut Vec<Scope>,
    max_depth: usize,
) -> Result<()> {
    tape.clear();
    strings.clear();
    scopes.clear();
    let mut walker = Walker {
        buf,
        structurals,
        pos: 0,
        tape,
        strings,
        scopes,
        max_depth,
    };
    walker.run()?;
    trace_event!("stage 2: {} tape words", tape.len());
    Ok(())
}

struct Walker<'a> {
    buf: &'a [u8],
    structurals: &'a [u32],
    pos: usize,
    tape: &'a mut Vec<u64>,
    strings: &'a mut Vec<u8>,
    scopes: &'a mut Vec<Scope>,
    max_depth: usize,
}

impl Walker<'_> {
    fn run(&mut self) -> Result<()> {
        // Slot 0 is the root word, patched at the end.
        self.tape.push(0);
        self.scopes.push(Scope {
            tape_index: 0,
            is_array: false,
        });

        let (first, off) = self.advance().ok_or(Error::TapeError)?;
        let mut state = match first {
            b'{' => {
                self.open_scope(false)?;
                State::ObjectBegin
            }
            b'[' => {
                self.open_scope(true)?;
                State::ArrayBegin
            }
            _ => {
                self.append_scalar(first, off)?;
                return self.finish();
            }
        };

        loop {
            state = match state {
                State::ObjectBegin => match self.advance() {
                    Some((b'"', off)) => {
                        self.append_key(off)?;
                        State::ObjectField
                    }
                    Some((b'}', _)) => State::ScopeEnd,
                    _ => return Err(Error::TapeError),
                },
                State::ObjectField => {
                    match self.advance() {
                        Some((b':', _)) => {}
                        _ => return Err(Error::TapeError),
                    }
                    let (b, off) = self.advance().ok_or(Error::TapeError)?;
                    self.value(b, off, State::ObjectContinue)?
                }
                State::ObjectContinue => match self.advance() {
                    Some((b',', _)) => match self.advance() {
                        Some((b'"', off)) => {
                            self.append_key(off)?;
                            State::ObjectField
                        }
                        _ => return Err(Error::TapeError),
                    },
                    Some((b'}', _)) => State::ScopeEnd,
                    _ => return Err(Error::TapeError),
                },
                State::ArrayBegin => match self.advance() {
                    Some((b']', _)) => State::ScopeEnd,
                    Some((b, off)) => self.value(b, off, State::ArrayContinue)?,
                    None => return Err(Error::TapeError),
                },
                State::ArrayValue => {
                    let (b, off) = self.advance().ok_or(Error::TapeError)?;
                    self.value(b, off, State::ArrayContinue)?
                }
                State::ArrayContinue => match self.advance() {
                    Some((b',', _)) => State::ArrayValue,
                    Some((b']', _)) => State::ScopeEnd,
                    _ => return Err(Error::TapeError),
                },
                State::ScopeEnd => {
                    self.close_scope();
                    if self.scopes.len() == 1 {
                        return self.finish();
                    }
                    let parent = self.scopes[self.scopes.len() - 1];
                    if parent.is_array {
                        State::ArrayContinue
                    } else {
                        State::ObjectContinue
                    }
                }
            };
        }
    }

    /// Next structural byte and offset; `None` at the sentinel.
    #[inline]
    fn advance(&mut self) -> Option<(u8, usize)> {
        if self.pos + 1 >= self.structurals.len() {
            return None;
        }
        let off = self.structurals[self.pos] as usize;
        self.pos += 1;
        Some((self.buf[off], off))
    }

    /// Dispatches a value token: containers open a scope, scalars append.
    fn value(&mut self, b: u8, off: usize, after_scalar: State) -> Result<State> {
        match b {
            b'{' => {
                self.open_scope(false)?;
                Ok(State::ObjectBegin)
            }
            b'[' => {
                self.open_scope(true)?;
                Ok(State::ArrayBegin)
            }
            _ => {
                self.append_scalar(b, off)?;
                Ok(after_scalar)
            }
        }
    }

    fn open_scope(&mut self, is_array: bool) -> Result<()> {
        if self.scopes.len() > self.max_depth {
            return Err(Error::DepthError);
        }
        self.scopes.push(Scope {
            tape_index: self.tape.len(),
            is_array,
        });
        self.tape.push(0);
        Ok(())
    }

    fn close_scope(&mut self) {
        let scope = self.scopes.pop().unwrap_or(Scope {
            tape_index: 0,
            is_array: false,
        });
        let close_index = self.tape.len();
        let (open, close) = if scope.is_array {
            (Tag::ArrayOpen, Tag::ArrayClose)
        } else {
            (Tag::ObjectOpen, Tag::ObjectClose)
        };
        self.tape.push(word(close, scope.tape_index as u64));
        self.tape[scope.tape_index] = word(open, close_index as u64);
    }

    fn append_key(&mut self, off: usize) -> Result<()> {
        let payload = append_heap_string(&self.buf[off + 1..], self.strings)?;
        self.tape.push(word(Tag::Str, payload));
        Ok(())
    }

    fn append_scalar(&mut self, b: u8, off: usize) -> Result<()> {
        match b {
            b'"' => {
                let payload = append_heap_string(&self.buf[off + 1..], self.strings)?;
                self.tape.push(word(Tag::Str, payload));
            }
            b't' => {
                atoms::parse_true(&self.buf[off..])?;
                self.tape.push(word(Tag::True, 0));
            }
            b'f' => {
                atoms::parse_false(&self.buf[off..])?;
                self.tape.push(word(Tag::False, 0));
            }
            b'n' => {
                atoms::parse_null(&self.buf[off..])?;
                self.tape.push(word(Tag::Null, 0));
            }
            b'-' | b'0'..=b'9' => match number::parse_number(&self.buf[off..])? {
                Number::I64(v) => {
                    self.tape.push(word(Tag::Int64, 0));
                    #[expect(clippy::cast_sign_loss)]
                    self.tape.push(v as u64);
                }
                Number::U64(v) => {
                    self.tape.push(word(Tag::UInt64, 0));
                    self.tape.push(v);
                }
                Number::F64(v) => {
                    self.tape.push(word(Tag::Float64, 0));
                    self.tape.push(v.to_bits());
                }
            },
            _ => return Err(Error::TapeError),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let end = self.tape.len();
        self.tape[0] = word(Tag::Root, end as u64);
        self.tape.push(word(Tag::Root, 0));
        // The only structural left must be the EOF sentinel.
        if self.pos != self.structurals.len() - 1 {
            return Err(Error::TapeError);
        }
        Ok(())
    }
}

/// Appends `u32` length prefix + decoded bytes + NUL to the heap, returning
/// the offset of the prefix. `src` starts just past the opening quote.
fn append_heap_string(src: &[u8], strings: &mut Vec<u8>) -> Result<u64> {
    let offset = strings.len();
    strings.extend_from_slice(&[0u8; 4]);
    let start = strings.len();
    strings::decode(src, strings)?;
    let len = (strings.len() - start) as u32;
    strings[offset..offset + 4].copy_from_slice(&len.to_le_bytes());
    strings.push(0);
    Ok(offset as u64)
}
