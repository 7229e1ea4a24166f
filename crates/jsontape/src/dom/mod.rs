//! The eager surface: a parsed document as tape plus string heap.
//!
//! [`Document`] borrows the parser that produced it; the borrow ends when
//! the parser is reused, which is exactly when the tape would be
//! overwritten. Everything here is a cheap view: [`Element`] is a tape
//! index, arrays and objects iterate by hopping over the back-patched
//! container pointers.

mod element;

pub use element::{Array, ArrayIter, Element, Object, ObjectIter};

/// A successfully parsed document, borrowing the parser's tape and heap.
pub struct Document<'a> {
    pub(crate) tape: &'a [u64],
    pub(crate) strings: &'a [u8],
}

impl<'a> Document<'a> {
    pub(crate) fn new(tape: &'a [u64], strings: &'a [u8]) -> Self {
        Document { tape, strings }
    }

    /// The document's single top-level value.
    #[must_use]
    pub fn root(&self) -> Element<'a> {
        Element::new(self.tape, self.strings, 1)
    }
}

impl Document<'_> {
    /// Copies the tape and heap out of the parser, so the result survives
    /// the parser's next parse (or its drop).
    #[must_use]
    pub fn detach(&self) -> OwnedDocument {
        OwnedDocument {
            tape: self.tape.to_vec(),
            strings: self.strings.to_vec(),
        }
    }
}

impl core::fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Document")
            .field("tape_words", &self.tape.len())
            .field("heap_bytes", &self.strings.len())
            .finish()
    }
}

/// A parsed document that owns its tape and heap.
///
/// Detached from a [`Document`] when the result must outlive the parser's
/// buffer reuse.
#[derive(Clone, Debug)]
pub struct OwnedDocument {
    tape: alloc::vec::Vec<u64>,
    strings: alloc::vec::Vec<u8>,
}

impl OwnedDocument {
    /// A borrowed view, interchangeable with a parser-backed document.
    #[must_use]
    pub fn as_document(&self) -> Document<'_> {
        Document {
            tape: &self.tape,
            strings: &self.strings,
        }
    }

    /// The document's single top-level value.
    #[must_use]
    pub fn root(&self) -> Element<'_> {
        Element::new(&self.tape, &self.strings, 1)
    }
}
