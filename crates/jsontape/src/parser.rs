//! The parser instance: configuration plus reusable scratch buffers.

use alloc::vec::Vec;

use crate::{Error, PADDING, PaddedBytes, Result, scanner};

#[cfg(feature = "dom")]
use crate::{dom, walker};

#[cfg(feature = "lazy")]
use crate::lazy;

/// Configuration for a [`Parser`].
///
/// # Default
///
/// `max_capacity` defaults to the largest input the `u32` offset stream can
/// describe; `max_depth` to 1024 open containers.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Hard ceiling on input size, in bytes.
    ///
    /// Inputs above this fail with [`Error::Capacity`] before any buffer is
    /// touched. Buffers grow on demand (the soft capacity) up to whatever
    /// this allows and are kept across parses.
    pub max_capacity: usize,

    /// Maximum number of simultaneously open containers.
    ///
    /// Exceeding it fails the parse with [`Error::DepthError`]. Depth is
    /// tracked on an explicit stack, so this bound is exact regardless of
    /// the host stack size.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_capacity: u32::MAX as usize - PADDING,
            max_depth: 1024,
        }
    }
}

/// A reusable JSON parser.
///
/// All scratch buffers (structural offsets, tape, string heap, staging
/// area, scope stack) live here and are recycled by every parse. The
/// returned [`dom::Document`] or [`lazy::LazyDocument`] borrows the parser,
/// so starting the next parse first requires letting go of the previous
/// result.
#[derive(Default)]
pub struct Parser {
    options: ParserOptions,
    structural_indexes: Vec<u32>,
    /// Copy-in buffer for unpadded inputs.
    scratch: Vec<u8>,
    #[cfg(feature = "dom")]
    tape: Vec<u64>,
    #[cfg(feature = "dom")]
    strings: Vec<u8>,
    #[cfg(feature = "dom")]
    scopes: Vec<crate::walker::Scope>,
    #[cfg(feature = "lazy")]
    staging: Vec<u8>,
}

impl Parser {
    /// A parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Parser::default()
    }

    /// A parser with explicit options.
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Parser {
            options,
            ..Parser::default()
        }
    }

    /// The configured options.
    #[must_use]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Grows the scratch buffers for an input of `len` bytes, or refuses.
    fn ensure_capacity(&mut self, len: usize) -> Result<()> {
        if len > self.options.max_capacity {
            return Err(Error::Capacity);
        }
        // Worst case one structural per byte, plus sentinel and guard.
        self.structural_indexes
            .try_reserve(len + 2)
            .map_err(|_| Error::Memalloc)?;
        #[cfg(feature = "dom")]
        {
            self.tape.try_reserve(len + 8).map_err(|_| Error::Memalloc)?;
            self.strings
                .try_reserve(len + 32)
                .map_err(|_| Error::Memalloc)?;
            self.scopes
                .try_reserve(self.options.max_depth + 1)
                .map_err(|_| Error::Memalloc)?;
        }
        Ok(())
    }

    /// Parses eagerly: runs both stages and returns the tape-backed
    /// document.
    #[cfg(feature = "dom")]
    pub fn parse<'p>(&'p mut self, input: &PaddedBytes) -> Result<dom::Document<'p>> {
        let len = input.len();
        trace_event!("parse: {} bytes", len);
        self.ensure_capacity(len)?;
        let buf = input.as_padded();
        let count = scanner::scan(buf, len, &mut self.structural_indexes)?;
        let Parser {
            structural_indexes,
            tape,
            strings,
            scopes,
            options,
            ..
        } = self;
        walker::build_tape(
            buf,
            &structural_indexes[..count],
            tape,
            strings,
            scopes,
            options.max_depth,
        )?;
        Ok(dom::Document::new(tape.as_slice(), strings.as_slice()))
    }

    /// Parses eagerly from an unpadded slice, copying it into an internal
    /// padded buffer first.
    #[cfg(feature = "dom")]
    pub fn parse_unpadded<'p>(&'p mut self, json: &[u8]) -> Result<dom::Document<'p>> {
        let len = json.len();
        trace_event!("parse (copy-in): {} bytes", len);
        if len > self.options.max_capacity {
            return Err(Error::Capacity);
        }
        self.ensure_capacity(len)?;
        self.scratch.clear();
        self.scratch
            .try_reserve(len + PADDING)
            .map_err(|_| Error::Memalloc)?;
        self.scratch.extend_from_slice(json);
        self.scratch.resize(len + PADDING, 0);
        let Parser {
            structural_indexes,
            scratch,
            tape,
            strings,
            scopes,
            options,
            ..
        } = self;
        let count = scanner::scan(scratch.as_slice(), len, structural_indexes)?;
        walker::build_tape(
            scratch.as_slice(),
            &structural_indexes[..count],
            tape,
            strings,
            scopes,
            options.max_depth,
        )?;
        Ok(dom::Document::new(tape.as_slice(), strings.as_slice()))
    }

    /// Parses lazily: runs stage 1 only and returns the cursor-backed
    /// document. The input must outlive the returned value.
    #[cfg(feature = "lazy")]
    pub fn parse_lazy<'p, 'b>(
        &'p mut self,
        input: &'b PaddedBytes,
    ) -> Result<lazy::LazyDocument<'p, 'b>> {
        let len = input.len();
        trace_event!("parse_lazy: {} bytes", len);
        self.ensure_capacity(len)?;
        let buf = input.as_padded();
        let count = scanner::scan(buf, len, &mut self.structural_indexes)?;
        let Parser {
            structural_indexes,
            staging,
            ..
        } = self;
        staging.clear();
        Ok(lazy::LazyDocument::new(
            buf,
            &structural_indexes[..count],
            staging,
        ))
    }

    /// Parses lazily from an unpadded slice, copying it into an internal
    /// padded buffer first.
    #[cfg(feature = "lazy")]
    pub fn parse_lazy_unpadded<'p>(&'p mut self, json: &[u8]) -> Result<lazy::LazyDocument<'p, 'p>> {
        let len = json.len();
        trace_event!("parse_lazy (copy-in): {} bytes", len);
        self.ensure_capacity(len)?;
        self.scratch.clear();
        self.scratch
            .try_reserve(len + PADDING)
            .map_err(|_| Error::Memalloc)?;
        self.scratch.extend_from_slice(json);
        self.scratch.resize(len + PADDING, 0);
        let Parser {
            structural_indexes,
            scratch,
            staging,
            ..
        } = self;
        let count = scanner::scan(scratch.as_slice(), len, structural_indexes)?;
        staging.clear();
        Ok(lazy::LazyDocument::new(
            scratch.as_slice(),
            &structural_indexes[..count],
            staging,
        ))
    }
}

impl core::fmt::Debug for Parser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Parser")
            .field("max_capacity", &self.options.max_capacity)
            .field("max_depth", &self.options.max_depth)
            .finish_non_exhaustive()
    }
}
