//! A two-stage JSON parser built around a bit-parallel structural scanner.
//!
//! Overview
//! - Stage 1 walks the padded input in 64-byte blocks and emits the byte
//!   offset of every structural character (`{ } [ ] , :`) and of the first
//!   byte of every primitive, while validating UTF-8 and guaranteeing that
//!   no emitted offset lies inside a string literal.
//! - Stage 2 consumes the structural stream in one of two ways:
//!   - the eager walker builds a compact tape of 64-bit tagged words plus a
//!     string heap, exposed through [`dom::Document`];
//!   - the lazy cursor ([`lazy::LazyDocument`]) descends only the paths the
//!     caller visits and decodes only the scalars it is asked for.
//!
//! Input must carry [`PADDING`] readable zero bytes past its logical end;
//! [`PaddedBytes`] owns such a buffer, and [`Parser::parse_unpadded`] copies
//! arbitrary slices into one.
//!
//! A [`Parser`] owns all scratch buffers (structural indexes, tape, string
//! heap, depth stack) and reuses them across parses. The products of a parse
//! borrow the parser and are invalidated by the next parse call; the borrow
//! checker enforces both rules.
//!
//! ```
//! use jsontape::{PaddedBytes, Parser};
//!
//! let json = PaddedBytes::from(r#"{"a":{"b":1}}"#);
//! let mut parser = Parser::new();
//! let doc = parser.parse(&json).unwrap();
//! let b = doc.root().get_object().unwrap().get("a").unwrap()
//!     .get_object().unwrap().get("b").unwrap()
//!     .get_u64().unwrap();
//! assert_eq!(b, 1);
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(feature = "logging")]
macro_rules! trace_event {
    ($($arg:tt)*) => { ::log::trace!($($arg)*) };
}
#[cfg(not(feature = "logging"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

mod atoms;
mod error;
mod number;
mod padded;
mod parser;
mod scanner;
mod simd;
mod strings;

#[cfg(feature = "dom")]
mod tape;
#[cfg(feature = "dom")]
mod walker;

#[cfg(feature = "dom")]
pub mod dom;
#[cfg(feature = "lazy")]
pub mod lazy;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use padded::{PADDING, PaddedBytes};
pub use parser::{Parser, ParserOptions};

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// The JSON kind of a parsed value.
///
/// Numbers are split three ways so that integers survive a round-trip
/// without going through a float: `I64` covers everything in `i64` range,
/// `U64` the positive tail above it, and `F64` anything with a fraction or
/// exponent (plus integers too large for 64 bits are rejected outright).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `null`
    Null,
    /// `true` or `false`
    Bool,
    /// An integer in `i64` range.
    I64,
    /// An integer above `i64::MAX`, in `u64` range.
    U64,
    /// A double-precision float.
    F64,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}
