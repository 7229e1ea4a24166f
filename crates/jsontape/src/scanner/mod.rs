//! Stage 1: the bit-parallel structural scanner.
//!
//! The scanner walks the padded input in 64-byte blocks. For each block it
//! classifies every byte into five masks, threads four carries across the
//! block boundary (escape parity, in-string state, primitive continuation,
//! and the UTF-8 residuals) and emits the byte offset of every structural
//! character plus the first byte of every primitive. Offsets inside string
//! literals are never emitted: a prefix-XOR over the unescaped quotes turns
//! delimiter positions into an interior mask that filters the candidates.
//!
//! Errors are latched, not thrown: a control character inside a string sets
//! a bit in an accumulator, UTF-8 disagreements accumulate in the validator,
//! and both are inspected exactly once at end of input.
//!
//! The output stream ends with one sentinel offset equal to the input
//! length, followed by a single zero that is excluded from the count and
//! exists so stage 2 may peek one past the sentinel without a bounds check.

pub(crate) mod utf8;

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    target_arch = "aarch64"
))]
pub(crate) mod utf8_lookup;

use alloc::vec::Vec;

use crate::{
    Error, Result,
    simd::{self, BLOCK_LEN, bits},
};

#[cfg(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    target_arch = "aarch64"
))]
use utf8_lookup::LookupChecker as Utf8Checker;

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    target_arch = "aarch64"
)))]
use utf8::ScalarChecker as Utf8Checker;

/// Carries threaded from one block to the next.
#[derive(Default)]
struct Scanner {
    /// Bit 0 set when the next block's first byte is escaped by an
    /// odd-length backslash run ending at this block boundary.
    prev_escaped: u64,
    /// All ones when the block ended inside a string, else all zeros.
    prev_in_string: u64,
    /// Bit 0 set when the block ended on a primitive byte, so the next
    /// block's first byte continues it rather than starting a new one.
    prev_scalar: u64,
    /// Latched control-characters-inside-strings error bits.
    unescaped: u64,
}

impl Scanner {
    #[inline]
    fn step(&mut self, block: &[u8; BLOCK_LEN], base: u32, out: &mut Vec<u32>) {
        let m = simd::classify(block);

        let escaped = bits::odd_backslash_ends(m.backslash, &mut self.prev_escaped);
        let real_quote = m.quote & !escaped;
        let in_string = bits::prefix_xor(real_quote) ^ self.prev_in_string;
        // Sign-extend the top bit: either all ones or all zeros.
        self.prev_in_string = ((in_string as i64) >> 63) as u64;
        // Interior plus closing quote; the opening quote stays available as
        // a primitive start.
        let string_tail = in_string ^ real_quote;

        let scalar = !(m.op | m.ws);
        let nonquote_scalar = scalar & !m.quote;
        let follows_scalar = bits::follows(nonquote_scalar, &mut self.prev_scalar);
        let scalar_start = scalar & !follows_scalar;

        let structurals = (m.op | scalar_start) & !string_tail;
        self.unescaped |= m.ctrl & string_tail;

        write_indexes(base, structurals, out);
    }
}

/// Scans `buf[..len]` and fills `out` with the structural offsets, the
/// sentinel `len`, and the trailing zero guard.
///
/// Returns the number of offsets including the sentinel (the guard is not
/// counted). `buf` must extend at least [`crate::PADDING`] bytes past `len`.
pub(crate) fn scan(buf: &[u8], len: usize, out: &mut Vec<u32>) -> Result<usize> {
    debug_assert!(len <= u32::MAX as usize - BLOCK_LEN);
    out.clear();
    let mut scanner = Scanner::default();
    let mut utf8 = Utf8Checker::default();

    let full = len - len % BLOCK_LEN;
    for (i, chunk) in buf[..full].chunks_exact(BLOCK_LEN).enumerate() {
        let block: &[u8; BLOCK_LEN] = chunk.try_into().expect("chunks_exact yields full blocks");
        utf8.feed_block(block);
        scanner.step(block, (i * BLOCK_LEN) as u32, out);
    }
    if full < len {
        // Stage the remainder through a whitespace-filled block so the
        // carries and the UTF-8 checker see the same byte stream.
        let mut tail = [0x20u8; BLOCK_LEN];
        tail[..len - full].copy_from_slice(&buf[full..len]);
        utf8.feed_block(&tail);
        scanner.step(&tail, full as u32, out);
    }

    if !utf8.is_valid() {
        return Err(Error::Utf8Error);
    }
    if scanner.prev_in_string != 0 {
        return Err(Error::UnclosedString);
    }
    if scanner.unescaped != 0 {
        return Err(Error::UnescapedChars);
    }
    if out.is_empty() {
        return Err(Error::Empty);
    }

    out.push(len as u32);
    let count = out.len();
    // Guard for one-past-the-sentinel peeks; never counted.
    out.push(0);
    trace_event!("stage 1: {} structurals over {} bytes", count - 1, len);
    Ok(count)
}

/// Flattens the set bits of `structurals` into byte offsets `base + bit`.
///
/// The first eight extractions run unconditionally (garbage lanes are
/// truncated away afterwards); blocks with more than eight structurals take
/// the rare outer branches.
#[inline]
fn write_indexes(base: u32, bits: u64, out: &mut Vec<u32>) {
    if bits == 0 {
        return;
    }
    let cnt = bits.count_ones() as usize;
    let start = out.len();
    let mut rest = bits;

    out.resize(start + 8, 0);
    for slot in 0..8 {
        out[start + slot] = base.wrapping_add(rest.trailing_zeros());
        rest &= rest.wrapping_sub(1);
    }
    if cnt > 8 {
        out.resize(start + 16, 0);
        for slot in 8..16 {
            out[start + slot] = base.wrapping_add(rest.trailing_zeros());
            rest &= rest.wrapping_sub(1);
        }
        if cnt > 16 {
            out.resize(start + cnt, 0);
            for slot in 16..cnt {
                out[start + slot] = base.wrapping_add(rest.trailing_zeros());
                rest &= rest.wrapping_sub(1);
            }
        }
    }
    out.truncate(start + cnt);
}

#[cfg(test)]
mod tests;
