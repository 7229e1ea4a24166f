//! Word-wide byte classification for the structural scanner.
//!
//! Every backend consumes one 64-byte block and produces the same five
//! bitmasks, one bit per byte position (bit 0 = first byte). The backend is
//! chosen at compile time from the enabled target features; runtime CPU
//! dispatch belongs to the embedding layer, not this crate. The portable
//! `swar` backend is always compiled and serves as the reference semantics
//! for the vector ones.

pub(crate) mod bits;
pub(crate) mod swar;

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
pub(crate) mod avx2;
#[cfg(all(
    target_arch = "x86_64",
    target_feature = "sse4.2",
    not(target_feature = "avx2")
))]
pub(crate) mod sse42;

#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;

/// Bytes per scanner block.
pub(crate) const BLOCK_LEN: usize = 64;

/// Per-block classification masks. Bit `i` describes byte `i`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockMasks {
    /// `"`
    pub quote: u64,
    /// `\`
    pub backslash: u64,
    /// `{ } [ ] , :`
    pub op: u64,
    /// space, tab, line feed, carriage return
    pub ws: u64,
    /// any byte below 0x20
    pub ctrl: u64,
}

/// Classifies one block with the best backend for the compile target.
#[inline]
pub(crate) fn classify(block: &[u8; BLOCK_LEN]) -> BlockMasks {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    {
        avx2::classify(block)
    }
    #[cfg(all(
        target_arch = "x86_64",
        target_feature = "sse4.2",
        not(target_feature = "avx2")
    ))]
    {
        sse42::classify(block)
    }
    #[cfg(target_arch = "aarch64")]
    {
        neon::classify(block)
    }
    #[cfg(not(any(
        all(target_arch = "x86_64", target_feature = "sse4.2"),
        target_arch = "aarch64"
    )))]
    {
        swar::classify(block)
    }
}
