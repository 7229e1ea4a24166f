//! 256-bit block classifier for x86-64 with AVX2.

use core::arch::x86_64::{
    __m256i, _mm256_cmpeq_epi8, _mm256_loadu_si256, _mm256_min_epu8, _mm256_movemask_epi8,
    _mm256_or_si256, _mm256_set1_epi8,
};

use super::{BLOCK_LEN, BlockMasks};

#[inline]
unsafe fn eq(v: __m256i, b: u8) -> u64 {
    // SAFETY: caller guarantees AVX2 is statically enabled.
    unsafe { _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, _mm256_set1_epi8(b as i8))) as u32 as u64 }
}

#[inline]
unsafe fn le(v: __m256i, bound: u8) -> u64 {
    // Unsigned byte <= bound, via min(v, bound) == v.
    // SAFETY: caller guarantees AVX2 is statically enabled.
    unsafe {
        let bound = _mm256_set1_epi8(bound as i8);
        _mm256_movemask_epi8(_mm256_cmpeq_epi8(_mm256_min_epu8(v, bound), v)) as u32 as u64
    }
}

#[inline]
pub(crate) fn classify(block: &[u8; BLOCK_LEN]) -> BlockMasks {
    let mut m = BlockMasks::default();
    // SAFETY: the loads stay within the 64-byte block; AVX2 is statically
    // enabled for this module to compile.
    unsafe {
        for half in 0..2 {
            let v = _mm256_loadu_si256(block.as_ptr().add(half * 32).cast::<__m256i>());
            let shift = half * 32;
            m.quote |= eq(v, b'"') << shift;
            m.backslash |= eq(v, b'\\') << shift;
            let op = _mm256_or_si256(
                _mm256_or_si256(
                    _mm256_or_si256(
                        _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b'{' as i8)),
                        _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b'}' as i8)),
                    ),
                    _mm256_or_si256(
                        _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b'[' as i8)),
                        _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b']' as i8)),
                    ),
                ),
                _mm256_or_si256(
                    _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b',' as i8)),
                    _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b':' as i8)),
                ),
            );
            m.op |= (_mm256_movemask_epi8(op) as u32 as u64) << shift;
            let ws = _mm256_or_si256(
                _mm256_or_si256(
                    _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b' ' as i8)),
                    _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b'\t' as i8)),
                ),
                _mm256_or_si256(
                    _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b'\n' as i8)),
                    _mm256_cmpeq_epi8(v, _mm256_set1_epi8(b'\r' as i8)),
                ),
            );
            m.ws |= (_mm256_movemask_epi8(ws) as u32 as u64) << shift;
            m.ctrl |= le(v, 0x1F) << shift;
        }
    }
    m
}
