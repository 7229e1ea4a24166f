//! 128-bit block classifier for x86-64 with SSE4.2.

use core::arch::x86_64::{
    __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_min_epu8, _mm_movemask_epi8, _mm_or_si128,
    _mm_set1_epi8,
};

use super::{BLOCK_LEN, BlockMasks};

#[inline]
unsafe fn eq(v: __m128i, b: u8) -> u64 {
    // SAFETY: caller guarantees SSE4.2 is statically enabled.
    unsafe { _mm_movemask_epi8(_mm_cmpeq_epi8(v, _mm_set1_epi8(b as i8))) as u16 as u64 }
}

#[inline]
unsafe fn le(v: __m128i, bound: u8) -> u64 {
    // Unsigned byte <= bound, via min(v, bound) == v.
    // SAFETY: caller guarantees SSE4.2 is statically enabled.
    unsafe {
        let bound = _mm_set1_epi8(bound as i8);
        _mm_movemask_epi8(_mm_cmpeq_epi8(_mm_min_epu8(v, bound), v)) as u16 as u64
    }
}

#[inline]
pub(crate) fn classify(block: &[u8; BLOCK_LEN]) -> BlockMasks {
    let mut m = BlockMasks::default();
    // SAFETY: the loads stay within the 64-byte block; SSE4.2 is statically
    // enabled for this module to compile.
    unsafe {
        for lane in 0..4 {
            let v = _mm_loadu_si128(block.as_ptr().add(lane * 16).cast::<__m128i>());
            let shift = lane * 16;
            m.quote |= eq(v, b'"') << shift;
            m.backslash |= eq(v, b'\\') << shift;
            let op = _mm_or_si128(
                _mm_or_si128(
                    _mm_or_si128(
                        _mm_cmpeq_epi8(v, _mm_set1_epi8(b'{' as i8)),
                        _mm_cmpeq_epi8(v, _mm_set1_epi8(b'}' as i8)),
                    ),
                    _mm_or_si128(
                        _mm_cmpeq_epi8(v, _mm_set1_epi8(b'[' as i8)),
                        _mm_cmpeq_epi8(v, _mm_set1_epi8(b']' as i8)),
                    ),
                ),
                _mm_or_si128(
                    _mm_cmpeq_epi8(v, _mm_set1_epi8(b',' as i8)),
                    _mm_cmpeq_epi8(v, _mm_set1_epi8(b':' as i8)),
                ),
            );
            m.op |= (_mm_movemask_epi8(op) as u16 as u64) << shift;
            let ws = _mm_or_si128(
                _mm_or_si128(
                    _mm_cmpeq_epi8(v, _mm_set1_epi8(b' ' as i8)),
                    _mm_cmpeq_epi8(v, _mm_set1_epi8(b'\t' as i8)),
                ),
                _mm_or_si128(
                    _mm_cmpeq_epi8(v, _mm_set1_epi8(b'\n' as i8)),
                    _mm_cmpeq_epi8(v, _mm_set1_epi8(b'\r' as i8)),
                ),
            );
            m.ws |= (_mm_movemask_epi8(ws) as u16 as u64) << shift;
            m.ctrl |= le(v, 0x1F) << shift;
        }
    }
    m
}
