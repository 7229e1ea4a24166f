//! Vectorized UTF-8 validation for SIMD targets.
//!
//! The classifier looks at byte pairs: for every position it shuffles three
//! nibble-indexed tables (high nibble of the previous byte, low nibble of
//! the previous byte, high nibble of the current byte) and ANDs the results.
//! A bit survives only when all three lookups agree on an error condition.
//! The `TWO_CONTS` bit (0x80) flags continuation-after-continuation, which
//! is legal exactly at the 3rd/4th byte of a longer sequence; a second check
//! derives those positions from bytes two and three back and XORs the
//! disagreements into the error accumulator. A dangling lead at the end of a
//! block is carried as `prev_incomplete` and only becomes an error when no
//! continuation follows.

const TOO_SHORT: u8 = 1 << 0;
const TOO_LONG: u8 = 1 << 1;
const OVERLONG_3: u8 = 1 << 2;
const TOO_LARGE: u8 = 1 << 3;
const SURROGATE: u8 = 1 << 4;
const OVERLONG_2: u8 = 1 << 5;
const TOO_LARGE_1000: u8 = 1 << 6;
const OVERLONG_4: u8 = 1 << 6;
const TWO_CONTS: u8 = 1 << 7;
const CARRY: u8 = TOO_SHORT | TOO_LONG | TWO_CONTS;

const BYTE_1_HIGH: [u8; 16] = [
    // 0_______: ASCII lead followed by a continuation
    TOO_LONG, TOO_LONG, TOO_LONG, TOO_LONG, TOO_LONG, TOO_LONG, TOO_LONG, TOO_LONG,
    // 10______: continuation followed by a continuation
    TWO_CONTS, TWO_CONTS, TWO_CONTS, TWO_CONTS,
    // 1100____
    TOO_SHORT | OVERLONG_2,
    // 1101____
    TOO_SHORT,
    // 1110____
    TOO_SHORT | OVERLONG_3 | SURROGATE,
    // 1111____
    TOO_SHORT | TOO_LARGE | TOO_LARGE_1000 | OVERLONG_4,
];

const BYTE_1_LOW: [u8; 16] = [
    // ____0000: C0, E0, F0 lead overlongs
    CARRY | OVERLONG_2 | OVERLONG_3 | OVERLONG_4,
    // ____0001: C1 lead overlong
    CARRY | OVERLONG_2,
    CARRY,
    CARRY,
    // ____0100: F4 lead, too large past 0x8F
    CARRY | TOO_LARGE,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    // ____1101: ED lead, surrogate past 0x9F
    CARRY | TOO_LARGE | TOO_LARGE_1000 | SURROGATE,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
    CARRY | TOO_LARGE | TOO_LARGE_1000,
];

const BYTE_2_HIGH: [u8; 16] = [
    // 0_______: not a continuation
    TOO_SHORT, TOO_SHORT, TOO_SHORT, TOO_SHORT, TOO_SHORT, TOO_SHORT, TOO_SHORT, TOO_SHORT,
    // 1000____
    TOO_LONG | OVERLONG_2 | TWO_CONTS | OVERLONG_3 | TOO_LARGE_1000,
    // 1001____
    TOO_LONG | OVERLONG_2 | TWO_CONTS | OVERLONG_3 | TOO_LARGE,
    // 101_____
    TOO_LONG | OVERLONG_2 | TWO_CONTS | SURROGATE | TOO_LARGE,
    TOO_LONG | OVERLONG_2 | TWO_CONTS | SURROGATE | TOO_LARGE,
    // 11______: not a continuation
    TOO_SHORT, TOO_SHORT, TOO_SHORT, TOO_SHORT,
];

/// Lane maxima for a block that may legally end mid-sequence: the last byte
/// may be at most a 1-continuation lead, the one before a 2-continuation
/// lead, the one before that a 3-continuation lead.
const MAX_COMPLETE: [u8; 16] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF0 - 1,
    0xE0 - 1,
    0xC0 - 1,
];

#[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
mod vec {
    use core::arch::x86_64::{
        __m128i, _mm_alignr_epi8, _mm_and_si128, _mm_loadu_si128, _mm_movemask_epi8,
        _mm_or_si128, _mm_set1_epi8, _mm_shuffle_epi8, _mm_srli_epi16, _mm_subs_epu8,
        _mm_testz_si128, _mm_xor_si128,
    };

    /// One 16-byte lane. All methods assume SSE4.2, statically enabled.
    #[derive(Clone, Copy)]
    pub(super) struct V(__m128i);

    impl V {
        #[inline]
        pub(super) fn load(bytes: &[u8]) -> Self {
            debug_assert!(bytes.len() >= 16);
            // SAFETY: the slice holds at least 16 readable bytes.
            V(unsafe { _mm_loadu_si128(bytes.as_ptr().cast::<__m128i>()) })
        }

        #[inline]
        pub(super) fn zero() -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_set1_epi8(0) })
        }

        #[inline]
        pub(super) fn splat(b: u8) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_set1_epi8(b as i8) })
        }

        #[inline]
        pub(super) fn or(self, o: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_or_si128(self.0, o.0) })
        }

        #[inline]
        pub(super) fn and(self, o: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_and_si128(self.0, o.0) })
        }

        #[inline]
        pub(super) fn xor(self, o: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_xor_si128(self.0, o.0) })
        }

        #[inline]
        pub(super) fn shr4(self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_and_si128(_mm_srli_epi16::<4>(self.0), _mm_set1_epi8(0x0F)) })
        }

        #[inline]
        pub(super) fn lookup16(self, table: &[u8; 16]) -> Self {
            // SAFETY: sse4.2 statically enabled; indexes are nibbles.
            V(unsafe { _mm_shuffle_epi8(Self::load(table).0, self.0) })
        }

        #[inline]
        pub(super) fn prev1(self, prev: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_alignr_epi8::<15>(self.0, prev.0) })
        }

        #[inline]
        pub(super) fn prev2(self, prev: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_alignr_epi8::<14>(self.0, prev.0) })
        }

        #[inline]
        pub(super) fn prev3(self, prev: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_alignr_epi8::<13>(self.0, prev.0) })
        }

        #[inline]
        pub(super) fn saturating_sub(self, o: Self) -> Self {
            // SAFETY: sse4.2 statically enabled.
            V(unsafe { _mm_subs_epu8(self.0, o.0) })
        }

        #[inline]
        pub(super) fn any_nonzero(self) -> bool {
            // SAFETY: sse4.2 statically enabled.
            unsafe { _mm_testz_si128(self.0, self.0) == 0 }
        }

        #[inline]
        pub(super) fn has_high_bit(self) -> bool {
            // SAFETY: sse4.2 statically enabled.
            unsafe { _mm_movemask_epi8(self.0) != 0 }
        }
    }
}

#[cfg(target_arch = "aarch64")]
mod vec {
    use core::arch::aarch64::{
        uint8x16_t, vandq_u8, vdupq_n_u8, veorq_u8, vextq_u8, vld1q_u8, vmaxvq_u8, vorrq_u8,
        vqsubq_u8, vqtbl1q_u8, vshrq_n_u8,
    };

    /// One 16-byte lane. NEON is always available on aarch64.
    #[derive(Clone, Copy)]
    pub(super) struct V(uint8x16_t);

    impl V {
        #[inline]
        pub(super) fn load(bytes: &[u8]) -> Self {
            debug_assert!(bytes.len() >= 16);
            // SAFETY: the slice holds at least 16 readable bytes.
            V(unsafe { vld1q_u8(bytes.as_ptr()) })
        }

        #[inline]
        pub(super) fn zero() -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vdupq_n_u8(0) })
        }

        #[inline]
        pub(super) fn splat(b: u8) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vdupq_n_u8(b) })
        }

        #[inline]
        pub(super) fn or(self, o: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vorrq_u8(self.0, o.0) })
        }

        #[inline]
        pub(super) fn and(self, o: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vandq_u8(self.0, o.0) })
        }

        #[inline]
        pub(super) fn xor(self, o: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { veorq_u8(self.0, o.0) })
        }

        #[inline]
        pub(super) fn shr4(self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vshrq_n_u8::<4>(self.0) })
        }

        #[inline]
        pub(super) fn lookup16(self, table: &[u8; 16]) -> Self {
            // SAFETY: NEON always available; indexes are nibbles.
            V(unsafe { vqtbl1q_u8(Self::load(table).0, self.0) })
        }

        #[inline]
        pub(super) fn prev1(self, prev: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vextq_u8::<15>(prev.0, self.0) })
        }

        #[inline]
        pub(super) fn prev2(self, prev: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vextq_u8::<14>(prev.0, self.0) })
        }

        #[inline]
        pub(super) fn prev3(self, prev: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vextq_u8::<13>(prev.0, self.0) })
        }

        #[inline]
        pub(super) fn saturating_sub(self, o: Self) -> Self {
            // SAFETY: NEON always available.
            V(unsafe { vqsubq_u8(self.0, o.0) })
        }

        #[inline]
        pub(super) fn any_nonzero(self) -> bool {
            // SAFETY: NEON always available.
            unsafe { vmaxvq_u8(self.0) != 0 }
        }

        #[inline]
        pub(super) fn has_high_bit(self) -> bool {
            // SAFETY: NEON always available.
            unsafe { vmaxvq_u8(self.0) >= 0x80 }
        }
    }
}

use vec::V;

/// Streaming block validator with three residuals: the error accumulator,
/// the previous lane (for cross-boundary pair lookups), and the
/// incomplete-tail marker.
pub(crate) struct LookupChecker {
    error: V,
    prev_input: V,
    prev_incomplete: V,
}

impl Default for LookupChecker {
    fn default() -> Self {
        LookupChecker {
            error: V::zero(),
            prev_input: V::zero(),
            prev_incomplete: V::zero(),
        }
    }
}

impl LookupChecker {
    pub(crate) fn feed_block(&mut self, block: &[u8; 64]) {
        let lanes = [
            V::load(&block[0..16]),
            V::load(&block[16..32]),
            V::load(&block[32..48]),
            V::load(&block[48..64]),
        ];
        let folded = lanes[0].or(lanes[1]).or(lanes[2]).or(lanes[3]);
        if !folded.has_high_bit() {
            // ASCII block: only a dangling lead from the previous block can
            // be wrong here.
            self.error = self.error.or(self.prev_incomplete);
            self.prev_incomplete = V::zero();
            self.prev_input = lanes[3];
            return;
        }
        let mut prev = self.prev_input;
        for lane in lanes {
            let prev1 = lane.prev1(prev);
            let sc = check_special_cases(lane, prev1);
            self.error = self.error.or(check_multibyte_lengths(lane, prev, sc));
            prev = lane;
        }
        self.prev_incomplete = lanes[3].saturating_sub(V::load(&MAX_COMPLETE));
        self.prev_input = lanes[3];
    }

    pub(crate) fn is_valid(&self) -> bool {
        !self.error.or(self.prev_incomplete).any_nonzero()
    }
}

#[inline]
fn check_special_cases(input: V, prev1: V) -> V {
    let byte_1_high = prev1.shr4().lookup16(&BYTE_1_HIGH);
    let byte_1_low = prev1.and(V::splat(0x0F)).lookup16(&BYTE_1_LOW);
    let byte_2_high = input.shr4().lookup16(&BYTE_2_HIGH);
    byte_1_high.and(byte_1_low).and(byte_2_high)
}

#[inline]
fn check_multibyte_lengths(input: V, prev: V, sc: V) -> V {
    let prev2 = input.prev2(prev);
    let prev3 = input.prev3(prev);
    // High bit set where the byte two back is a 3-byte lead or the byte
    // three back is a 4-byte lead: those positions must be continuations.
    let is_third_byte = prev2.saturating_sub(V::splat(0xE0 - 0x80));
    let is_fourth_byte = prev3.saturating_sub(V::splat(0xF0 - 0x80));
    let must23_80 = is_third_byte.or(is_fourth_byte).and(V::splat(0x80));
    must23_80.xor(sc)
}
