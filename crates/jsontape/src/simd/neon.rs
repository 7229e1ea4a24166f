//! 128-bit block classifier for aarch64 NEON.

use core::arch::aarch64::{
    uint8x16_t, vandq_u8, vcleq_u8, vceqq_u8, vdupq_n_u8, vgetq_lane_u16, vld1q_u8, vorrq_u8,
    vpaddq_u8, vreinterpretq_u16_u8,
};

use super::{BLOCK_LEN, BlockMasks};

/// Packs the high bit of each lane of a comparison result into 16 bits.
#[inline]
unsafe fn movemask(v: uint8x16_t) -> u64 {
    const BIT_MASK: [u8; 16] = [
        0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40,
        0x80,
    ];
    // SAFETY: NEON is always available on aarch64.
    unsafe {
        let masked = vandq_u8(v, vld1q_u8(BIT_MASK.as_ptr()));
        let t = vpaddq_u8(masked, masked);
        let t = vpaddq_u8(t, t);
        let t = vpaddq_u8(t, t);
        u64::from(vgetq_lane_u16::<0>(vreinterpretq_u16_u8(t)))
    }
}

#[inline]
unsafe fn eq(v: uint8x16_t, b: u8) -> u64 {
    // SAFETY: NEON is always available on aarch64.
    unsafe { movemask(vceqq_u8(v, vdupq_n_u8(b))) }
}

#[inline]
pub(crate) fn classify(block: &[u8; BLOCK_LEN]) -> BlockMasks {
    let mut m = BlockMasks::default();
    // SAFETY: the loads stay within the 64-byte block; NEON is always
    // available on aarch64.
    unsafe {
        for lane in 0..4 {
            let v = vld1q_u8(block.as_ptr().add(lane * 16));
            let shift = lane * 16;
            m.quote |= eq(v, b'"') << shift;
            m.backslash |= eq(v, b'\\') << shift;
            let op = vorrq_u8(
                vorrq_u8(
                    vorrq_u8(
                        vceqq_u8(v, vdupq_n_u8(b'{')),
                        vceqq_u8(v, vdupq_n_u8(b'}')),
                    ),
                    vorrq_u8(
                        vceqq_u8(v, vdupq_n_u8(b'[')),
                        vceqq_u8(v, vdupq_n_u8(b']')),
                    ),
                ),
                vorrq_u8(
                    vceqq_u8(v, vdupq_n_u8(b',')),
                    vceqq_u8(v, vdupq_n_u8(b':')),
                ),
            );
            m.op |= movemask(op) << shift;
            let ws = vorrq_u8(
                vorrq_u8(
                    vceqq_u8(v, vdupq_n_u8(b' ')),
                    vceqq_u8(v, vdupq_n_u8(b'\t')),
                ),
                vorrq_u8(
                    vceqq_u8(v, vdupq_n_u8(b'\n')),
                    vceqq_u8(v, vdupq_n_u8(b'\r')),
                ),
            );
            m.ws |= movemask(ws) << shift;
            m.ctrl |= movemask(vcleq_u8(v, vdupq_n_u8(0x1F))) << shift;
        }
    }
    m
}
