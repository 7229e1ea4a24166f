//! Portable UTF-8 validation.
//!
//! A byte-at-a-time range checker carrying `(pending continuations,
//! allowed range for the next byte)` across block boundaries. The state is a
//! pure function of the concatenated byte stream, so feeding the same input
//! in different block sizes yields the same verdict. Vector targets use the
//! nibble-lookup validator in `utf8_lookup` instead; this one is always
//! compiled and serves as its reference.

/// Streaming validator over arbitrary chunks.
#[derive(Debug, Clone)]
pub(crate) struct ScalarChecker {
    /// Continuation bytes still expected.
    need: u8,
    /// Allowed range for the next continuation byte. The first continuation
    /// of a sequence narrows it (overlongs, surrogates, > U+10FFFF).
    min: u8,
    max: u8,
    error: bool,
}

impl Default for ScalarChecker {
    fn default() -> Self {
        ScalarChecker {
            need: 0,
            min: 0x80,
            max: 0xBF,
            error: false,
        }
    }
}

impl ScalarChecker {
    /// Feed a fixed-size block, matching [`super::utf8_lookup::LookupChecker`]'s interface.
    pub(crate) fn feed_block(&mut self, block: &[u8; crate::simd::BLOCK_LEN]) {
        self.feed(block);
    }

    pub(crate) fn feed(&mut self, bytes: &[u8]) {
        if self.error {
            return;
        }
        for &b in bytes {
            if self.need > 0 {
                if b >= self.min && b <= self.max {
                    self.need -= 1;
                    self.min = 0x80;
                    self.max = 0xBF;
                } else {
                    self.error = true;
                    return;
                }
                continue;
            }
            match b {
                0x00..=0x7F => {}
                0xC2..=0xDF => self.expect(1, 0x80, 0xBF),
                0xE0 => self.expect(2, 0xA0, 0xBF),
                0xE1..=0xEC | 0xEE..=0xEF => self.expect(2, 0x80, 0xBF),
                0xED => self.expect(2, 0x80, 0x9F),
                0xF0 => self.expect(3, 0x90, 0xBF),
                0xF1..=0xF3 => self.expect(3, 0x80, 0xBF),
                0xF4 => self.expect(3, 0x80, 0x8F),
                // 0x80..=0xC1 (stray continuation, overlong lead) and
                // 0xF5..=0xFF (beyond U+10FFFF)
                _ => {
                    self.error = true;
                    return;
                }
            }
        }
    }

    #[inline]
    fn expect(&mut self, need: u8, min: u8, max: u8) {
        self.need = need;
        self.min = min;
        self.max = max;
    }

    /// Verdict at end of input: no malformed sequence and nothing pending.
    pub(crate) fn is_valid(&self) -> bool {
        !self.error && self.need == 0
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarChecker;

    fn valid(bytes: &[u8]) -> bool {
        let mut c = ScalarChecker::default();
        c.feed(bytes);
        c.is_valid()
    }

    #[test]
    fn accepts_well_formed_sequences() {
        assert!(valid(b"plain ascii"));
        assert!(valid("héllo wörld".as_bytes()));
        assert!(valid("ペイロード".as_bytes()));
        assert!(valid("💯 emoji \u{10FFFF}".as_bytes()));
        assert!(valid(b""));
    }

    #[test]
    fn rejects_malformed_sequences() {
        assert!(!valid(b"\x80"), "stray continuation");
        assert!(!valid(b"\xC0\xAF"), "overlong 2-byte");
        assert!(!valid(b"\xC1\xBF"), "overlong 2-byte");
        assert!(!valid(b"\xE0\x9F\xBF"), "overlong 3-byte");
        assert!(!valid(b"\xED\xA0\x80"), "surrogate");
        assert!(!valid(b"\xF0\x8F\xBF\xBF"), "overlong 4-byte");
        assert!(!valid(b"\xF4\x90\x80\x80"), "above U+10FFFF");
        assert!(!valid(b"\xF5\x80\x80\x80"), "invalid lead");
        assert!(!valid(b"\xC2"), "truncated at end");
        assert!(!valid(b"\xE2\x82"), "truncated at end");
        assert!(!valid(b"\xC2x"), "continuation missing");
    }

    #[test]
    fn chunking_does_not_change_the_verdict() {
        let s = "aé漢💯".as_bytes();
        for split in 0..=s.len() {
            let mut c = ScalarChecker::default();
            c.feed(&s[..split]);
            c.feed(&s[split..]);
            assert!(c.is_valid(), "split at {split}");
        }
        let bad = b"\xE0\x9F\xBF";
        for split in 0..=bad.len() {
            let mut c = ScalarChecker::default();
            c.feed(&bad[..split]);
            c.feed(&bad[split..]);
            assert!(!c.is_valid(), "split at {split}");
        }
    }
}
