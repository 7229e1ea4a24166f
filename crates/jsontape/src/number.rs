//! The JSON number parser.
//!
//! Digits accumulate into a single `u64` for the integer and fraction parts
//! together; the decimal exponent is adjusted for the fraction length and
//! any explicit exponent. Classification then follows the grammar shape:
//!
//! - no fraction, no exponent: `i64` when it fits, `u64` for the positive
//!   tail up to twenty digits, `NumberOutOfRange` beyond;
//! - otherwise a float. When the decimal exponent is within ±22 and the
//!   accumulator is below 2^53 both operands are exact and one multiply or
//!   divide is correctly rounded (Clinger's fast path). Everything else
//!   goes through core's correctly rounded decimal-to-binary conversion,
//!   with non-finite results rejected: JSON has no infinities.
//!
//! Callers hand in a slice beginning at the number's first byte and
//! extending into the zeroed padding, which acts as the terminator.

use crate::{Error, Result, atoms};

/// A parsed number, tagged the way it lands on the tape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// Exact powers of ten: every entry is an integer below 2^63, representable
/// without rounding in an f64.
static POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

#[inline]
fn at(src: &[u8], i: usize) -> u8 {
    src.get(i).copied().unwrap_or(0)
}

#[inline]
fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// Whether the eight bytes at `src[p..]` are all ASCII digits. Reads a full
/// word; callers rely on the input padding.
#[inline]
fn is_eight_digits(src: &[u8], p: usize) -> bool {
    let Some(chunk) = src.get(p..p + 8) else {
        return false;
    };
    let val = u64::from_le_bytes(chunk.try_into().expect("eight bytes"));
    ((val & 0xF0F0_F0F0_F0F0_F0F0)
        | (((val.wrapping_add(0x0606_0606_0606_0606)) & 0xF0F0_F0F0_F0F0_F0F0) >> 4))
        == 0x3333_3333_3333_3333
}

/// Parses eight known-good digits with three SWAR multiply-shift steps:
/// pairs, then four-digit groups, then the full value.
#[inline]
fn parse_eight_digits(src: &[u8], p: usize) -> u64 {
    let chunk: [u8; 8] = src[p..p + 8].try_into().expect("eight bytes");
    let mut val = u64::from_le_bytes(chunk);
    val = (val & 0x0F0F_0F0F_0F0F_0F0F).wrapping_mul(2561) >> 8;
    val = (val & 0x00FF_00FF_00FF_00FF).wrapping_mul(6_553_601) >> 16;
    (val & 0x0000_FFFF_0000_FFFF).wrapping_mul(42_949_672_960_001) >> 32
}

/// Parses the number starting at `src[0]`.
#[expect(clippy::too_many_lines)]
pub(crate) fn parse_number(src: &[u8]) -> Result<Number> {
    let mut p = 0usize;
    let negative = at(src, 0) == b'-';
    if negative {
        p = 1;
        if !is_digit(at(src, p)) {
            return Err(Error::NumberError);
        }
    }

    let i: u64;
    let mut exponent: i64;
    let digit_count: usize;

    if at(src, p) == b'0' {
        // A leading zero must be alone: 0, 0.x or 0e_x.
        p += 1;
        if at(src, p) == b'.' {
            p += 1;
            let start_decimal = p;
            if !is_digit(at(src, p)) {
                return Err(Error::NumberError);
            }
            while at(src, p) == b'0' {
                p += 1;
            }
            let start_significant = p;
            let mut acc = 0u64;
            // Long fraction runs are common enough to pay for a word step.
            if is_eight_digits(src, p) {
                acc = acc
                    .wrapping_mul(100_000_000)
                    .wrapping_add(parse_eight_digits(src, p));
                p += 8;
            }
            while is_digit(at(src, p)) {
                acc = acc.wrapping_mul(10).wrapping_add(u64::from(at(src, p) - b'0'));
                p += 1;
            }
            i = acc;
            digit_count = p - start_significant;
            exponent = -((p - start_decimal) as i64);
        } else if !atoms::is_delimiter(at(src, p)) {
            if at(src, p) != b'e' && at(src, p) != b'E' {
                return Err(Error::NumberError);
            }
            i = 0;
            exponent = 0;
            digit_count = 1;
        } else {
            // Bare zero, either sign, is the integer zero.
            return Ok(Number::I64(0));
        }
    } else {
        let start_digits = p;
        if !is_digit(at(src, p)) {
            return Err(Error::NumberError);
        }
        let mut acc = u64::from(at(src, p) - b'0');
        p += 1;
        while is_digit(at(src, p)) {
            // May wrap; the twenty-digit classification below untangles it.
            acc = acc.wrapping_mul(10).wrapping_add(u64::from(at(src, p) - b'0'));
            p += 1;
        }

        if at(src, p) == b'.' {
            p += 1;
            let start_decimal = p;
            if !is_digit(at(src, p)) {
                return Err(Error::NumberError);
            }
            if is_eight_digits(src, p) {
                acc = acc
                    .wrapping_mul(100_000_000)
                    .wrapping_add(parse_eight_digits(src, p));
                p += 8;
            }
            while is_digit(at(src, p)) {
                acc = acc.wrapping_mul(10).wrapping_add(u64::from(at(src, p) - b'0'));
                p += 1;
            }
            i = acc;
            exponent = -((p - start_decimal) as i64);
            digit_count = p - start_digits - 1;
        } else if !atoms::is_delimiter(at(src, p)) {
            if at(src, p) != b'e' && at(src, p) != b'E' {
                return Err(Error::NumberError);
            }
            i = acc;
            exponent = 0;
            digit_count = p - start_digits;
        } else {
            // Pure integer. `p` counts every consumed byte including the
            // sign, so twenty covers both the 20-digit positive range and
            // the sign plus 19 digits of the negative one.
            if p > 20 {
                return Err(Error::NumberOutOfRange);
            }
            if p == 20 {
                if negative {
                    // Only INT64_MIN survives at this length.
                    if acc > (i64::MAX as u64) + 1 {
                        return Err(Error::NumberOutOfRange);
                    }
                    if acc == (i64::MAX as u64) + 1 {
                        return Ok(Number::I64(i64::MIN));
                    }
                } else if src[0] != b'1' || acc <= i64::MAX as u64 {
                    // A 20-digit value that does not both start with 1 and
                    // exceed i64::MAX either overflowed u64 during
                    // accumulation or is above u64::MAX.
                    return Err(Error::NumberOutOfRange);
                }
            }
            return Ok(if acc > i64::MAX as u64 {
                Number::U64(acc)
            } else if negative {
                Number::I64((acc as i64).wrapping_neg())
            } else {
                Number::I64(acc as i64)
            });
        }
    }

    if at(src, p) == b'e' || at(src, p) == b'E' {
        p += 1;
        let neg_exp = match at(src, p) {
            b'-' => {
                p += 1;
                true
            }
            b'+' => {
                p += 1;
                false
            }
            _ => false,
        };
        if !is_digit(at(src, p)) {
            return Err(Error::NumberError);
        }
        let mut exp_number: i64 = 0;
        while is_digit(at(src, p)) {
            if exp_number > 0x1_0000_0000 {
                return Err(Error::NumberError);
            }
            exp_number = 10 * exp_number + i64::from(at(src, p) - b'0');
            p += 1;
        }
        exponent += if neg_exp { -exp_number } else { exp_number };
    }

    if !atoms::is_delimiter(at(src, p)) {
        return Err(Error::NumberError);
    }

    finish_float(src, negative, i, exponent, digit_count, p)
}

fn finish_float(
    src: &[u8],
    negative: bool,
    i: u64,
    exponent: i64,
    digit_count: usize,
    end: usize,
) -> Result<Number> {
    if digit_count > 20 {
        return Err(Error::NumberOutOfRange);
    }
    if digit_count == 20 && (src[0] != b'1' || i <= i64::MAX as u64) {
        // Same overflow reasoning as the pure-integer path: anything else
        // wrapped the accumulator.
        return Err(Error::NumberOutOfRange);
    }

    if (-22..=22).contains(&exponent) && i <= (1u64 << 53) - 1 {
        // Both the mantissa and the power of ten are exact, so one rounded
        // operation gives the correctly rounded result.
        #[expect(clippy::cast_precision_loss)]
        let mut d = i as f64;
        if exponent < 0 {
            d /= POW10[(-exponent) as usize];
        } else {
            d *= POW10[exponent as usize];
        }
        return Ok(Number::F64(if negative { -d } else { d }));
    }

    // Out of the fast envelope: delegate to core's correctly rounded
    // conversion over the original spelling.
    let text = core::str::from_utf8(&src[..end]).map_err(|_| Error::NumberError)?;
    let d: f64 = text.parse().map_err(|_| Error::NumberError)?;
    if !d.is_finite() {
        return Err(Error::NumberOutOfRange);
    }
    Ok(Number::F64(d))
}

/// Typed entry point used by the lazy cursor: signed integers only.
pub(crate) fn parse_i64(src: &[u8]) -> Result<i64> {
    match parse_number(src)? {
        Number::I64(v) => Ok(v),
        Number::U64(_) | Number::F64(_) => Err(Error::IncorrectType),
    }
}

/// Typed entry point used by the lazy cursor: unsigned integers, including
/// non-negative `i64` spellings.
pub(crate) fn parse_u64(src: &[u8]) -> Result<u64> {
    match parse_number(src)? {
        Number::U64(v) => Ok(v),
        #[expect(clippy::cast_sign_loss)]
        Number::I64(v) if v >= 0 => Ok(v as u64),
        Number::I64(_) | Number::F64(_) => Err(Error::IncorrectType),
    }
}

/// Typed entry point used by the lazy cursor: any number, widened to f64.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn parse_f64(src: &[u8]) -> Result<f64> {
    match parse_number(src)? {
        Number::F64(v) => Ok(v),
        Number::I64(v) => Ok(v as f64),
        Number::U64(v) => Ok(v as f64),
    }
}
