//! Decimal text to [`NumericVar`].

use crate::var::{NumericSign, NumericVar, DEC_DIGITS, NUMERIC_MAX_PRECISION};
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::str::FromStr;
use pqbin_core::{Error, Result};

fn syntax_error(text: &str) -> Error {
    Error::invalid_syntax("numeric", text.to_string())
}

impl NumericVar {
    /// Parses a decimal literal from the start of `text`, returning the value
    /// and the number of bytes consumed.
    ///
    /// Accepts an optional sign, digits with at most one decimal point, and an
    /// optional `e`/`E` exponent whose magnitude is at most
    /// [`NUMERIC_MAX_PRECISION`]. `NaN` is accepted in any letter case.
    /// Surrounding whitespace is not skipped.
    pub fn parse_prefix(text: &str) -> Result<(NumericVar, usize)> {
        let b = text.as_bytes();

        if b.len() >= 3 && b[..3].eq_ignore_ascii_case(b"nan") {
            return Ok((NumericVar::nan(), 3));
        }

        let mut i = 0;
        let mut sign = NumericSign::Positive;
        match b.first() {
            Some(b'+') => i += 1,
            Some(b'-') => {
                sign = NumericSign::Negative;
                i += 1;
            }
            _ => {}
        }

        let mut have_dp = false;
        if b.get(i) == Some(&b'.') {
            have_dp = true;
            i += 1;
        }

        if !b.get(i).map_or(false, u8::is_ascii_digit) {
            return Err(syntax_error(text));
        }

        // Leading pad so every group of DEC_DIGITS can start on a digit boundary.
        let mut decdigits: Vec<u8> = vec![0; DEC_DIGITS as usize];
        let mut dweight: i32 = -1;
        let mut dscale: i32 = 0;

        while let Some(&c) = b.get(i) {
            if c.is_ascii_digit() {
                decdigits.push(c - b'0');
                if have_dp {
                    dscale += 1;
                } else {
                    dweight += 1;
                }
            } else if c == b'.' {
                if have_dp {
                    return Err(syntax_error(text));
                }
                have_dp = true;
            } else {
                break;
            }
            i += 1;
        }

        let ddigits = (decdigits.len() - DEC_DIGITS as usize) as i32;
        decdigits.extend_from_slice(&[0; (DEC_DIGITS - 1) as usize]);

        if matches!(b.get(i), Some(b'e') | Some(b'E')) {
            i += 1;
            let mut negative = false;
            if let Some(&c) = b.get(i) {
                if c == b'+' || c == b'-' {
                    negative = c == b'-';
                    i += 1;
                }
            }
            let start = i;
            let mut exponent: i64 = 0;
            while let Some(&c) = b.get(i) {
                if !c.is_ascii_digit() {
                    break;
                }
                exponent = exponent.saturating_mul(10).saturating_add((c - b'0') as i64);
                i += 1;
            }
            if i == start {
                return Err(syntax_error(text));
            }
            if negative {
                exponent = -exponent;
            }
            if exponent.abs() > NUMERIC_MAX_PRECISION as i64 {
                return Err(syntax_error(text));
            }
            let exponent = exponent as i32;
            dweight += exponent;
            dscale = (dscale - exponent).max(0);
        }

        let weight = if dweight >= 0 {
            (dweight + DEC_DIGITS) / DEC_DIGITS - 1
        } else {
            -((-dweight - 1) / DEC_DIGITS + 1)
        };
        let offset = (weight + 1) * DEC_DIGITS - (dweight + 1);
        let ndigits = ((ddigits + offset + DEC_DIGITS - 1) / DEC_DIGITS) as usize;

        let mut digits = Vec::with_capacity(ndigits);
        let mut pos = (DEC_DIGITS - offset) as usize;
        for _ in 0..ndigits {
            let group = &decdigits[pos..pos + DEC_DIGITS as usize];
            let digit = group.iter().fold(0u16, |acc, d| acc * 10 + *d as u16);
            digits.push(digit);
            pos += DEC_DIGITS as usize;
        }

        let mut var = NumericVar {
            sign,
            weight,
            dscale,
            digits,
        };
        var.strip();
        Ok((var, i))
    }
}

impl FromStr for NumericVar {
    type Err = Error;

    /// Parses a complete decimal literal; trailing characters are an error.
    fn from_str(text: &str) -> Result<Self> {
        let (var, used) = NumericVar::parse_prefix(text)?;
        if used != text.len() {
            return Err(syntax_error(text));
        }
        Ok(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> NumericVar {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_grouping() {
        let v = parse("123.45");
        assert_eq!(v.digits(), &[123, 4500]);
        assert_eq!(v.weight(), 0);
        assert_eq!(v.dscale(), 2);
        assert_eq!(v.sign(), NumericSign::Positive);

        let v = parse("12345678.9");
        assert_eq!(v.digits(), &[1234, 5678, 9000]);
        assert_eq!(v.weight(), 1);
        assert_eq!(v.dscale(), 1);
    }

    #[test]
    fn test_parse_small_fraction() {
        let v = parse("0.00012");
        assert_eq!(v.digits(), &[1, 2000]);
        assert_eq!(v.weight(), -1);
        assert_eq!(v.dscale(), 5);

        let v = parse("-.5");
        assert_eq!(v.digits(), &[5000]);
        assert_eq!(v.weight(), -1);
        assert!(v.is_negative());
    }

    #[test]
    fn test_parse_zero() {
        let v = parse("-0.000");
        assert!(v.is_zero());
        assert_eq!(v.sign(), NumericSign::Positive);
        assert_eq!(v.weight(), 0);
        assert_eq!(v.dscale(), 3);
    }

    #[test]
    fn test_parse_exponent() {
        let v = parse("1.5e3");
        assert_eq!(v.digits(), &[1500]);
        assert_eq!(v.weight(), 0);
        assert_eq!(v.dscale(), 0);

        let v = parse("25E-6");
        assert_eq!(v.digits(), &[2500]);
        assert_eq!(v.weight(), -2);
        assert_eq!(v.dscale(), 6);

        let v = parse("1e+1000");
        assert_eq!(v.weight(), 250);
    }

    #[test]
    fn test_parse_nan() {
        assert!(parse("NaN").is_nan());
        assert!(parse("nan").is_nan());
    }

    #[test]
    fn test_parse_rejects() {
        for bad in ["", "-", ".", "abc", "1.2.3", "1e", "1e+", "1e1001", "1e-1001", "12x"] {
            assert!(bad.parse::<NumericVar>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_prefix_stops_at_junk() {
        let (v, used) = NumericVar::parse_prefix("42 rows").unwrap();
        assert_eq!(used, 2);
        assert_eq!(v.digits(), &[42]);
    }
}
