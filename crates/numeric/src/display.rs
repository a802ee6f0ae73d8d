//! [`NumericVar`] to decimal text.

use crate::var::{NumericVar, DEC_DIGITS};
use alloc::string::String;
use core::fmt;

impl NumericVar {
    /// Renders the value with exactly `dscale` digits after the decimal point.
    ///
    /// Digits past the stored array are printed as zeros; NaN renders as `NaN`.
    pub fn to_text(&self) -> String {
        if self.is_nan() {
            return String::from("NaN");
        }

        let dscale = self.dscale.max(0) as usize;
        let int_groups = if self.weight >= 0 { self.weight as usize + 1 } else { 1 };
        let mut out = String::with_capacity(1 + int_groups * DEC_DIGITS as usize + 1 + dscale + 3);

        if self.is_negative() {
            out.push('-');
        }

        let digit_at = |d: i32| -> u16 {
            if d >= 0 && (d as usize) < self.digits.len() {
                self.digits[d as usize]
            } else {
                0
            }
        };

        let mut d: i32;
        if self.weight < 0 {
            d = self.weight + 1;
            out.push('0');
        } else {
            d = 0;
            while d <= self.weight {
                let dig = digit_at(d);
                // leading zeros only in the first group
                let mut putit = d > 0;
                let mut rem = dig;
                for pow in [1000u16, 100, 10] {
                    let q = rem / pow;
                    rem -= q * pow;
                    putit |= q > 0;
                    if putit {
                        out.push((b'0' + q as u8) as char);
                    }
                }
                out.push((b'0' + rem as u8) as char);
                d += 1;
            }
        }

        if dscale > 0 {
            out.push('.');
            let end = out.len() + dscale;
            let mut written = 0;
            while written < dscale {
                let mut rem = digit_at(d);
                for pow in [1000u16, 100, 10] {
                    let q = rem / pow;
                    rem -= q * pow;
                    out.push((b'0' + q as u8) as char);
                }
                out.push((b'0' + rem as u8) as char);
                written += DEC_DIGITS as usize;
                d += 1;
            }
            out.truncate(end);
        }

        out
    }
}

impl fmt::Display for NumericVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::NumericSign;
    use alloc::string::ToString;
    use alloc::vec;

    fn text(s: &str) -> String {
        s.parse::<NumericVar>().unwrap().to_text()
    }

    #[test]
    fn test_text_round_trip() {
        for s in ["123.45", "0", "-1", "0.00012", "10000", "-98765.4321", "0.5"] {
            assert_eq!(text(s), s);
        }
    }

    #[test]
    fn test_text_normalizes() {
        assert_eq!(text("-0.00"), "0.00");
        assert_eq!(text("+007"), "7");
        assert_eq!(text(".5"), "0.5");
        assert_eq!(text("1.5e3"), "1500");
        assert_eq!(text("25e-6"), "0.000025");
    }

    #[test]
    fn test_text_pads_scale() {
        let var = NumericVar::from_parts(NumericSign::Positive, 0, 6, vec![3, 1400]).unwrap();
        assert_eq!(var.to_text(), "3.140000");
    }

    #[test]
    fn test_text_hides_digits_beyond_scale() {
        let var = NumericVar::from_parts(NumericSign::Positive, 0, 1, vec![3, 1415]).unwrap();
        assert_eq!(var.to_text(), "3.1");
    }

    #[test]
    fn test_nan_text() {
        assert_eq!(NumericVar::nan().to_text(), "NaN");
        assert_eq!(NumericVar::nan().to_string(), "NaN");
    }
}
