//! Scale adjustment: rounding, truncation and typmod enforcement.

use crate::var::{NumericVar, DEC_DIGITS, HALF_NBASE, NBASE, ROUND_POWERS};
use pqbin_core::{Error, Result};

/// Size of the length word the server folds into every typmod.
const VARHDRSZ: i32 = 4;

/// Builds the typmod for `numeric(precision, scale)`.
pub fn numeric_typmod(precision: u16, scale: u16) -> i32 {
    (((precision as i32) << 16) | scale as i32) + VARHDRSZ
}

/// Splits a positive decimal cut position into the number of base-NBASE
/// digits to keep and the decimal places kept in the last of them.
fn split_cut(di: i64) -> (usize, usize) {
    let digits = DEC_DIGITS as i64;
    let keep = usize::try_from((di + digits - 1) / digits).unwrap_or(usize::MAX);
    (keep, (di % digits) as usize)
}

impl NumericVar {
    /// Decimal digits, counted from the first stored digit, that survive a
    /// cut at `rscale` places after the point.
    fn cut_position(&self, rscale: i32) -> i64 {
        (self.weight as i64 + 1) * DEC_DIGITS as i64 + rscale as i64
    }

    /// Rounds half away from zero to `rscale` digits after the decimal point.
    ///
    /// A negative `rscale` rounds to the left of the point. The display scale
    /// becomes `max(rscale, 0)`. NaN is left unchanged.
    pub fn round(&mut self, rscale: i32) {
        if self.is_nan() {
            return;
        }
        self.dscale = rscale.max(0);

        let di = self.cut_position(rscale);
        if di < 0 {
            self.set_zero();
            return;
        }

        let (keep, partial) = split_cut(di);

        if keep < self.digits.len() || (keep == self.digits.len() && partial > 0) {
            let mut carry;
            // index one past the next digit to receive a carry
            let mut pos;

            if partial == 0 {
                carry = self.digits[keep] >= HALF_NBASE;
                self.digits.truncate(keep);
                pos = keep;
            } else {
                self.digits.truncate(keep);
                pos = keep - 1;
                let pow10 = ROUND_POWERS[partial];
                let extra = self.digits[pos] % pow10;
                self.digits[pos] -= extra;
                carry = false;
                if extra >= pow10 / 2 {
                    let bumped = self.digits[pos] + pow10;
                    if bumped >= NBASE {
                        self.digits[pos] = bumped - NBASE;
                        carry = true;
                    } else {
                        self.digits[pos] = bumped;
                    }
                }
            }

            while carry {
                if pos == 0 {
                    self.digits.insert(0, 1);
                    self.weight += 1;
                    break;
                }
                pos -= 1;
                let bumped = self.digits[pos] + 1;
                if bumped >= NBASE {
                    self.digits[pos] = 0;
                } else {
                    self.digits[pos] = bumped;
                    carry = false;
                }
            }
        }

        self.strip();
    }

    /// Drops digits beyond `rscale` places after the decimal point without
    /// rounding.
    ///
    /// A negative `rscale` truncates to the left of the point. The display
    /// scale becomes `max(rscale, 0)`. NaN is left unchanged.
    pub fn truncate(&mut self, rscale: i32) {
        if self.is_nan() {
            return;
        }
        self.dscale = rscale.max(0);

        let di = self.cut_position(rscale);
        if di <= 0 {
            self.set_zero();
            return;
        }

        let (keep, partial) = split_cut(di);
        if keep <= self.digits.len() {
            self.digits.truncate(keep);
            if partial > 0 {
                let last = keep - 1;
                self.digits[last] -= self.digits[last] % ROUND_POWERS[partial];
            }
        }

        self.strip();
    }

    /// Rounds to the scale of `typmod` and checks the integer digits fit its
    /// precision.
    ///
    /// A typmod below 4 means "unconstrained" and leaves the value alone.
    pub fn apply_typmod(&mut self, typmod: i32) -> Result<()> {
        if typmod < VARHDRSZ {
            return Ok(());
        }

        let typmod = typmod - VARHDRSZ;
        let precision = (typmod >> 16) & 0xffff;
        let scale = typmod & 0xffff;
        let maxdigits = precision - scale;

        self.round(scale);

        let mut ddigits = (self.weight + 1) * DEC_DIGITS;
        if ddigits > maxdigits {
            for &dig in &self.digits {
                if dig != 0 {
                    if dig < 10 {
                        ddigits -= 3;
                    } else if dig < 100 {
                        ddigits -= 2;
                    } else if dig < 1000 {
                        ddigits -= 1;
                    }
                    if ddigits > maxdigits {
                        return Err(Error::out_of_range(
                            "numeric",
                            alloc::format!(
                                "a field with precision {}, scale {} must round to an absolute value less than 10^{}",
                                precision, scale, maxdigits
                            ),
                        ));
                    }
                    break;
                }
                ddigits -= DEC_DIGITS;
            }
        }
        Ok(())
    }
}
