//! The in-memory arbitrary-precision decimal.

use alloc::vec::Vec;
use pqbin_core::{Error, Result};

/// Radix of one stored digit.
pub const NBASE: u16 = 10000;
/// Half of [`NBASE`], the round-half-up threshold for whole digits.
pub const HALF_NBASE: u16 = 5000;
/// Decimal digits per stored digit.
pub const DEC_DIGITS: i32 = 4;
/// Largest precision (and exponent magnitude) accepted by the text parser.
pub const NUMERIC_MAX_PRECISION: i32 = 1000;
/// Largest digit count accepted in a wire value.
pub const NUMERIC_MAX_WIRE_DIGITS: usize = 2000;
/// Bits of the display scale that may be set on the wire.
pub const NUMERIC_DSCALE_MASK: u16 = 0x3FFF;

/// Powers of ten used to round within one stored digit, indexed by the
/// number of decimal digits kept from it.
pub(crate) const ROUND_POWERS: [u16; 4] = [0, 1000, 100, 10];

/// Sign tag of a numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericSign {
    Positive,
    Negative,
    NaN,
}

impl NumericSign {
    /// Returns the 16-bit wire tag.
    #[inline]
    pub fn to_wire(self) -> u16 {
        match self {
            NumericSign::Positive => 0x0000,
            NumericSign::Negative => 0x4000,
            NumericSign::NaN => 0xC000,
        }
    }

    /// Parses a 16-bit wire tag.
    #[inline]
    pub fn from_wire(tag: u16) -> Option<Self> {
        match tag {
            0x0000 => Some(NumericSign::Positive),
            0x4000 => Some(NumericSign::Negative),
            0xC000 => Some(NumericSign::NaN),
            _ => None,
        }
    }
}

/// An arbitrary-precision decimal held as base-10000 digits.
///
/// The value is `sign * sum(digits[i] * NBASE^(weight - i))`, rendered with
/// `dscale` digits after the decimal point. Digits outside the stored array
/// are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericVar {
    pub(crate) sign: NumericSign,
    pub(crate) weight: i32,
    pub(crate) dscale: i32,
    pub(crate) digits: Vec<u16>,
}

impl Default for NumericVar {
    fn default() -> Self {
        Self::zero()
    }
}

impl NumericVar {
    /// Creates the value zero with scale 0.
    pub const fn zero() -> Self {
        Self {
            sign: NumericSign::Positive,
            weight: 0,
            dscale: 0,
            digits: Vec::new(),
        }
    }

    /// Creates the not-a-number value.
    pub const fn nan() -> Self {
        Self {
            sign: NumericSign::NaN,
            weight: 0,
            dscale: 0,
            digits: Vec::new(),
        }
    }

    /// Creates a value from its parts, then strips leading and trailing
    /// zero digits.
    ///
    /// Fails if any digit is not below [`NBASE`] or `dscale` is negative.
    /// A NaN sign discards the other parts.
    pub fn from_parts(
        sign: NumericSign,
        weight: i32,
        dscale: i32,
        digits: Vec<u16>,
    ) -> Result<Self> {
        if sign == NumericSign::NaN {
            return Ok(Self::nan());
        }
        if dscale < 0 {
            return Err(Error::out_of_range("numeric", "negative display scale"));
        }
        if let Some(d) = digits.iter().find(|d| **d >= NBASE) {
            return Err(Error::invalid_binary(
                "numeric",
                alloc::format!("invalid digit {}", d),
            ));
        }
        let mut var = Self {
            sign,
            weight,
            dscale,
            digits,
        };
        var.strip();
        Ok(var)
    }

    /// Returns the sign tag.
    #[inline]
    pub fn sign(&self) -> NumericSign {
        self.sign
    }

    /// Returns the power-of-NBASE position of the first digit.
    #[inline]
    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Returns the display scale.
    #[inline]
    pub fn dscale(&self) -> i32 {
        self.dscale
    }

    /// Returns the stored digits.
    #[inline]
    pub fn digits(&self) -> &[u16] {
        &self.digits
    }

    /// Returns the number of stored digits.
    #[inline]
    pub fn ndigits(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.sign == NumericSign::NaN
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign == NumericSign::Negative
    }

    /// Returns true for zero at any scale.
    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.is_nan() && self.digits.iter().all(|d| *d == 0)
    }

    /// Drops leading and trailing zero digits. A value left without digits
    /// becomes a positive zero of weight 0; the display scale is kept.
    pub fn strip(&mut self) {
        if self.is_nan() {
            return;
        }
        let leading = self.digits.iter().take_while(|d| **d == 0).count();
        if leading > 0 {
            self.digits.drain(..leading);
            self.weight -= leading as i32;
        }
        while self.digits.last() == Some(&0) {
            self.digits.pop();
        }
        if self.digits.is_empty() {
            self.weight = 0;
            self.sign = NumericSign::Positive;
        }
    }

    /// Sets the value to zero, keeping the display scale.
    pub(crate) fn set_zero(&mut self) {
        self.digits.clear();
        self.weight = 0;
        self.sign = NumericSign::Positive;
    }
}
