//! Packed storage form of a numeric value.
//!
//! The packed form is a sequence of 16-bit words: a header, an optional
//! weight word, then the stripped digits. Two header layouts exist:
//!
//! ```text
//! short: 1 0 S D D D D D D W W W W W W W   (sign, dscale <= 63, weight in -64..=63)
//! long:  S S D D D D D D D D D D D D D D   followed by an int16 weight word
//! NaN:   1 1 0 0 0 0 0 0 0 0 0 0 0 0 0 0   (header only)
//! ```

use crate::var::{NumericSign, NumericVar, NUMERIC_DSCALE_MASK};
use alloc::vec::Vec;
use pqbin_core::{Error, Result};

const NUMERIC_SIGN_MASK: u16 = 0xC000;
const NUMERIC_SHORT: u16 = 0x8000;
const NUMERIC_NAN: u16 = 0xC000;

const SHORT_SIGN_MASK: u16 = 0x2000;
const SHORT_DSCALE_MASK: u16 = 0x1F80;
const SHORT_DSCALE_SHIFT: u16 = 7;
const SHORT_DSCALE_MAX: i32 = (SHORT_DSCALE_MASK >> SHORT_DSCALE_SHIFT) as i32;
const SHORT_WEIGHT_SIGN_MASK: u16 = 0x0040;
const SHORT_WEIGHT_MASK: u16 = 0x003F;
const SHORT_WEIGHT_MAX: i32 = SHORT_WEIGHT_MASK as i32;
const SHORT_WEIGHT_MIN: i32 = -(SHORT_WEIGHT_MASK as i32 + 1);

/// A numeric value in packed storage form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedNumeric {
    words: Vec<u16>,
}

impl PackedNumeric {
    /// Packs `var`, choosing the short header when scale and weight allow.
    ///
    /// Leading and trailing zero digits are dropped; a zero packs with weight 0
    /// and a positive sign. Fails if weight or display scale overflow the
    /// header fields.
    pub fn pack(var: &NumericVar) -> Result<Self> {
        if var.is_nan() {
            return Ok(Self {
                words: alloc::vec![NUMERIC_NAN],
            });
        }

        let mut digits = var.digits();
        let mut weight = var.weight();
        let mut sign = var.sign();
        while let Some((&0, rest)) = digits.split_first() {
            digits = rest;
            weight -= 1;
        }
        while let Some((&0, rest)) = digits.split_last() {
            digits = rest;
        }
        if digits.is_empty() {
            weight = 0;
            sign = NumericSign::Positive;
        }

        let dscale = var.dscale();
        let mut words = Vec::with_capacity(digits.len() + 2);
        if dscale <= SHORT_DSCALE_MAX && (SHORT_WEIGHT_MIN..=SHORT_WEIGHT_MAX).contains(&weight) {
            let mut header = NUMERIC_SHORT;
            if sign == NumericSign::Negative {
                header |= SHORT_SIGN_MASK;
            }
            header |= (dscale as u16) << SHORT_DSCALE_SHIFT;
            if weight < 0 {
                header |= SHORT_WEIGHT_SIGN_MASK;
            }
            header |= (weight as u16) & SHORT_WEIGHT_MASK;
            words.push(header);
        } else {
            words.push(sign.to_wire() | (dscale as u16 & NUMERIC_DSCALE_MASK));
            words.push(weight as i16 as u16);
        }
        words.extend_from_slice(digits);

        let packed = Self { words };
        if packed.weight() != weight || packed.dscale() != dscale {
            return Err(Error::out_of_range("numeric", "value overflows numeric format"));
        }
        Ok(packed)
    }

    #[inline]
    fn header(&self) -> u16 {
        self.words[0]
    }

    /// Returns true for the NaN header.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.header() & NUMERIC_SIGN_MASK == NUMERIC_NAN
    }

    /// Returns true if the short header layout is in use.
    #[inline]
    pub fn is_short(&self) -> bool {
        self.header() & NUMERIC_SIGN_MASK == NUMERIC_SHORT
    }

    fn header_words(&self) -> usize {
        if self.is_short() || self.is_nan() {
            1
        } else {
            2
        }
    }

    pub fn sign(&self) -> NumericSign {
        if self.is_short() {
            if self.header() & SHORT_SIGN_MASK != 0 {
                NumericSign::Negative
            } else {
                NumericSign::Positive
            }
        } else {
            NumericSign::from_wire(self.header() & NUMERIC_SIGN_MASK)
                .unwrap_or(NumericSign::NaN)
        }
    }

    pub fn weight(&self) -> i32 {
        if self.is_short() {
            let magnitude = (self.header() & SHORT_WEIGHT_MASK) as i32;
            if self.header() & SHORT_WEIGHT_SIGN_MASK != 0 {
                !(SHORT_WEIGHT_MASK as i32) | magnitude
            } else {
                magnitude
            }
        } else if self.is_nan() {
            0
        } else {
            self.words[1] as i16 as i32
        }
    }

    pub fn dscale(&self) -> i32 {
        if self.is_short() {
            ((self.header() & SHORT_DSCALE_MASK) >> SHORT_DSCALE_SHIFT) as i32
        } else if self.is_nan() {
            0
        } else {
            (self.header() & NUMERIC_DSCALE_MASK) as i32
        }
    }

    pub fn digits(&self) -> &[u16] {
        &self.words[self.header_words()..]
    }

    /// Returns the raw 16-bit words.
    #[inline]
    pub fn as_words(&self) -> &[u16] {
        &self.words
    }

    /// Unpacks into a working value.
    pub fn unpack(&self) -> NumericVar {
        if self.is_nan() {
            return NumericVar::nan();
        }
        NumericVar {
            sign: self.sign(),
            weight: self.weight(),
            dscale: self.dscale(),
            digits: self.digits().to_vec(),
        }
    }
}

impl NumericVar {
    /// Packs the value, see [`PackedNumeric::pack`].
    pub fn pack(&self) -> Result<PackedNumeric> {
        PackedNumeric::pack(self)
    }
}
