//! Binary wire format of `numeric`.
//!
//! ```text
//! int16 ndigits | int16 weight | int16 sign | int16 dscale | int16 digits[ndigits]
//! ```
//!
//! All fields are big-endian. `sign` is `0x0000`, `0x4000` or `0xC000` (NaN).

use crate::var::{
    NumericSign, NumericVar, NBASE, NUMERIC_DSCALE_MASK, NUMERIC_MAX_WIRE_DIGITS,
};
use alloc::vec::Vec;
use pqbin_core::byteorder::{put_i16, put_u16, try_reserve};
use pqbin_core::{Error, Result, WireReader};

const HEADER_LEN: usize = 8;

fn reject(message: impl Into<alloc::string::String>) -> Error {
    let err = Error::invalid_binary("numeric", message);
    tracing::warn!(error = %err, "rejected numeric wire value");
    err
}

/// Decodes a wire value.
///
/// Digits hidden by the display scale are truncated away, never rounded.
/// Bytes after the last digit are ignored.
pub fn decode_wire(bytes: &[u8]) -> Result<NumericVar> {
    decode_wire_with_typmod(bytes, -1)
}

/// Decodes a wire value, then rounds and range-checks it against `typmod`.
///
/// A typmod below 4 applies no constraint.
pub fn decode_wire_with_typmod(bytes: &[u8], typmod: i32) -> Result<NumericVar> {
    let mut reader = WireReader::new(bytes, "numeric");

    let ndigits = reader.read_u16()? as usize;
    if ndigits > NUMERIC_MAX_WIRE_DIGITS {
        return Err(reject(alloc::format!("invalid length {}", ndigits)));
    }
    let weight = reader.read_i16()? as i32;

    let tag = reader.read_u16()?;
    let sign = NumericSign::from_wire(tag)
        .ok_or_else(|| reject(alloc::format!("invalid sign 0x{:04X}", tag)))?;

    let dscale = reader.read_u16()?;
    if dscale & NUMERIC_DSCALE_MASK != dscale {
        return Err(reject(alloc::format!("invalid scale {}", dscale)));
    }

    reader.ensure(ndigits * 2)?;
    let mut digits = Vec::with_capacity(ndigits);
    for _ in 0..ndigits {
        let d = reader.read_i16()?;
        if d < 0 || d as u16 >= NBASE {
            return Err(reject(alloc::format!("invalid digit {}", d)));
        }
        digits.push(d as u16);
    }

    if sign == NumericSign::NaN {
        return Ok(NumericVar::nan());
    }

    let mut var = NumericVar {
        sign,
        weight,
        dscale: dscale as i32,
        digits,
    };
    var.truncate(dscale as i32);
    var.apply_typmod(typmod)?;
    Ok(var)
}

/// Appends the wire form of `var` to `buf`.
///
/// Fails if the digit count, weight or display scale does not fit its
/// 16-bit field, or if `buf` cannot grow; `buf` is unchanged on failure.
pub fn encode_wire(var: &NumericVar, buf: &mut Vec<u8>) -> Result<()> {
    let ndigits = i16::try_from(var.digits.len())
        .map_err(|_| Error::out_of_range("numeric", "too many digits for wire format"))?;
    let weight = i16::try_from(var.weight)
        .map_err(|_| Error::out_of_range("numeric", "weight overflows wire format"))?;
    let dscale = u16::try_from(var.dscale)
        .ok()
        .filter(|d| d & NUMERIC_DSCALE_MASK == *d)
        .ok_or_else(|| Error::out_of_range("numeric", "display scale overflows wire format"))?;

    try_reserve(buf, HEADER_LEN + var.digits.len() * 2)?;
    put_i16(buf, ndigits);
    put_i16(buf, weight);
    put_u16(buf, var.sign.to_wire());
    put_u16(buf, dscale);
    for &d in &var.digits {
        put_u16(buf, d);
    }
    Ok(())
}

impl NumericVar {
    /// Returns the wire form as a new buffer.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        encode_wire(self, &mut buf)?;
        Ok(buf)
    }
}
