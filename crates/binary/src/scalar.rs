//! Fixed-width and text scalar codecs.
//!
//! Every fixed-width type is the big-endian image of its native value.
//! Variable-length payloads (text, bytea, numeric) carry no length of their
//! own; the parameter, array or copy layer supplies it.

use alloc::format;
use alloc::vec::Vec;
use pqbin_core::byteorder::{put_f32, put_f64, put_i16, put_i32, put_i64, put_u32};
use pqbin_core::{byteorder, DataType, Error, Oid, Result};
use pqbin_numeric::NumericVar;

/// A native type with a binary wire codec.
pub trait WireValue: Sized {
    /// Catalog type the value is sent as.
    const DATA_TYPE: DataType;

    /// Appends the wire form to `buf`.
    fn encode(&self, buf: &mut Vec<u8>);

    /// Decodes from exactly the bytes of one value.
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// Returns the type identifier of `DATA_TYPE`.
    #[inline]
    fn oid() -> Oid {
        Self::DATA_TYPE.oid()
    }
}

/// Value returned by [`decode_or_sentinel`] when there is no source.
pub trait NullSentinel {
    const NULL_SENTINEL: Self;
}

/// Decodes `src`, or returns the type's sentinel when `src` is `None`.
///
/// Use this when a missing value must map to an in-band marker rather than
/// an `Option`.
pub fn decode_or_sentinel<T: WireValue + NullSentinel>(src: Option<&[u8]>) -> Result<T> {
    match src {
        Some(bytes) => T::decode(bytes),
        None => Ok(T::NULL_SENTINEL),
    }
}

/// Checks `bytes` holds exactly `N` bytes and copies them out.
pub(crate) fn exact<const N: usize>(bytes: &[u8], type_name: &'static str) -> Result<[u8; N]> {
    if bytes.len() < N {
        return Err(Error::truncated(type_name, N, bytes.len()));
    }
    if bytes.len() > N {
        return Err(Error::invalid_binary(
            type_name,
            format!("expected {} bytes, got {}", N, bytes.len()),
        ));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

impl WireValue for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(*self as u8);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(exact::<1>(bytes, "boolean")?[0] != 0)
    }
}

impl NullSentinel for bool {
    const NULL_SENTINEL: Self = false;
}

impl WireValue for i16 {
    const DATA_TYPE: DataType = DataType::Int2;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i16(buf, *self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i16::from_be_bytes(exact(bytes, "smallint")?))
    }
}

impl NullSentinel for i16 {
    const NULL_SENTINEL: Self = i16::MIN;
}

impl WireValue for i32 {
    const DATA_TYPE: DataType = DataType::Int4;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i32(buf, *self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i32::from_be_bytes(exact(bytes, "integer")?))
    }
}

impl NullSentinel for i32 {
    const NULL_SENTINEL: Self = i32::MIN;
}

impl WireValue for i64 {
    const DATA_TYPE: DataType = DataType::Int8;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_i64(buf, *self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(i64::from_be_bytes(exact(bytes, "bigint")?))
    }
}

impl NullSentinel for i64 {
    const NULL_SENTINEL: Self = i64::MIN;
}

/// `u32` travels as the catalog identifier type `oid`.
impl WireValue for u32 {
    const DATA_TYPE: DataType = DataType::Oid;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_u32(buf, *self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(u32::from_be_bytes(exact(bytes, "oid")?))
    }
}

impl NullSentinel for u32 {
    const NULL_SENTINEL: Self = u32::MAX;
}

impl WireValue for f32 {
    const DATA_TYPE: DataType = DataType::Float4;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_f32(buf, *self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(byteorder::f32_from_wire(exact(bytes, "real")?))
    }
}

impl NullSentinel for f32 {
    const NULL_SENTINEL: Self = f32::MIN_POSITIVE;
}

impl WireValue for f64 {
    const DATA_TYPE: DataType = DataType::Float8;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_f64(buf, *self);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(byteorder::f64_from_wire(exact(bytes, "double precision")?))
    }
}

impl NullSentinel for f64 {
    const NULL_SENTINEL: Self = f64::MIN_POSITIVE;
}

/// A single bit, sent as one byte holding the bit in its lowest position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bit(pub bool);

impl WireValue for Bit {
    const DATA_TYPE: DataType = DataType::Bit;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.0 as u8 & 0x1);
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Bit(exact::<1>(bytes, "bit")?[0] & 0x1 != 0))
    }
}

impl NullSentinel for Bit {
    const NULL_SENTINEL: Self = Bit(false);
}

/// Appends UTF-8 text without a terminator.
#[inline]
pub fn encode_text(text: &str, buf: &mut Vec<u8>) {
    buf.extend_from_slice(text.as_bytes());
}

/// Appends UTF-8 text followed by a NUL byte, for contexts that carry no
/// length.
#[inline]
pub fn encode_cstr(text: &str, buf: &mut Vec<u8>) {
    buf.extend_from_slice(text.as_bytes());
    buf.push(0);
}

/// Decodes UTF-8 text, stopping at the first NUL byte if there is one.
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    core::str::from_utf8(&bytes[..end])
        .map_err(|e| Error::invalid_binary("text", format!("invalid UTF-8: {}", e)))
}

/// Appends raw bytes verbatim.
#[inline]
pub fn encode_bytea(data: &[u8], buf: &mut Vec<u8>) {
    buf.extend_from_slice(data);
}

/// Returns raw bytes verbatim; an empty slice is an empty value, not a null.
#[inline]
pub fn decode_bytea(bytes: &[u8]) -> &[u8] {
    bytes
}

/// Encodes a float as a `numeric` wire value with 15 significant digits.
pub fn encode_numeric_f64(v: f64, buf: &mut Vec<u8>) -> Result<()> {
    let var = NumericVar::from_f64(v)?;
    pqbin_numeric::encode_wire(&var, buf)
}

/// Decodes a `numeric` wire value to the nearest float after applying
/// `typmod`; a missing source yields `f64::MIN_POSITIVE`.
pub fn decode_numeric_f64(src: Option<&[u8]>, typmod: i32) -> Result<f64> {
    match src {
        Some(bytes) => Ok(pqbin_numeric::decode_wire_with_typmod(bytes, typmod)?.to_f64()),
        None => Ok(f64::MIN_POSITIVE),
    }
}
