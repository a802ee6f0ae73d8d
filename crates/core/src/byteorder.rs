//! Big-endian conversion between native values and wire bytes.
//!
//! Every multi-byte integer on the wire is big-endian. Floats travel as the
//! big-endian bytes of their same-width unsigned bit pattern, so no value-level
//! rounding happens in either direction.

use crate::error::{Error, Result};
use alloc::vec::Vec;

/// Appends a big-endian `i16`.
#[inline]
pub fn put_i16(buf: &mut Vec<u8>, v: i16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a big-endian `u16`.
#[inline]
pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a big-endian `i32`.
#[inline]
pub fn put_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a big-endian `u32`.
#[inline]
pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a big-endian `i64`.
#[inline]
pub fn put_i64(buf: &mut Vec<u8>, v: i64) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends an `f32` as its big-endian bit pattern.
#[inline]
pub fn put_f32(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&f32_to_wire(v));
}

/// Appends an `f64` as its big-endian bit pattern.
#[inline]
pub fn put_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&f64_to_wire(v));
}

/// Reinterprets an `f32` as wire bytes.
#[inline]
pub fn f32_to_wire(v: f32) -> [u8; 4] {
    v.to_bits().to_be_bytes()
}

/// Reinterprets wire bytes as an `f32`.
#[inline]
pub fn f32_from_wire(b: [u8; 4]) -> f32 {
    f32::from_bits(u32::from_be_bytes(b))
}

/// Reinterprets an `f64` as wire bytes.
#[inline]
pub fn f64_to_wire(v: f64) -> [u8; 8] {
    v.to_bits().to_be_bytes()
}

/// Reinterprets wire bytes as an `f64`.
#[inline]
pub fn f64_from_wire(b: [u8; 8]) -> f64 {
    f64::from_bits(u64::from_be_bytes(b))
}

/// Reserves room for `additional` more bytes, reporting allocation failure
/// instead of aborting.
pub fn try_reserve(buf: &mut Vec<u8>, additional: usize) -> Result<()> {
    buf.try_reserve(additional)
        .map_err(|_| Error::out_of_memory(buf.len().saturating_add(additional)))
}

/// Sequential big-endian reader over a borrowed byte slice.
///
/// Each read either consumes exactly the bytes of the value or fails with
/// [`Error::Truncated`] and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    context: &'static str,
}

macro_rules! read_fixed {
    ($name:ident, $ty:ty, $n:expr) => {
        /// Reads a big-endian value and advances the cursor.
        #[inline]
        pub fn $name(&mut self) -> Result<$ty> {
            let raw = self.take_array::<$n>()?;
            Ok(<$ty>::from_be_bytes(raw))
        }
    };
}

impl<'a> WireReader<'a> {
    /// Creates a reader; `context` names the value in truncation errors.
    pub fn new(bytes: &'a [u8], context: &'static str) -> Self {
        Self {
            bytes,
            pos: 0,
            context,
        }
    }

    /// Returns the number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Returns true if every byte has been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the unread tail without consuming it.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Fails unless at least `n` bytes remain.
    pub fn ensure(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::truncated(self.context, n, self.remaining()));
        }
        Ok(())
    }

    /// Consumes and returns the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads one byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    read_fixed!(read_i16, i16, 2);
    read_fixed!(read_u16, u16, 2);
    read_fixed!(read_i32, i32, 4);
    read_fixed!(read_u32, u32, 4);
    read_fixed!(read_i64, i64, 8);

    /// Reads an `f32` from its big-endian bit pattern.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32_from_wire(self.take_array::<4>()?))
    }

    /// Reads an `f64` from its big-endian bit pattern.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64_from_wire(self.take_array::<8>()?))
    }
}
