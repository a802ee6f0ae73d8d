//! Composite (record) wire format.
//!
//! ```text
//! int32 ncolumns
//! { uint32 oid | int32 length (-1 = null) | length bytes } x ncolumns
//! ```

use crate::value::Value;
use alloc::format;
use alloc::vec::Vec;
use pqbin_core::byteorder::{put_i32, put_u32, try_reserve};
use pqbin_core::{Error, Oid, Result, WireReader};

const NULL_COLUMN: i32 = -1;

/// One column of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositeField<'a> {
    pub oid: Oid,
    /// Column bytes, `None` for null.
    pub data: Option<&'a [u8]>,
}

impl CompositeField<'_> {
    /// Decodes the column as a value of its own type.
    pub fn value(&self) -> Result<Option<Value>> {
        self.data.map(|b| Value::decode_oid(self.oid, b)).transpose()
    }
}

/// Reads one column from the front of `bytes`, returning it and the bytes
/// where the next column starts.
pub fn decode_field(bytes: &[u8]) -> Result<(CompositeField<'_>, &[u8])> {
    let mut reader = WireReader::new(bytes, "record column");
    let oid = reader.read_u32()?;
    let len = reader.read_i32()?;
    let data = match len {
        NULL_COLUMN => None,
        n if n < 0 => {
            return Err(Error::invalid_binary(
                "record",
                format!("invalid column length {}", n),
            ))
        }
        n => Some(reader.read_bytes(n as usize)?),
    };
    Ok((CompositeField { oid, data }, reader.rest()))
}

/// Builds an encoded record column by column.
///
/// The column count is written as a placeholder ahead of the first column and
/// filled in by [`CompositeEncoder::finish`]. Allocation failure is reported
/// as [`Error::OutOfMemory`] and leaves the record unchanged.
#[derive(Debug, Default)]
pub struct CompositeEncoder {
    buf: Vec<u8>,
    columns: i32,
}

impl CompositeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of columns written so far.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns as usize
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        if self.buf.is_empty() {
            try_reserve(&mut self.buf, additional.saturating_add(4))?;
            put_i32(&mut self.buf, 0);
            Ok(())
        } else {
            try_reserve(&mut self.buf, additional)
        }
    }

    fn column_header(&mut self, oid: Oid, len: i32) {
        put_u32(&mut self.buf, oid);
        put_i32(&mut self.buf, len);
    }

    /// Appends a null column of type `oid`.
    pub fn push_null(&mut self, oid: Oid) -> Result<()> {
        self.reserve(8)?;
        self.column_header(oid, NULL_COLUMN);
        self.columns += 1;
        Ok(())
    }

    /// Appends a column from already-encoded bytes.
    pub fn push_bytes(&mut self, oid: Oid, bytes: &[u8]) -> Result<()> {
        let len = i32::try_from(bytes.len())
            .map_err(|_| Error::out_of_range("record", "column longer than 2^31-1 bytes"))?;
        self.reserve(8 + bytes.len())?;
        self.column_header(oid, len);
        self.buf.extend_from_slice(bytes);
        self.columns += 1;
        Ok(())
    }

    /// Appends a column holding `value`. On failure the record is unchanged.
    pub fn push_value(&mut self, value: &Value) -> Result<()> {
        let len = i32::try_from(value.encoded_len())
            .map_err(|_| Error::out_of_range("record", "column longer than 2^31-1 bytes"))?;
        self.reserve(8 + len as usize)?;
        let start = self.buf.len();
        self.column_header(value.oid(), len);
        if let Err(e) = value.encode_into(&mut self.buf) {
            self.buf.truncate(start);
            return Err(e);
        }
        self.columns += 1;
        Ok(())
    }

    /// Returns the encoded record.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.reserve(0)?;
        self.buf[0..4].copy_from_slice(&self.columns.to_be_bytes());
        Ok(self.buf)
    }
}

/// Sequential reader over the columns of an encoded record.
#[derive(Clone, Debug)]
pub struct CompositeDecoder<'a> {
    rest: &'a [u8],
    columns: usize,
    remaining: usize,
}

impl<'a> CompositeDecoder<'a> {
    /// Reads the column count of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let mut reader = WireReader::new(bytes, "record header");
        let columns = reader.read_i32()?;
        if columns < 0 {
            return Err(Error::invalid_binary(
                "record",
                format!("invalid number of columns {}", columns),
            ));
        }
        Ok(Self {
            rest: reader.rest(),
            columns: columns as usize,
            remaining: columns as usize,
        })
    }

    /// Returns the declared number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Reads every column as a value of its own type.
    pub fn into_values(self) -> Result<Vec<Option<Value>>> {
        let mut values = Vec::with_capacity(self.remaining.min(self.rest.len() / 8));
        for field in self {
            values.push(field?.value()?);
        }
        Ok(values)
    }
}

impl<'a> Iterator for CompositeDecoder<'a> {
    type Item = Result<CompositeField<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match decode_field(self.rest) {
            Ok((field, rest)) => {
                self.rest = rest;
                self.remaining -= 1;
                Some(Ok(field))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}
