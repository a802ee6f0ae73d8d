//! Array wire format.
//!
//! ```text
//! int32 ndim | int32 flags | uint32 element oid
//! { int32 size | int32 lower_bound } x ndim
//! { int32 length (-1 = null) | length bytes } x product(size)
//! ```
//!
//! A dimension of size zero makes the whole array empty: no element data
//! follows the header.

use crate::value::Value;
use alloc::format;
use alloc::vec::Vec;
use pqbin_core::byteorder::{put_i32, put_u32, try_reserve};
use pqbin_core::{DataType, Error, Oid, Result, WireReader};

/// Largest number of dimensions.
pub const MAX_DIM: usize = 6;

/// Header flags.
pub mod flags {
    pub const HAS_NULLS: i32 = 1 << 0;
}

/// Length word of a null element.
const NULL_ITEM: i32 = -1;

fn reject(message: alloc::string::String) -> Error {
    let err = Error::invalid_binary("array", message);
    tracing::warn!(error = %err, "rejected array wire value");
    err
}

/// Size and starting index of one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayDim {
    pub size: i32,
    pub lower_bound: i32,
}

impl ArrayDim {
    pub fn new(size: i32, lower_bound: i32) -> Self {
        Self { size, lower_bound }
    }
}

/// Array header: flags, element type and dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayHeader {
    pub flags: i32,
    pub element_oid: Oid,
    dims: Vec<ArrayDim>,
}

impl ArrayHeader {
    /// Creates a header, rejecting more than [`MAX_DIM`] dimensions, negative
    /// sizes and element counts that overflow.
    pub fn new(element_oid: Oid, dims: Vec<ArrayDim>) -> Result<Self> {
        let header = Self {
            flags: 0,
            element_oid,
            dims,
        };
        header.validate().map_err(Error::invalid_operation)?;
        Ok(header)
    }

    /// Creates a one-dimensional header with lower bound 1.
    pub fn one_dim(element_oid: Oid, len: usize) -> Result<Self> {
        let size = i32::try_from(len)
            .map_err(|_| Error::out_of_range("array", "too many elements"))?;
        Self::new(element_oid, alloc::vec![ArrayDim::new(size, 1)])
    }

    fn validate(&self) -> core::result::Result<usize, alloc::string::String> {
        if self.dims.len() > MAX_DIM {
            return Err(format!(
                "number of dimensions ({}) exceeds the maximum allowed ({})",
                self.dims.len(),
                MAX_DIM
            ));
        }
        if self.dims.is_empty() {
            return Ok(0);
        }
        let mut count: usize = 1;
        for dim in &self.dims {
            if dim.size < 0 {
                return Err(format!("negative dimension size {}", dim.size));
            }
            if dim.lower_bound.checked_add(dim.size).is_none() {
                return Err(format!(
                    "lower bound {} plus size {} overflows",
                    dim.lower_bound, dim.size
                ));
            }
            count = count
                .checked_mul(dim.size as usize)
                .filter(|c| *c <= i32::MAX as usize)
                .ok_or_else(|| alloc::string::String::from("array size exceeds the maximum allowed"))?;
        }
        Ok(count)
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn dims(&self) -> &[ArrayDim] {
        &self.dims
    }

    /// Returns the number of elements: the product of the dimension sizes,
    /// or 0 for a zero-dimensional array.
    pub fn element_count(&self) -> usize {
        if self.dims.is_empty() {
            return 0;
        }
        self.dims.iter().map(|d| d.size as usize).product()
    }

    /// Returns true if no element data follows the header.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Returns the encoded header length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        12 + 8 * self.dims.len()
    }

    /// Appends the header to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        put_i32(buf, self.dims.len() as i32);
        put_i32(buf, self.flags);
        put_u32(buf, self.element_oid);
        for dim in &self.dims {
            put_i32(buf, dim.size);
            put_i32(buf, dim.lower_bound);
        }
    }

    /// Reads a header from the front of `bytes`, returning it and the element
    /// data that follows.
    pub fn decode(bytes: &[u8]) -> Result<(ArrayHeader, &[u8])> {
        let mut reader = WireReader::new(bytes, "array header");
        let ndim = reader.read_i32()?;
        if ndim < 0 || ndim as usize > MAX_DIM {
            return Err(reject(format!("invalid number of dimensions: {}", ndim)));
        }
        let flags = reader.read_i32()?;
        if flags != 0 && flags != flags::HAS_NULLS {
            return Err(reject(format!("invalid array flags {}", flags)));
        }
        let element_oid = reader.read_u32()?;

        let mut dims = Vec::with_capacity(ndim as usize);
        for _ in 0..ndim {
            let size = reader.read_i32()?;
            let lower_bound = reader.read_i32()?;
            dims.push(ArrayDim { size, lower_bound });
        }

        let header = ArrayHeader {
            flags,
            element_oid,
            dims,
        };
        header.validate().map_err(reject)?;
        Ok((header, reader.rest()))
    }
}

/// One element of an array: its payload, or `None` for null.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayItem<'a>(pub Option<&'a [u8]>);

impl<'a> ArrayItem<'a> {
    /// Returns the wire length word: -1 for null.
    #[inline]
    pub fn len(&self) -> i32 {
        match self.0 {
            Some(bytes) => bytes.len() as i32,
            None => NULL_ITEM,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub fn bytes(&self) -> Option<&'a [u8]> {
        self.0
    }

    /// Decodes the payload as a value of `data_type`.
    pub fn value(&self, data_type: DataType) -> Result<Option<Value>> {
        self.0.map(|b| Value::decode(data_type, b)).transpose()
    }
}

/// Reads one length-prefixed element from the front of `bytes`, returning it
/// and the bytes where the next element starts.
pub fn decode_item(bytes: &[u8]) -> Result<(ArrayItem<'_>, &[u8])> {
    let mut reader = WireReader::new(bytes, "array element");
    let len = reader.read_i32()?;
    if len == NULL_ITEM {
        return Ok((ArrayItem(None), reader.rest()));
    }
    if len < 0 {
        return Err(reject(format!("invalid element length {}", len)));
    }
    let payload = reader.read_bytes(len as usize)?;
    Ok((ArrayItem(Some(payload)), reader.rest()))
}

/// Builds an encoded array element by element.
///
/// The header is written ahead of the first element; the null flag is
/// patched in by [`ArrayEncoder::finish`]. Every allocation goes through
/// `try_reserve`, so running out of memory is reported as
/// [`Error::OutOfMemory`].
#[derive(Debug)]
pub struct ArrayEncoder {
    buf: Vec<u8>,
    header: ArrayHeader,
    expected: usize,
    written: usize,
    has_nulls: bool,
}

impl ArrayEncoder {
    /// Starts an array with the given header. Nothing is allocated until the
    /// first element or [`ArrayEncoder::finish`].
    pub fn new(header: ArrayHeader) -> Self {
        let expected = header.element_count();
        Self {
            buf: Vec::new(),
            header,
            expected,
            written: 0,
            has_nulls: false,
        }
    }

    /// Starts a one-dimensional array of `len` elements with lower bound 1.
    pub fn one_dim(element_oid: Oid, len: usize) -> Result<Self> {
        Ok(Self::new(ArrayHeader::one_dim(element_oid, len)?))
    }

    #[inline]
    pub fn header(&self) -> &ArrayHeader {
        &self.header
    }

    /// Makes room for `additional` more bytes, writing the header first if
    /// the buffer is still empty.
    fn reserve(&mut self, additional: usize) -> Result<()> {
        if self.buf.is_empty() {
            try_reserve(&mut self.buf, self.header.wire_len().saturating_add(additional))?;
            self.header.encode(&mut self.buf);
            Ok(())
        } else {
            try_reserve(&mut self.buf, additional)
        }
    }

    fn check_room(&self) -> Result<()> {
        if self.written >= self.expected {
            return Err(Error::invalid_operation(format!(
                "array declares {} elements",
                self.expected
            )));
        }
        Ok(())
    }

    /// Appends a null element.
    pub fn push_null(&mut self) -> Result<()> {
        self.check_room()?;
        self.reserve(4)?;
        put_i32(&mut self.buf, NULL_ITEM);
        self.has_nulls = true;
        self.written += 1;
        Ok(())
    }

    /// Appends an element whose payload is written by `encode`; the length
    /// word is filled in afterwards. On failure the array is unchanged.
    pub fn push_with<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        self.check_room()?;
        self.reserve(4)?;
        let len_pos = self.buf.len();
        put_i32(&mut self.buf, 0);
        let start = self.buf.len();
        let result = encode(&mut self.buf).and_then(|_| {
            i32::try_from(self.buf.len() - start)
                .map_err(|_| Error::out_of_range("array", "element longer than 2^31-1 bytes"))
        });
        match result {
            Ok(len) => {
                self.buf[len_pos..start].copy_from_slice(&len.to_be_bytes());
                self.written += 1;
                Ok(())
            }
            Err(e) => {
                self.buf.truncate(len_pos);
                Err(e)
            }
        }
    }

    /// Appends an element from already-encoded bytes.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.push_with(|buf| {
            try_reserve(buf, bytes.len())?;
            buf.extend_from_slice(bytes);
            Ok(())
        })
    }

    /// Appends a value, which must have the array's element type.
    pub fn push_value(&mut self, value: &Value) -> Result<()> {
        if value.oid() != self.header.element_oid {
            return Err(Error::invalid_operation(format!(
                "element of type {} in array of type {}",
                value.oid(),
                self.header.element_oid
            )));
        }
        self.push_with(|buf| value.encode_into(buf))
    }

    /// Appends a value or, for `None`, a null.
    pub fn push_optional(&mut self, value: Option<&Value>) -> Result<()> {
        match value {
            Some(v) => self.push_value(v),
            None => self.push_null(),
        }
    }

    /// Returns the encoded array once every declared element is written.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.written != self.expected {
            return Err(Error::invalid_operation(format!(
                "array declares {} elements, {} written",
                self.expected, self.written
            )));
        }
        self.reserve(0)?;
        if self.has_nulls {
            self.header.flags |= flags::HAS_NULLS;
            self.buf[4..8].copy_from_slice(&self.header.flags.to_be_bytes());
        }
        Ok(self.buf)
    }
}

/// Sequential reader over the elements of an encoded array.
#[derive(Clone, Debug)]
pub struct ArrayDecoder<'a> {
    header: ArrayHeader,
    rest: &'a [u8],
    remaining: usize,
}

impl<'a> ArrayDecoder<'a> {
    /// Reads and validates the header of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let (header, rest) = ArrayHeader::decode(bytes)?;
        let remaining = header.element_count();
        Ok(Self {
            header,
            rest,
            remaining,
        })
    }

    #[inline]
    pub fn header(&self) -> &ArrayHeader {
        &self.header
    }

    /// Returns true for an array with no elements, as opposed to an array
    /// of one zero-length element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// Returns the number of elements not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Returns the bytes after the elements read so far.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        self.rest
    }

    /// Reads every element as a value of the header's element type.
    pub fn into_values(self) -> Result<Vec<Option<Value>>> {
        let oid = self.header.element_oid;
        let data_type = DataType::from_oid(oid).ok_or_else(|| {
            Error::invalid_operation(format!("no binary codec for element type {}", oid))
        })?;
        let mut values = Vec::with_capacity(self.remaining.min(self.rest.len() / 4));
        for item in self {
            values.push(item?.value(data_type)?);
        }
        Ok(values)
    }
}

impl<'a> Iterator for ArrayDecoder<'a> {
    type Item = Result<ArrayItem<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match decode_item(self.rest) {
            Ok((item, rest)) => {
                self.rest = rest;
                self.remaining -= 1;
                Some(Ok(item))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use pqbin_core::oid;

    #[test]
    fn test_empty_array() {
        let header = ArrayHeader::new(oid::INT4, vec![ArrayDim::new(0, 1)]).unwrap();
        let bytes = ArrayEncoder::new(header).finish().unwrap();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 23, 0, 0, 0, 0, 0, 0, 0, 1]
        );

        let decoder = ArrayDecoder::new(&bytes).unwrap();
        assert!(decoder.is_empty());
        assert_eq!(decoder.header().dims()[0], ArrayDim::new(0, 1));
        assert_eq!(decoder.count(), 0);
    }

    #[test]
    fn test_one_empty_element_is_not_empty_array() {
        let mut enc = ArrayEncoder::one_dim(oid::TEXT, 1).unwrap();
        enc.push_bytes(&[]).unwrap();
        let bytes = enc.finish().unwrap();

        let mut decoder = ArrayDecoder::new(&bytes).unwrap();
        assert!(!decoder.is_empty());
        let item = decoder.next().unwrap().unwrap();
        assert_eq!(item, ArrayItem(Some(&[][..])));
        assert_eq!(item.len(), 0);
        assert!(decoder.next().is_none());
    }

    #[test]
    fn test_two_dim_with_nulls() {
        let header = ArrayHeader::new(
            oid::INT2,
            vec![ArrayDim::new(2, 0), ArrayDim::new(3, -1)],
        )
        .unwrap();
        assert_eq!(header.element_count(), 6);

        let mut enc = ArrayEncoder::new(header.clone());
        for i in 0..6i16 {
            if i % 4 == 1 {
                enc.push_null().unwrap();
            } else {
                enc.push_value(&Value::Int2(i)).unwrap();
            }
        }
        let bytes = enc.finish().unwrap();

        let decoder = ArrayDecoder::new(&bytes).unwrap();
        assert_eq!(decoder.header().flags, flags::HAS_NULLS);
        assert_eq!(decoder.header().dims(), header.dims());
        let values = decoder.into_values().unwrap();
        assert_eq!(
            values,
            vec![
                Some(Value::Int2(0)),
                None,
                Some(Value::Int2(2)),
                Some(Value::Int2(3)),
                Some(Value::Int2(4)),
                None,
            ]
        );
    }

    #[test]
    fn test_decode_item_chain() {
        let mut enc = ArrayEncoder::one_dim(oid::TEXT, 2).unwrap();
        enc.push_null().unwrap();
        enc.push_value(&Value::from("ab")).unwrap();
        let bytes = enc.finish().unwrap();

        let (_, data) = ArrayHeader::decode(&bytes).unwrap();
        let (first, rest) = decode_item(data).unwrap();
        assert_eq!(first.len(), -1);
        assert!(first.is_null());
        let (second, rest) = decode_item(rest).unwrap();
        assert_eq!(second.bytes(), Some(&b"ab"[..]));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_encoder_count_checks() {
        let mut enc = ArrayEncoder::one_dim(oid::INT4, 1).unwrap();
        enc.push_value(&Value::Int4(1)).unwrap();
        assert!(enc.push_value(&Value::Int4(2)).is_err());

        let enc = ArrayEncoder::one_dim(oid::INT4, 2).unwrap();
        assert!(enc.finish().is_err());

        let mut enc = ArrayEncoder::one_dim(oid::INT4, 1).unwrap();
        assert!(enc.push_value(&Value::Int8(1)).is_err());
    }

    #[test]
    fn test_header_validation() {
        let dims = vec![ArrayDim::new(1, 1); 7];
        assert!(ArrayHeader::new(oid::INT4, dims).is_err());
        assert!(ArrayHeader::new(oid::INT4, vec![ArrayDim::new(-1, 1)]).is_err());
        assert!(ArrayHeader::new(oid::INT4, vec![ArrayDim::new(1, i32::MAX)]).is_err());
        let dims = vec![ArrayDim::new(65536, 1), ArrayDim::new(65536, 1)];
        assert!(ArrayHeader::new(oid::INT4, dims).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let mut bytes = Vec::new();
        put_i32(&mut bytes, 7);
        put_i32(&mut bytes, 0);
        put_u32(&mut bytes, oid::INT4);
        assert!(matches!(
            ArrayHeader::decode(&bytes),
            Err(Error::InvalidBinary { .. })
        ));

        let mut bytes = Vec::new();
        put_i32(&mut bytes, 1);
        put_i32(&mut bytes, 0);
        put_u32(&mut bytes, oid::INT4);
        put_i32(&mut bytes, -3);
        put_i32(&mut bytes, 1);
        assert!(ArrayHeader::decode(&bytes).is_err());

        let mut item = Vec::new();
        put_i32(&mut item, -2);
        assert!(decode_item(&item).is_err());

        let mut item = Vec::new();
        put_i32(&mut item, 10);
        item.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(decode_item(&item), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_truncated_element_data_stops_iteration() {
        let mut enc = ArrayEncoder::one_dim(oid::INT4, 2).unwrap();
        enc.push_value(&Value::Int4(1)).unwrap();
        enc.push_value(&Value::Int4(2)).unwrap();
        let bytes = enc.finish().unwrap();
        let cut = &bytes[..bytes.len() - 2];

        let mut decoder = ArrayDecoder::new(cut).unwrap();
        assert!(decoder.next().unwrap().is_ok());
        assert!(decoder.next().unwrap().is_err());
        assert!(decoder.next().is_none());
    }
}
