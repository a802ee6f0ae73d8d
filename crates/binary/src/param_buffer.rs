//! Accumulator for the binary parameters of one statement execution.
//!
//! Encoded values are appended to one growable byte arena. Each parameter
//! records an offset into the arena rather than an address, so growth never
//! invalidates earlier entries. Slices are only handed out by
//! [`ParameterBuffer::finalize`], whose borrow keeps the arena frozen for as
//! long as they live.

use crate::array::ArrayEncoder;
use crate::registry::TypeRegistry;
use crate::value::Value;
use alloc::vec::Vec;
use pqbin_core::byteorder::try_reserve;
use pqbin_core::{DataType, Error, Oid, Result};

/// Format code of a binary parameter.
pub const FORMAT_BINARY: i32 = 1;
/// Length recorded for a SQL NULL parameter.
pub const NULL_LENGTH: i32 = -1;

/// Metadata of one parameter in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedParameter {
    pub oid: Oid,
    /// Byte offset into the arena.
    pub offset: usize,
    /// Byte length, or [`NULL_LENGTH`].
    pub length: i32,
    pub format: i32,
}

impl EncodedParameter {
    #[inline]
    pub fn is_null(&self) -> bool {
        self.length == NULL_LENGTH
    }
}

/// Arena position captured by [`ParameterBuffer::begin_value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueCursor(usize);

/// Growable arena of encoded parameter values.
///
/// Every append reserves its bytes first, so allocation failure surfaces as
/// [`Error::OutOfMemory`] and leaves the buffer unchanged.
#[derive(Debug, Default)]
pub struct ParameterBuffer {
    payload: Vec<u8>,
    params: Vec<EncodedParameter>,
    /// Upper bound on the arena size, `None` for unbounded.
    payload_limit: Option<usize>,
    finalized: bool,
}

/// The four parallel arrays handed to a statement executor.
#[derive(Debug, PartialEq)]
pub struct FinalizedParams<'a> {
    pub types: Vec<Oid>,
    /// Value bytes, `None` for SQL NULL.
    pub values: Vec<Option<&'a [u8]>>,
    /// Byte lengths; 0 for SQL NULL.
    pub lengths: Vec<i32>,
    pub formats: Vec<i32>,
}

impl FinalizedParams<'_> {
    /// Returns the number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Collaborator that runs a statement with binary parameters.
pub trait StatementExecutor {
    type Output;

    fn execute(&mut self, statement: &str, params: &FinalizedParams<'_>) -> Result<Self::Output>;
}

impl ParameterBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `bytes` of encoded values.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            payload: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Caps the arena at `bytes`; appends past the cap fail with
    /// [`Error::OutOfMemory`].
    pub fn with_payload_limit(mut self, bytes: usize) -> Self {
        self.payload_limit = Some(bytes);
        self
    }

    /// Returns the number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of encoded bytes in the arena.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns the metadata entries.
    #[inline]
    pub fn parameters(&self) -> &[EncodedParameter] {
        &self.params
    }

    fn check_open(&self) -> Result<()> {
        if self.finalized {
            return Err(Error::BufferFinalized);
        }
        Ok(())
    }

    fn reserve_entry(&mut self) -> Result<()> {
        self.params
            .try_reserve(1)
            .map_err(|_| Error::out_of_memory(core::mem::size_of::<EncodedParameter>()))
    }

    fn reserve_payload(&mut self, additional: usize) -> Result<()> {
        if let Some(limit) = self.payload_limit {
            if self.payload.len().saturating_add(additional) > limit {
                return Err(Error::out_of_memory(additional));
            }
        }
        try_reserve(&mut self.payload, additional)
    }

    /// Records the current write position for a value about to be appended.
    pub fn begin_value(&mut self) -> Result<ValueCursor> {
        self.check_open()?;
        Ok(ValueCursor(self.payload.len()))
    }

    /// Returns the arena for appending the bytes of the current value.
    pub fn payload_mut(&mut self) -> Result<&mut Vec<u8>> {
        self.check_open()?;
        Ok(&mut self.payload)
    }

    /// Appends bytes to the current value, reporting allocation failure.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_open()?;
        self.reserve_payload(bytes.len())?;
        self.payload.extend_from_slice(bytes);
        Ok(())
    }

    /// Records everything appended since `cursor` as one parameter of type `oid`.
    ///
    /// A cursor taken before the last [`ParameterBuffer::reset`] that points
    /// past the arena is rejected with [`Error::InvalidOperation`].
    pub fn commit_value(&mut self, cursor: ValueCursor, oid: Oid) -> Result<()> {
        self.check_open()?;
        let written = self.payload.len().checked_sub(cursor.0).ok_or_else(|| {
            Error::invalid_operation(alloc::format!(
                "cursor at {} is past the end of the {}-byte arena",
                cursor.0,
                self.payload.len()
            ))
        })?;
        let length = i32::try_from(written)
            .map_err(|_| Error::out_of_range("parameter", "value longer than 2^31-1 bytes"))?;
        self.reserve_entry()?;
        self.params.push(EncodedParameter {
            oid,
            offset: cursor.0,
            length,
            format: FORMAT_BINARY,
        });
        tracing::trace!(oid, length, index = self.params.len() - 1, "committed parameter");
        Ok(())
    }

    /// Records a SQL NULL parameter of type `oid`.
    pub fn commit_null(&mut self, oid: Oid) -> Result<()> {
        self.check_open()?;
        self.reserve_entry()?;
        self.params.push(EncodedParameter {
            oid,
            offset: self.payload.len(),
            length: NULL_LENGTH,
            format: FORMAT_BINARY,
        });
        tracing::trace!(oid, index = self.params.len() - 1, "committed null parameter");
        Ok(())
    }

    /// Encodes and records `value`. On failure the buffer is unchanged.
    pub fn add_value(&mut self, value: &Value) -> Result<()> {
        let cursor = self.begin_value()?;
        self.reserve_payload(value.encoded_len())?;
        let result = value
            .encode_into(&mut self.payload)
            .and_then(|_| self.commit_value(cursor, value.oid()));
        if result.is_err() {
            self.payload.truncate(cursor.0);
        }
        result
    }

    /// Records `value`, or a NULL of `data_type` when it is `None`.
    pub fn add_optional(&mut self, data_type: DataType, value: Option<&Value>) -> Result<()> {
        match value {
            Some(v) => self.add_value(v),
            None => self.commit_null(data_type.oid()),
        }
    }

    /// Records already-encoded bytes as one parameter of type `oid`.
    pub fn add_encoded(&mut self, oid: Oid, bytes: &[u8]) -> Result<()> {
        let cursor = self.begin_value()?;
        self.append(bytes)?;
        self.commit_value(cursor, oid).map_err(|e| {
            self.payload.truncate(cursor.0);
            e
        })
    }

    /// Encodes a one-dimensional array of `element` values, with lower bound 1,
    /// as one parameter. The array type is looked up in `registry`.
    pub fn add_array(
        &mut self,
        registry: &TypeRegistry,
        element: DataType,
        items: &[Option<Value>],
    ) -> Result<()> {
        let array_oid = registry.array_of(element.oid()).ok_or_else(|| {
            Error::invalid_operation(alloc::format!("no array type for {}", element.name()))
        })?;
        let mut encoder = ArrayEncoder::one_dim(element.oid(), items.len())?;
        for item in items {
            encoder.push_optional(item.as_ref())?;
        }
        let bytes = encoder.finish()?;
        self.add_encoded(array_oid, &bytes)
    }

    /// Returns the type and bytes of parameter `index`; bytes are `None` for NULL.
    pub fn get(&self, index: usize) -> Option<(Oid, Option<&[u8]>)> {
        let p = self.params.get(index)?;
        Some((p.oid, self.slice(p)))
    }

    fn slice(&self, p: &EncodedParameter) -> Option<&[u8]> {
        if p.is_null() {
            None
        } else {
            Some(&self.payload[p.offset..p.offset + p.length as usize])
        }
    }

    /// Stops further appends and resolves every parameter to its bytes.
    ///
    /// Calling it again returns the same view.
    pub fn finalize(&mut self) -> FinalizedParams<'_> {
        if !self.finalized {
            self.finalized = true;
            tracing::debug!(
                params = self.params.len(),
                bytes = self.payload.len(),
                "finalized parameter buffer"
            );
        }
        let this = &*self;
        FinalizedParams {
            types: this.params.iter().map(|p| p.oid).collect(),
            values: this.params.iter().map(|p| this.slice(p)).collect(),
            lengths: this.params.iter().map(|p| p.length.max(0)).collect(),
            formats: this.params.iter().map(|p| p.format).collect(),
        }
    }

    /// Finalizes the buffer and runs `statement` through `executor`.
    pub fn execute_with<E: StatementExecutor>(
        &mut self,
        executor: &mut E,
        statement: &str,
    ) -> Result<E::Output> {
        let params = self.finalize();
        executor.execute(statement, &params)
    }

    /// Clears every parameter and reopens the buffer for appends.
    pub fn reset(&mut self) {
        tracing::debug!(params = self.params.len(), "reset parameter buffer");
        self.payload.clear();
        self.params.clear();
        self.finalized = false;
    }
}
