//! Typed row writer on top of [`CopyFrame`].

use crate::framer::CopyFrame;
use crate::options::CopyConfig;
use crate::sink::CopySink;
use alloc::format;
use alloc::vec::Vec;
use pqbin_binary::{
    ArrayEncoder, Date, Interval, Time, TimeTz, Timestamp, TimestampTz, TypeRegistry, Value,
    WireValue,
};
use pqbin_core::byteorder::try_reserve;
use pqbin_core::{DataType, Error, Result};
use pqbin_numeric::NumericVar;

/// Writes whole rows of typed values into a COPY stream.
///
/// Unlike [`CopyFrame::put_column`], which starts a new tuple on its own,
/// the writer expects every row to be closed with [`CopyWriter::end_row`]
/// after exactly the configured number of fields.
#[derive(Debug)]
pub struct CopyWriter<S: CopySink> {
    frame: CopyFrame<S>,
    scratch: Vec<u8>,
    in_row: usize,
    rows: u64,
}

impl<S: CopySink> CopyWriter<S> {
    pub fn new(sink: S, config: CopyConfig) -> Self {
        Self {
            frame: CopyFrame::new(sink, config),
            scratch: Vec::new(),
            in_row: 0,
            rows: 0,
        }
    }

    #[inline]
    pub fn frame(&self) -> &CopyFrame<S> {
        &self.frame
    }

    /// Returns the number of completed rows.
    #[inline]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_sink(self) -> S {
        self.frame.into_sink()
    }

    fn check_room(&self) -> Result<()> {
        if self.in_row >= self.frame.columns() {
            return Err(Error::invalid_operation(format!(
                "row already has {} fields",
                self.frame.columns()
            )));
        }
        Ok(())
    }

    fn put(&mut self, value: Option<&[u8]>) -> Result<()> {
        self.check_room()?;
        self.frame.put_column(value)?;
        self.in_row += 1;
        Ok(())
    }

    /// Encodes one field into the scratch buffer and frames it.
    fn put_with<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        self.check_room()?;
        let mut scratch = core::mem::take(&mut self.scratch);
        scratch.clear();
        let result = encode(&mut scratch).and_then(|_| self.put(Some(&scratch)));
        self.scratch = scratch;
        result
    }

    fn put_scalar<T: WireValue>(&mut self, value: &T) -> Result<()> {
        self.put_with(|buf| {
            try_reserve(buf, T::DATA_TYPE.fixed_size().unwrap_or(0))?;
            value.encode(buf);
            Ok(())
        })
    }

    pub fn write_null(&mut self) -> Result<()> {
        self.put(None)
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.put_scalar(&v)
    }

    /// Writes UTF-8 text without a terminator.
    pub fn write_text(&mut self, v: &str) -> Result<()> {
        self.put(Some(v.as_bytes()))
    }

    pub fn write_bytea(&mut self, v: &[u8]) -> Result<()> {
        self.put(Some(v))
    }

    pub fn write_numeric(&mut self, v: &NumericVar) -> Result<()> {
        self.put_with(|buf| pqbin_numeric::encode_wire(v, buf))
    }

    pub fn write_date(&mut self, v: Date) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_time(&mut self, v: Time) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_timetz(&mut self, v: TimeTz) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_timestamp(&mut self, v: Timestamp) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_timestamptz(&mut self, v: TimestampTz) -> Result<()> {
        self.put_scalar(&v)
    }

    pub fn write_interval(&mut self, v: Interval) -> Result<()> {
        self.put_scalar(&v)
    }

    /// Writes any value in the wire form of its own type.
    pub fn write_value(&mut self, v: &Value) -> Result<()> {
        self.put_with(|buf| v.encode_into(buf))
    }

    /// Writes `v`, or a null field when it is `None`.
    pub fn write_optional(&mut self, v: Option<&Value>) -> Result<()> {
        match v {
            Some(v) => self.write_value(v),
            None => self.write_null(),
        }
    }

    /// Writes a one-dimensional array of `element` values with lower bound 1.
    pub fn write_array(
        &mut self,
        registry: &TypeRegistry,
        element: DataType,
        items: &[Option<Value>],
    ) -> Result<()> {
        if registry.array_of(element.oid()).is_none() {
            return Err(Error::invalid_operation(format!(
                "no array type for {}",
                element.name()
            )));
        }
        let mut encoder = ArrayEncoder::one_dim(element.oid(), items.len())?;
        for item in items {
            encoder.push_optional(item.as_ref())?;
        }
        let bytes = encoder.finish()?;
        self.write_bytea(&bytes)
    }

    /// Closes the current row, which must hold exactly the configured number
    /// of fields.
    pub fn end_row(&mut self) -> Result<()> {
        if self.in_row != self.frame.columns() {
            return Err(Error::invalid_operation(format!(
                "row has {} of {} fields",
                self.in_row,
                self.frame.columns()
            )));
        }
        self.in_row = 0;
        self.rows += 1;
        Ok(())
    }

    /// Ends the stream. A partly written row is rejected before anything is
    /// sent.
    pub fn finish(&mut self) -> Result<()> {
        if self.in_row != 0 {
            return Err(Error::invalid_operation(format!(
                "row has {} of {} fields",
                self.in_row,
                self.frame.columns()
            )));
        }
        self.frame.finish()?;
        tracing::debug!(rows = self.rows, "copy writer finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framer::COPY_HEADER_LEN;
    use crate::options::CopyOptions;
    use crate::sink::MemorySink;
    use pqbin_binary::ArrayDecoder;

    fn writer(columns: usize) -> CopyWriter<MemorySink> {
        let config = CopyOptions::new(columns).build().unwrap();
        CopyWriter::new(MemorySink::new(), config)
    }

    fn body(w: CopyWriter<MemorySink>) -> Vec<u8> {
        w.into_sink().concat()[COPY_HEADER_LEN..].to_vec()
    }

    #[test]
    fn test_typed_fields() {
        let mut w = writer(4);
        w.write_i16(-1).unwrap();
        w.write_bool(true).unwrap();
        w.write_text("ab").unwrap();
        w.write_null().unwrap();
        w.end_row().unwrap();
        w.finish().unwrap();
        assert_eq!(w.rows(), 1);
        assert_eq!(
            body(w),
            [
                0, 4, //
                0, 0, 0, 2, 0xFF, 0xFF, //
                0, 0, 0, 1, 1, //
                0, 0, 0, 2, b'a', b'b', //
                0xFF, 0xFF, 0xFF, 0xFF,
            ]
        );
    }

    #[test]
    fn test_values_match_scalar_codecs() {
        let numeric: NumericVar = "12.5".parse().unwrap();
        let mut w = writer(3);
        w.write_numeric(&numeric).unwrap();
        w.write_value(&Value::Numeric(numeric.clone())).unwrap();
        w.write_optional(None).unwrap();
        w.end_row().unwrap();
        w.finish().unwrap();

        let wire = numeric.to_wire().unwrap();
        let body = body(w);
        let field = 2 + 4;
        assert_eq!(&body[field..field + wire.len()], &wire[..]);
        let second = field + wire.len() + 4;
        assert_eq!(&body[second..second + wire.len()], &wire[..]);
    }

    #[test]
    fn test_row_width_enforced() {
        let mut w = writer(2);
        w.write_i32(1).unwrap();
        assert!(w.end_row().is_err());
        assert!(w.finish().is_err());
        w.write_i32(2).unwrap();
        assert!(w.write_i32(3).is_err());
        w.end_row().unwrap();
        w.write_i64(4).unwrap();
        w.write_i64(5).unwrap();
        w.end_row().unwrap();
        assert_eq!(w.rows(), 2);
        w.finish().unwrap();
        assert_eq!(w.write_null(), Err(Error::StreamFinished));
    }

    #[test]
    fn test_failed_encode_writes_nothing() {
        let huge = NumericVar::from_parts(
            pqbin_numeric::NumericSign::Positive,
            100_000,
            0,
            alloc::vec![1],
        )
        .unwrap();
        let mut w = writer(1);
        assert!(w.write_numeric(&huge).is_err());
        assert_eq!(w.frame().buffered(), COPY_HEADER_LEN);
        w.write_null().unwrap();
        w.end_row().unwrap();
    }

    #[test]
    fn test_array_field() {
        let registry = TypeRegistry::builtin();
        let mut w = writer(1);
        w.write_array(&registry, DataType::Int4, &[Some(Value::Int4(9)), None])
            .unwrap();
        w.end_row().unwrap();
        w.finish().unwrap();

        let body = body(w);
        let len = i32::from_be_bytes([body[2], body[3], body[4], body[5]]) as usize;
        let values = ArrayDecoder::new(&body[6..6 + len])
            .unwrap()
            .into_values()
            .unwrap();
        assert_eq!(values, alloc::vec![Some(Value::Int4(9)), None]);
    }
}
