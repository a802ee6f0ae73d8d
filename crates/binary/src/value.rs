//! Dynamically typed wire values.

use crate::datetime::{Date, Interval, Time, TimeTz, Timestamp, TimestampTz};
use crate::scalar::{decode_text, Bit, WireValue};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use pqbin_core::byteorder::try_reserve;
use pqbin_core::{DataType, Error, Oid, Result};
use pqbin_numeric::NumericVar;

/// A value of any catalog type.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Bytea(Vec<u8>),
    Name(String),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Oid(u32),
    Text(String),
    Bpchar(String),
    Varchar(String),
    Float4(f32),
    Float8(f64),
    Date(Date),
    Time(Time),
    TimeTz(TimeTz),
    Timestamp(Timestamp),
    TimestampTz(TimestampTz),
    Interval(Interval),
    Bit(Bit),
    Numeric(NumericVar),
}

impl Value {
    /// Returns the catalog type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Bytea(_) => DataType::Bytea,
            Value::Name(_) => DataType::Name,
            Value::Int2(_) => DataType::Int2,
            Value::Int4(_) => DataType::Int4,
            Value::Int8(_) => DataType::Int8,
            Value::Oid(_) => DataType::Oid,
            Value::Text(_) => DataType::Text,
            Value::Bpchar(_) => DataType::Bpchar,
            Value::Varchar(_) => DataType::Varchar,
            Value::Float4(_) => DataType::Float4,
            Value::Float8(_) => DataType::Float8,
            Value::Date(_) => DataType::Date,
            Value::Time(_) => DataType::Time,
            Value::TimeTz(_) => DataType::TimeTz,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::TimestampTz(_) => DataType::TimestampTz,
            Value::Interval(_) => DataType::Interval,
            Value::Bit(_) => DataType::Bit,
            Value::Numeric(_) => DataType::Numeric,
        }
    }

    /// Returns the type identifier of this value.
    #[inline]
    pub fn oid(&self) -> Oid {
        self.data_type().oid()
    }

    /// Returns the number of bytes [`Value::encode_into`] appends.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::Bytea(v) => v.len(),
            Value::Name(v) | Value::Text(v) | Value::Bpchar(v) | Value::Varchar(v) => v.len(),
            Value::Numeric(v) => 8 + 2 * v.digits().len(),
            other => other.data_type().fixed_size().unwrap_or(0),
        }
    }

    /// Appends the wire form to `buf`. On failure, including allocation
    /// failure, `buf` is unchanged.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        try_reserve(buf, self.encoded_len())?;
        match self {
            Value::Bool(v) => v.encode(buf),
            Value::Bytea(v) => buf.extend_from_slice(v),
            Value::Name(v) | Value::Text(v) | Value::Bpchar(v) | Value::Varchar(v) => {
                buf.extend_from_slice(v.as_bytes())
            }
            Value::Int2(v) => v.encode(buf),
            Value::Int4(v) => v.encode(buf),
            Value::Int8(v) => v.encode(buf),
            Value::Oid(v) => v.encode(buf),
            Value::Float4(v) => v.encode(buf),
            Value::Float8(v) => v.encode(buf),
            Value::Date(v) => v.encode(buf),
            Value::Time(v) => v.encode(buf),
            Value::TimeTz(v) => v.encode(buf),
            Value::Timestamp(v) => v.encode(buf),
            Value::TimestampTz(v) => v.encode(buf),
            Value::Interval(v) => v.encode(buf),
            Value::Bit(v) => v.encode(buf),
            Value::Numeric(v) => pqbin_numeric::encode_wire(v, buf)?,
        }
        Ok(())
    }

    /// Returns the wire form as a new buffer.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decodes the bytes of one value of `data_type`.
    pub fn decode(data_type: DataType, bytes: &[u8]) -> Result<Value> {
        Ok(match data_type {
            DataType::Bool => Value::Bool(bool::decode(bytes)?),
            DataType::Bytea => Value::Bytea(bytes.to_vec()),
            DataType::Name => Value::Name(decode_text(bytes)?.to_string()),
            DataType::Text => Value::Text(decode_text(bytes)?.to_string()),
            DataType::Bpchar => Value::Bpchar(decode_text(bytes)?.to_string()),
            DataType::Varchar => Value::Varchar(decode_text(bytes)?.to_string()),
            DataType::Int2 => Value::Int2(i16::decode(bytes)?),
            DataType::Int4 => Value::Int4(i32::decode(bytes)?),
            DataType::Int8 => Value::Int8(i64::decode(bytes)?),
            DataType::Oid => Value::Oid(u32::decode(bytes)?),
            DataType::Float4 => Value::Float4(f32::decode(bytes)?),
            DataType::Float8 => Value::Float8(f64::decode(bytes)?),
            DataType::Date => Value::Date(Date::decode(bytes)?),
            DataType::Time => Value::Time(Time::decode(bytes)?),
            DataType::TimeTz => Value::TimeTz(TimeTz::decode(bytes)?),
            DataType::Timestamp => Value::Timestamp(Timestamp::decode(bytes)?),
            DataType::TimestampTz => Value::TimestampTz(TimestampTz::decode(bytes)?),
            DataType::Interval => Value::Interval(Interval::decode(bytes)?),
            DataType::Bit => Value::Bit(Bit::decode(bytes)?),
            DataType::Numeric => Value::Numeric(pqbin_numeric::decode_wire(bytes)?),
        })
    }

    /// Decodes the bytes of one value of the type identified by `oid`.
    pub fn decode_oid(oid: Oid, bytes: &[u8]) -> Result<Value> {
        let data_type = DataType::from_oid(oid).ok_or_else(|| {
            Error::invalid_operation(alloc::format!("no binary codec for type {}", oid))
        })?;
        Value::decode(data_type, bytes)
    }

    /// Returns the text of textual values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Name(s) | Value::Text(s) | Value::Bpchar(s) | Value::Varchar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int2(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int4(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int8(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float4(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float8(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytea(v.to_vec())
    }
}

impl From<NumericVar> for Value {
    fn from(v: NumericVar) -> Self {
        Value::Numeric(v)
    }
}

impl From<Date> for Value {
    fn from(v: Date) -> Self {
        Value::Date(v)
    }
}

impl From<TimestampTz> for Value {
    fn from(v: TimestampTz) -> Self {
        Value::TimestampTz(v)
    }
}
