//! Data type catalog for the binary wire codecs.
//!
//! This module defines the fixed set of built-in scalar and array types the
//! codecs understand, keyed by their server-side type identifiers (OIDs).

/// Server-side type identifier.
pub type Oid = u32;

/// Well-known type identifiers.
pub mod oid {
    use super::Oid;

    pub const BOOL: Oid = 16;
    pub const BYTEA: Oid = 17;
    pub const NAME: Oid = 19;
    pub const INT8: Oid = 20;
    pub const INT2: Oid = 21;
    pub const INT4: Oid = 23;
    pub const TEXT: Oid = 25;
    pub const OID: Oid = 26;
    pub const FLOAT4: Oid = 700;
    pub const FLOAT8: Oid = 701;
    pub const BPCHAR: Oid = 1042;
    pub const VARCHAR: Oid = 1043;
    pub const DATE: Oid = 1082;
    pub const TIME: Oid = 1083;
    pub const TIMESTAMP: Oid = 1114;
    pub const TIMESTAMPTZ: Oid = 1184;
    pub const INTERVAL: Oid = 1186;
    pub const TIMETZ: Oid = 1266;
    pub const BIT: Oid = 1560;
    pub const NUMERIC: Oid = 1700;

    pub const BOOLARRAY: Oid = 1000;
    pub const BYTEAARRAY: Oid = 1001;
    pub const INT2ARRAY: Oid = 1005;
    pub const INT4ARRAY: Oid = 1007;
    pub const TEXTARRAY: Oid = 1009;
    pub const VARCHARARRAY: Oid = 1015;
    pub const INT8ARRAY: Oid = 1016;
    pub const FLOAT4ARRAY: Oid = 1021;
    pub const FLOAT8ARRAY: Oid = 1022;
    pub const OIDARRAY: Oid = 1028;
    pub const TIMESTAMPARRAY: Oid = 1115;
    pub const DATEARRAY: Oid = 1182;
    pub const TIMEARRAY: Oid = 1183;
    pub const TIMESTAMPTZARRAY: Oid = 1185;
    pub const INTERVALARRAY: Oid = 1187;
    pub const NUMERICARRAY: Oid = 1231;
}

/// Built-in scalar types with a binary wire codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// One byte, 0 or 1
    Bool,
    /// Raw bytes
    Bytea,
    /// Fixed-length catalog name
    Name,
    /// 16-bit signed integer
    Int2,
    /// 32-bit signed integer
    Int4,
    /// 64-bit signed integer
    Int8,
    /// Unsigned 32-bit catalog identifier
    Oid,
    /// UTF-8 text
    Text,
    /// Blank-padded character string
    Bpchar,
    /// Variable-length character string
    Varchar,
    /// 32-bit IEEE float
    Float4,
    /// 64-bit IEEE float
    Float8,
    /// Days since 2000-01-01
    Date,
    /// Microseconds since midnight
    Time,
    /// Microseconds since midnight plus zone offset
    TimeTz,
    /// Microseconds since 2000-01-01
    Timestamp,
    /// Microseconds since 2000-01-01 UTC
    TimestampTz,
    /// Microseconds, days and months
    Interval,
    /// Single bit
    Bit,
    /// Arbitrary-precision decimal
    Numeric,
}

impl DataType {
    /// All catalog types, in OID order.
    pub const ALL: [DataType; 20] = [
        DataType::Bool,
        DataType::Bytea,
        DataType::Name,
        DataType::Int8,
        DataType::Int2,
        DataType::Int4,
        DataType::Text,
        DataType::Oid,
        DataType::Float4,
        DataType::Float8,
        DataType::Bpchar,
        DataType::Varchar,
        DataType::Date,
        DataType::Time,
        DataType::Timestamp,
        DataType::TimestampTz,
        DataType::Interval,
        DataType::TimeTz,
        DataType::Bit,
        DataType::Numeric,
    ];

    /// Returns the type identifier.
    pub fn oid(&self) -> Oid {
        match self {
            DataType::Bool => oid::BOOL,
            DataType::Bytea => oid::BYTEA,
            DataType::Name => oid::NAME,
            DataType::Int2 => oid::INT2,
            DataType::Int4 => oid::INT4,
            DataType::Int8 => oid::INT8,
            DataType::Oid => oid::OID,
            DataType::Text => oid::TEXT,
            DataType::Bpchar => oid::BPCHAR,
            DataType::Varchar => oid::VARCHAR,
            DataType::Float4 => oid::FLOAT4,
            DataType::Float8 => oid::FLOAT8,
            DataType::Date => oid::DATE,
            DataType::Time => oid::TIME,
            DataType::TimeTz => oid::TIMETZ,
            DataType::Timestamp => oid::TIMESTAMP,
            DataType::TimestampTz => oid::TIMESTAMPTZ,
            DataType::Interval => oid::INTERVAL,
            DataType::Bit => oid::BIT,
            DataType::Numeric => oid::NUMERIC,
        }
    }

    /// Looks up a catalog type by identifier.
    pub fn from_oid(oid: Oid) -> Option<DataType> {
        DataType::ALL.iter().copied().find(|t| t.oid() == oid)
    }

    /// Returns the identifier of the one-dimensional array of this type,
    /// if the catalog has one.
    pub fn array_oid(&self) -> Option<Oid> {
        match self {
            DataType::Bool => Some(oid::BOOLARRAY),
            DataType::Bytea => Some(oid::BYTEAARRAY),
            DataType::Int2 => Some(oid::INT2ARRAY),
            DataType::Int4 => Some(oid::INT4ARRAY),
            DataType::Int8 => Some(oid::INT8ARRAY),
            DataType::Oid => Some(oid::OIDARRAY),
            DataType::Text => Some(oid::TEXTARRAY),
            DataType::Varchar => Some(oid::VARCHARARRAY),
            DataType::Float4 => Some(oid::FLOAT4ARRAY),
            DataType::Float8 => Some(oid::FLOAT8ARRAY),
            DataType::Date => Some(oid::DATEARRAY),
            DataType::Time => Some(oid::TIMEARRAY),
            DataType::Timestamp => Some(oid::TIMESTAMPARRAY),
            DataType::TimestampTz => Some(oid::TIMESTAMPTZARRAY),
            DataType::Interval => Some(oid::INTERVALARRAY),
            DataType::Numeric => Some(oid::NUMERICARRAY),
            DataType::Name
            | DataType::Bpchar
            | DataType::TimeTz
            | DataType::Bit => None,
        }
    }

    /// Returns the SQL type name.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "boolean",
            DataType::Bytea => "bytea",
            DataType::Name => "name",
            DataType::Int2 => "smallint",
            DataType::Int4 => "integer",
            DataType::Int8 => "bigint",
            DataType::Oid => "oid",
            DataType::Text => "text",
            DataType::Bpchar => "character",
            DataType::Varchar => "character varying",
            DataType::Float4 => "real",
            DataType::Float8 => "double precision",
            DataType::Date => "date",
            DataType::Time => "time without time zone",
            DataType::TimeTz => "time with time zone",
            DataType::Timestamp => "timestamp without time zone",
            DataType::TimestampTz => "timestamp with time zone",
            DataType::Interval => "interval",
            DataType::Bit => "bit",
            DataType::Numeric => "numeric",
        }
    }

    /// Returns the fixed wire width in bytes, or `None` for variable-length types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::Bool | DataType::Bit => Some(1),
            DataType::Int2 => Some(2),
            DataType::Int4 | DataType::Oid | DataType::Float4 | DataType::Date => Some(4),
            DataType::Int8
            | DataType::Float8
            | DataType::Time
            | DataType::Timestamp
            | DataType::TimestampTz => Some(8),
            DataType::TimeTz => Some(12),
            DataType::Interval => Some(16),
            DataType::Bytea
            | DataType::Name
            | DataType::Text
            | DataType::Bpchar
            | DataType::Varchar
            | DataType::Numeric => None,
        }
    }

    /// Returns whether values of this type are carried as UTF-8 text.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            DataType::Text | DataType::Name | DataType::Bpchar | DataType::Varchar
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_round_trip() {
        for t in DataType::ALL {
            assert_eq!(DataType::from_oid(t.oid()), Some(t));
        }
        assert_eq!(DataType::from_oid(2249), None);
        assert_eq!(DataType::from_oid(0), None);
    }

    #[test]
    fn test_well_known_oids() {
        assert_eq!(DataType::Int4.oid(), 23);
        assert_eq!(DataType::Numeric.oid(), 1700);
        assert_eq!(DataType::TimestampTz.oid(), 1184);
        assert_eq!(DataType::Int4.array_oid(), Some(1007));
        assert_eq!(DataType::Float4.array_oid(), Some(1021));
        assert_eq!(DataType::Bit.array_oid(), None);
    }

    #[test]
    fn test_fixed_size() {
        assert_eq!(DataType::Bool.fixed_size(), Some(1));
        assert_eq!(DataType::Int2.fixed_size(), Some(2));
        assert_eq!(DataType::Date.fixed_size(), Some(4));
        assert_eq!(DataType::Timestamp.fixed_size(), Some(8));
        assert_eq!(DataType::TimeTz.fixed_size(), Some(12));
        assert_eq!(DataType::Interval.fixed_size(), Some(16));
        assert_eq!(DataType::Numeric.fixed_size(), None);
        assert_eq!(DataType::Text.fixed_size(), None);
    }

    #[test]
    fn test_textual() {
        assert!(DataType::Text.is_textual());
        assert!(DataType::Varchar.is_textual());
        assert!(!DataType::Bytea.is_textual());
    }
}
