//! Binary wire codecs for the built-in scalar types, arrays and records,
//! and the parameter buffer that collects encoded values for one statement.
//!
//! Every fixed-width value is big-endian. Variable-width values (text,
//! bytea, numeric, arrays, records) carry no length of their own; the
//! enclosing message or container supplies it.
//!
//! ## Example
//!
//! ```rust
//! use pqbin_binary::{ParameterBuffer, TypeRegistry, Value};
//! use pqbin_core::DataType;
//!
//! let registry = TypeRegistry::builtin();
//! let mut params = ParameterBuffer::new();
//! params.add_value(&Value::Int4(42)).unwrap();
//! params.add_optional(DataType::Text, None).unwrap();
//! params
//!     .add_array(&registry, DataType::Int8, &[Some(Value::Int8(1)), None])
//!     .unwrap();
//!
//! let finalized = params.finalize();
//! assert_eq!(finalized.types, vec![23, 25, 1016]);
//! assert_eq!(finalized.values[0], Some(&[0u8, 0, 0, 42][..]));
//! assert_eq!(finalized.values[1], None);
//! ```

#![no_std]

extern crate alloc;

pub mod array;
pub mod composite;
pub mod datetime;
mod param_buffer;
mod registry;
pub mod scalar;
mod value;

pub use array::{ArrayDecoder, ArrayDim, ArrayEncoder, ArrayHeader, ArrayItem};
pub use composite::{CompositeDecoder, CompositeEncoder, CompositeField};
pub use datetime::{Date, Interval, Time, TimeTz, Timestamp, TimestampTz};
pub use param_buffer::{
    EncodedParameter, FinalizedParams, ParameterBuffer, StatementExecutor, ValueCursor,
    FORMAT_BINARY, NULL_LENGTH,
};
pub use registry::{TypeInfo, TypeRegistry};
pub use scalar::{decode_or_sentinel, Bit, NullSentinel, WireValue};
pub use value::Value;
