//! pqbin Core - byte order, type catalog and errors shared by the wire codecs.
//!
//! This crate provides the leaf pieces every other pqbin crate builds on:
//!
//! - `byteorder`: big-endian integer and float conversion plus a bounds-checked `WireReader`
//! - `DataType`: the fixed catalog of built-in scalar types and their OIDs
//! - `Error`: error taxonomy for encoding, decoding and streaming
//!
//! # Example
//!
//! ```rust
//! use pqbin_core::byteorder::{put_i32, WireReader};
//! use pqbin_core::DataType;
//!
//! let mut buf = Vec::new();
//! put_i32(&mut buf, 42);
//! assert_eq!(buf, [0x00, 0x00, 0x00, 0x2A]);
//!
//! let mut reader = WireReader::new(&buf, "int4");
//! assert_eq!(reader.read_i32().unwrap(), 42);
//!
//! assert_eq!(DataType::from_oid(23), Some(DataType::Int4));
//! ```

#![no_std]

extern crate alloc;

pub mod byteorder;
mod error;
mod types;

pub use byteorder::WireReader;
pub use error::{Error, Result};
pub use types::{oid, DataType, Oid};
