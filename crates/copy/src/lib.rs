//! Framer for the binary COPY bulk-load stream.
//!
//! Tuples are framed into a fixed-capacity buffer that is handed to a
//! [`CopySink`] every time it fills up:
//!
//! ```text
//! Header:  "PGCOPY\n\xFF\r\n\0" | int32 flags (0) | int32 extension (0)
//! Tuple:   int16 field count
//! Field:   int32 length (-1 = null) | length bytes
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pqbin_copy::{CopyOptions, CopyWriter, MemorySink};
//!
//! let options = CopyOptions::new(2).buffer_capacity(64).build().unwrap();
//! let mut writer = CopyWriter::new(MemorySink::new(), options);
//! writer.write_i32(7).unwrap();
//! writer.write_text("seven").unwrap();
//! writer.end_row().unwrap();
//! writer.finish().unwrap();
//!
//! let sink = writer.into_sink();
//! assert!(sink.is_ended());
//! assert_eq!(sink.concat().len(), 19 + 2 + (4 + 4) + (4 + 5));
//! ```

#![no_std]

extern crate alloc;

mod framer;
mod options;
mod sink;
mod writer;

pub use framer::{CopyFrame, COPY_HEADER_LEN, COPY_SIGNATURE};
pub use options::{CopyConfig, CopyOptions, DEFAULT_BUFFER_CAPACITY};
pub use sink::{CopySink, MemorySink};
pub use writer::CopyWriter;
