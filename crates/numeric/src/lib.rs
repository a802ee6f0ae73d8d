//! pqbin Numeric - arbitrary-precision decimal codec.
//!
//! `NumericVar` holds a decimal as base-10000 digits with an independent
//! weight, display scale and sign. This crate converts it to and from:
//!
//! - decimal text (`FromStr`, `to_text`)
//! - the binary wire format (`decode_wire`, `encode_wire`)
//! - the packed storage form (`PackedNumeric`)
//! - `f64`, through text so both agree on rounding
//!
//! # Example
//!
//! ```rust
//! use pqbin_numeric::{decode_wire, NumericVar};
//!
//! let var: NumericVar = "123.45".parse().unwrap();
//! assert_eq!(var.digits(), &[123, 4500]);
//! assert_eq!(var.weight(), 0);
//! assert_eq!(var.dscale(), 2);
//!
//! let bytes = var.to_wire().unwrap();
//! let decoded = decode_wire(&bytes).unwrap();
//! assert_eq!(decoded.to_text(), "123.45");
//!
//! let mut rounded = decoded.clone();
//! rounded.round(1);
//! assert_eq!(rounded.to_text(), "123.5");
//! ```

#![no_std]

extern crate alloc;

mod display;
mod float;
mod packed;
mod parse;
mod round;
mod var;
mod wire;

pub use packed::PackedNumeric;
pub use round::numeric_typmod;
pub use var::{
    NumericSign, NumericVar, DEC_DIGITS, HALF_NBASE, NBASE, NUMERIC_DSCALE_MASK,
    NUMERIC_MAX_PRECISION, NUMERIC_MAX_WIRE_DIGITS,
};
pub use wire::{decode_wire, decode_wire_with_typmod, encode_wire};
