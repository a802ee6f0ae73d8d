//! Conversion between [`NumericVar`] and `f64`.
//!
//! Both directions pass through decimal text so they agree with the text
//! codec's rounding rules.

use crate::var::NumericVar;
use alloc::format;
use alloc::string::String;
use pqbin_core::{Error, Result};

/// Significant decimal digits carried from an `f64` (`DBL_DIG`).
const FLOAT8_DIGITS: usize = 15;

/// Formats `v` with 15 significant digits in scientific notation, with the
/// mantissa's trailing zeros removed. Parsed back, this yields the same
/// digits and display scale as a `%.15g` rendering.
fn float_text(v: f64) -> String {
    let sci = format!("{:.*e}", FLOAT8_DIGITS - 1, v);
    match sci.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{}e{}", mantissa, exponent)
        }
        _ => sci,
    }
}

impl NumericVar {
    /// Converts a float, keeping 15 significant digits.
    ///
    /// NaN maps to the NaN value; infinities cannot be represented.
    pub fn from_f64(v: f64) -> Result<Self> {
        if v.is_nan() {
            return Ok(NumericVar::nan());
        }
        if v.is_infinite() {
            return Err(Error::out_of_range(
                "numeric",
                "cannot convert infinity to numeric",
            ));
        }
        let text = float_text(v);
        text.parse()
    }

    /// Converts to the nearest float. Values beyond the `f64` range become
    /// infinite.
    pub fn to_f64(&self) -> f64 {
        if self.is_nan() {
            return f64::NAN;
        }
        self.to_text().parse::<f64>().unwrap_or(f64::NAN)
    }
}
