//! Stream configuration.

use crate::framer::COPY_HEADER_LEN;
use alloc::format;
use pqbin_core::{Error, Result};

/// Default frame buffer size in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Builder for a [`CopyConfig`].
#[derive(Clone, Debug)]
pub struct CopyOptions {
    columns: usize,
    buffer_capacity: usize,
}

impl CopyOptions {
    /// Starts a configuration for tuples of `columns` fields.
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Sets the frame buffer size. Every `send` carries at most this many bytes.
    pub fn buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes;
        self
    }

    /// Validates the options.
    pub fn build(self) -> Result<CopyConfig> {
        let columns = check_columns(self.columns)?;
        if self.buffer_capacity < COPY_HEADER_LEN {
            return Err(Error::invalid_operation(format!(
                "buffer capacity {} is smaller than the {}-byte stream header",
                self.buffer_capacity, COPY_HEADER_LEN
            )));
        }
        Ok(CopyConfig {
            columns,
            buffer_capacity: self.buffer_capacity,
        })
    }
}

/// Validated stream configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyConfig {
    columns: i16,
    buffer_capacity: usize,
}

impl CopyConfig {
    #[inline]
    pub fn columns(&self) -> i16 {
        self.columns
    }

    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }
}

pub(crate) fn check_columns(columns: usize) -> Result<i16> {
    match i16::try_from(columns) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::invalid_operation(format!(
            "column count {} outside 1..={}",
            columns,
            i16::MAX
        ))),
    }
}
