//! Fixed-capacity framing of tuples into the COPY stream.

use crate::options::{check_columns, CopyConfig};
use crate::sink::CopySink;
use alloc::vec::Vec;
use pqbin_core::{Error, Result};

/// Signature that opens every binary COPY stream.
pub const COPY_SIGNATURE: [u8; 11] = *b"PGCOPY\n\xFF\r\n\0";
/// Signature, flags word and header extension length.
pub const COPY_HEADER_LEN: usize = 19;

const NULL_FIELD: [u8; 4] = (-1i32).to_be_bytes();

/// Builds a COPY stream in a buffer of fixed capacity, handing the buffer to
/// the sink each time it is full.
///
/// A tuple header is written before the first field and again whenever a
/// field follows a complete tuple. Once [`CopyFrame::finish`] has sent the
/// remainder and ended the stream the frame rejects every further call with
/// [`Error::StreamFinished`]. After a sink failure it returns that failure
/// from every further call instead, since the stream may hold a partial
/// tuple.
#[derive(Debug)]
pub struct CopyFrame<S: CopySink> {
    sink: S,
    buf: Vec<u8>,
    capacity: usize,
    columns: i16,
    /// Fields written in the current tuple, `None` before the first one.
    column_pos: Option<i16>,
    finished: bool,
    /// First sink failure, replayed by every later call.
    failed: Option<Error>,
    flushes: usize,
}

impl<S: CopySink> CopyFrame<S> {
    /// Creates a frame for one stream and writes the stream header.
    pub fn new(sink: S, config: CopyConfig) -> Self {
        let mut frame = Self {
            sink,
            buf: Vec::with_capacity(config.buffer_capacity()),
            capacity: config.buffer_capacity(),
            columns: config.columns(),
            column_pos: None,
            finished: false,
            failed: None,
            flushes: 0,
        };
        frame.write_header();
        frame
    }

    fn write_header(&mut self) {
        self.buf.clear();
        self.buf.extend_from_slice(&COPY_SIGNATURE);
        self.buf.extend_from_slice(&0i32.to_be_bytes());
        self.buf.extend_from_slice(&0i32.to_be_bytes());
        self.column_pos = None;
    }

    /// Discards buffered bytes and starts over with a fresh stream header for
    /// tuples of `columns` fields.
    pub fn reset(&mut self, columns: usize) -> Result<()> {
        self.check_open()?;
        let columns = check_columns(columns)?;
        tracing::debug!(
            columns,
            discarded = self.buf.len(),
            "reset copy stream"
        );
        self.columns = columns;
        self.write_header();
        Ok(())
    }

    /// Returns the declared fields per tuple.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns as usize
    }

    /// Returns the fields written in the current tuple.
    #[inline]
    pub fn column_position(&self) -> usize {
        self.column_pos.map_or(0, |p| p as usize)
    }

    /// Returns the number of bytes waiting to be sent.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of full buffers sent so far.
    #[inline]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns `true` once the sink has failed.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn check_open(&self) -> Result<()> {
        if let Some(err) = &self.failed {
            tracing::warn!(error = %err, "write attempted on a failed copy stream");
            return Err(err.clone());
        }
        if self.finished {
            tracing::warn!("write attempted on a finished copy stream");
            return Err(Error::StreamFinished);
        }
        Ok(())
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::warn!(error = %err, buffered = self.buf.len(), "copy sink failed");
        self.failed = Some(err.clone());
        err
    }

    fn flush_full(&mut self) -> Result<()> {
        self.sink.send(&self.buf)?;
        tracing::debug!(bytes = self.buf.len(), "flushed copy buffer");
        self.buf.clear();
        self.flushes += 1;
        Ok(())
    }

    /// Copies `bytes` into the buffer, sending it whenever it fills up.
    ///
    /// If the sink fails the unsent bytes stay in the buffer.
    fn put_bytes(&mut self, mut bytes: &[u8]) -> Result<()> {
        loop {
            let free = self.capacity - self.buf.len();
            if free >= bytes.len() {
                self.buf.extend_from_slice(bytes);
                return Ok(());
            }
            let (head, tail) = bytes.split_at(free);
            self.buf.extend_from_slice(head);
            bytes = tail;
            self.flush_full()?;
        }
    }

    /// Appends one field, `None` for null, starting a new tuple first when
    /// the previous one is complete.
    ///
    /// A sink failure leaves the field partly written and fails the frame.
    pub fn put_column(&mut self, value: Option<&[u8]>) -> Result<()> {
        self.check_open()?;
        let len_word = match value {
            Some(bytes) => i32::try_from(bytes.len())
                .map_err(|_| Error::out_of_range("copy", "field longer than 2^31-1 bytes"))?
                .to_be_bytes(),
            None => NULL_FIELD,
        };
        self.put_field(value, len_word).map_err(|e| self.fail(e))
    }

    fn put_field(&mut self, value: Option<&[u8]>, len_word: [u8; 4]) -> Result<()> {
        let pos = match self.column_pos {
            Some(p) if p < self.columns => p,
            _ => {
                let tuple_header = self.columns.to_be_bytes();
                self.put_bytes(&tuple_header)?;
                self.column_pos = Some(0);
                0
            }
        };

        self.put_bytes(&len_word)?;
        if let Some(bytes) = value {
            self.put_bytes(bytes)?;
        }
        self.column_pos = Some(pos + 1);
        tracing::trace!(
            column = pos,
            len = value.map_or(-1, |b| b.len() as i64),
            "put copy field"
        );
        Ok(())
    }

    /// Sends the buffered remainder, ends the stream and invalidates the
    /// frame.
    ///
    /// If sending the remainder fails the bytes stay buffered and the frame
    /// is failed.
    pub fn finish(&mut self) -> Result<()> {
        self.check_open()?;
        if !self.buf.is_empty() {
            if let Err(e) = self.sink.send(&self.buf) {
                return Err(self.fail(e));
            }
            tracing::debug!(bytes = self.buf.len(), "flushed copy remainder");
            self.buf.clear();
        }
        self.finished = true;
        self.column_pos = None;
        tracing::debug!(flushes = self.flushes, "finished copy stream");
        self.sink.end()
    }
}
