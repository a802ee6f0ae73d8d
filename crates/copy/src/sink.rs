//! Transport collaborator that receives framed COPY data.

use alloc::vec::Vec;
use pqbin_core::byteorder::try_reserve;
use pqbin_core::{Error, Result};

/// Destination of a COPY stream.
///
/// `send` is called with each full buffer and with the remainder at the end
/// of the stream; `end` is called once after the last `send`. Both complete
/// or fail synchronously. A failure is returned to the framer's caller
/// unchanged.
pub trait CopySink {
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    fn end(&mut self) -> Result<()>;
}

impl<S: CopySink + ?Sized> CopySink for &mut S {
    #[inline]
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).send(bytes)
    }

    #[inline]
    fn end(&mut self) -> Result<()> {
        (**self).end()
    }
}

/// Sink that keeps every chunk in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    chunks: Vec<Vec<u8>>,
    ended: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chunks in the order they were sent.
    #[inline]
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns every chunk joined into one stream.
    pub fn concat(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl CopySink for MemorySink {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let mut chunk = Vec::new();
        try_reserve(&mut chunk, bytes.len())?;
        chunk.extend_from_slice(bytes);
        self.chunks
            .try_reserve(1)
            .map_err(|_| Error::out_of_memory(core::mem::size_of::<Vec<u8>>()))?;
        self.chunks.push(chunk);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.ended = true;
        Ok(())
    }
}
