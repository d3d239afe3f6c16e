//! Back-to-front packet buffer.
//!
//! TLV suites encode innermost values first and wrap them with type and
//! length headers afterwards, so packets are written from the end of a
//! fixed scratch buffer towards its start.

use crate::WireError;
use bytes::Bytes;

/// Fixed-size scratch buffer filled from the end
#[derive(Debug)]
pub struct PrependBuf {
    buf: Vec<u8>,
    offset: usize,
}

impl PrependBuf {
    /// Allocate a scratch buffer of `size` bytes
    pub fn new(size: usize) -> Result<Self, WireError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(size).map_err(|_| WireError::Alloc)?;
        buf.resize(size, 0);
        Ok(Self { buf, offset: size })
    }

    /// Current write offset; bytes `[offset..]` are written
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total size of the scratch buffer
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Whether nothing was written yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.offset..]
    }

    /// Claim `n` bytes in front of the written region
    fn claim(&mut self, n: usize) -> Result<&mut [u8], WireError> {
        if self.offset < n {
            return Err(WireError::BufferUnderflow {
                needed: n,
                available: self.offset,
            });
        }
        self.offset -= n;
        Ok(&mut self.buf[self.offset..self.offset + n])
    }

    /// Prepend raw bytes, returning the number written
    pub fn prepend_slice(&mut self, data: &[u8]) -> Result<usize, WireError> {
        self.claim(data.len())?.copy_from_slice(data);
        Ok(data.len())
    }

    /// Prepend one byte
    pub fn prepend_u8(&mut self, value: u8) -> Result<usize, WireError> {
        self.prepend_slice(&[value])
    }

    /// Prepend a big-endian u16
    pub fn prepend_u16(&mut self, value: u16) -> Result<usize, WireError> {
        self.prepend_slice(&value.to_be_bytes())
    }

    /// Prepend a big-endian u32
    pub fn prepend_u32(&mut self, value: u32) -> Result<usize, WireError> {
        self.prepend_slice(&value.to_be_bytes())
    }

    /// Prepend a big-endian u64
    pub fn prepend_u64(&mut self, value: u64) -> Result<usize, WireError> {
        self.prepend_slice(&value.to_be_bytes())
    }

    /// Copy the written bytes into an owned buffer
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_slice())
    }
}
