//! Wire layer error types.

use thiserror::Error;

/// Errors raised while building names and packets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Buffer allocation failed; nothing partially built is returned
    #[error("allocation failed")]
    Alloc,

    /// More components than the prefix was created for
    #[error("component capacity exceeded: {0}")]
    Capacity(usize),

    /// Component does not fit the suite's length field
    #[error("component too long: {0} bytes")]
    ComponentTooLong(usize),

    /// Prepending would write before the start of the buffer
    #[error("buffer underflow: need {needed}, {available} left")]
    BufferUnderflow {
        /// Bytes the write required
        needed: usize,
        /// Bytes left in front of the write offset
        available: usize,
    },

    /// Forward write does not fit the destination
    #[error("buffer overflow: need {needed}, {available} left")]
    BufferOverflow {
        /// Bytes the write required
        needed: usize,
        /// Bytes left in the destination
        available: usize,
    },

    /// Encoded packet exceeds the configured maximum
    #[error("packet too large: {0} bytes")]
    PacketTooLarge(usize),

    /// Unrecognized suite name
    #[error("unknown suite {0:?}")]
    UnknownSuite(String),
}
