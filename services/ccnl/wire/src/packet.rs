//! Simple Interest and Content packet building.
//!
//! The builder dispatches on the prefix suite to a full packet encoder.
//! Encoders come in two disciplines: forward encoders append to a growing
//! buffer, prepend encoders fill a fixed scratch buffer from its end. Both
//! results are normalized into one owned buffer holding exactly the packet.

use crate::prepend::PrependBuf;
use crate::suites::ccnb::CcnbEncoder;
use crate::suites::ccntlv::CcnTlvEncoder;
use crate::suites::ndntlv::NdnTlvEncoder;
use crate::{Prefix, Suite, SuiteSet, WireError};
use bytes::{Bytes, BytesMut};
use tracing::debug;

/// Default upper bound for an encoded packet
pub const MAX_PACKET_SIZE: usize = 8 * 1024;

/// Encoder writing a packet front to back
pub trait ForwardEncoder: Send + Sync {
    /// Append an Interest for `name`
    fn fill_interest(
        &self,
        name: &Prefix,
        nonce: Option<u32>,
        out: &mut BytesMut,
    ) -> Result<(), WireError>;

    /// Append a Content packet, returning the payload offset in `out`
    fn fill_content(
        &self,
        name: &Prefix,
        payload: &[u8],
        out: &mut BytesMut,
    ) -> Result<usize, WireError>;
}

/// Encoder writing a packet back to front
pub trait PrependEncoder: Send + Sync {
    /// Prepend an Interest for `name`
    fn prepend_interest(
        &self,
        name: &Prefix,
        nonce: Option<u32>,
        buf: &mut PrependBuf,
    ) -> Result<(), WireError>;

    /// Prepend a Content packet, returning the payload's absolute offset in
    /// the scratch buffer
    fn prepend_content(
        &self,
        name: &Prefix,
        payload: &[u8],
        buf: &mut PrependBuf,
    ) -> Result<usize, WireError>;
}

/// Full packet encoder of a suite
#[derive(Clone, Copy)]
pub enum SuiteEncoder {
    /// Writes from offset 0
    Forward(&'static dyn ForwardEncoder),
    /// Writes backward from the end of a scratch buffer
    Prepend(&'static dyn PrependEncoder),
}

impl std::fmt::Debug for SuiteEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuiteEncoder::Forward(_) => f.write_str("SuiteEncoder::Forward"),
            SuiteEncoder::Prepend(_) => f.write_str("SuiteEncoder::Prepend"),
        }
    }
}

/// Packet encoder for `suite`, if it has one
pub fn encoder_for(suite: Suite) -> Option<SuiteEncoder> {
    match suite {
        Suite::Ccnb => Some(SuiteEncoder::Forward(&CcnbEncoder)),
        Suite::CcnTlv => Some(SuiteEncoder::Prepend(&CcnTlvEncoder)),
        Suite::NdnTlv => Some(SuiteEncoder::Prepend(&NdnTlvEncoder)),
        Suite::LocalRpc => None,
    }
}

/// Encoded Content packet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPacket {
    /// Packet bytes
    pub bytes: Bytes,
    /// Offset of the payload within `bytes`
    pub payload_offset: usize,
}

impl ContentPacket {
    /// Whether no packet was produced
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Builds single Interest and Content packets for enabled suites
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    enabled: SuiteSet,
    max_packet_size: usize,
}

impl PacketBuilder {
    /// Create a builder for the given suites
    pub fn new(enabled: SuiteSet) -> Self {
        Self {
            enabled,
            max_packet_size: MAX_PACKET_SIZE,
        }
    }

    /// Set the packet size bound
    pub fn with_max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    /// Suites this builder encodes
    pub fn enabled(&self) -> SuiteSet {
        self.enabled
    }

    fn encoder(&self, suite: Suite) -> Option<SuiteEncoder> {
        if !self.enabled.enables(suite) {
            debug!(%suite, tag = suite.tag(), "suite disabled, no packet built");
            return None;
        }
        let encoder = encoder_for(suite);
        if encoder.is_none() {
            debug!(%suite, tag = suite.tag(), "suite has no packet encoder");
        }
        encoder
    }

    fn check_size(&self, len: usize) -> Result<(), WireError> {
        if len > self.max_packet_size {
            return Err(WireError::PacketTooLarge(len));
        }
        Ok(())
    }

    /// Encode an Interest for `name`.
    ///
    /// Returns an empty buffer when the suite is disabled or has no encoder.
    pub fn interest(&self, name: &Prefix, nonce: Option<u32>) -> Result<Bytes, WireError> {
        let Some(encoder) = self.encoder(name.suite()) else {
            return Ok(Bytes::new());
        };

        let bytes = match encoder {
            SuiteEncoder::Forward(enc) => {
                let mut out = BytesMut::new();
                enc.fill_interest(name, nonce, &mut out)?;
                self.check_size(out.len())?;
                out.freeze()
            }
            SuiteEncoder::Prepend(enc) => {
                let mut buf = PrependBuf::new(self.max_packet_size)?;
                enc.prepend_interest(name, nonce, &mut buf)?;
                buf.to_bytes()
            }
        };

        debug!(suite = %name.suite(), len = bytes.len(), "built interest");
        Ok(bytes)
    }

    /// Encode a Content packet carrying `payload` under `name`.
    ///
    /// Returns an empty packet when the suite is disabled or has no encoder.
    pub fn content(&self, name: &Prefix, payload: &[u8]) -> Result<ContentPacket, WireError> {
        let Some(encoder) = self.encoder(name.suite()) else {
            return Ok(ContentPacket::default());
        };

        let packet = match encoder {
            SuiteEncoder::Forward(enc) => {
                let mut out = BytesMut::new();
                let payload_offset = enc.fill_content(name, payload, &mut out)?;
                self.check_size(out.len())?;
                ContentPacket {
                    bytes: out.freeze(),
                    payload_offset,
                }
            }
            SuiteEncoder::Prepend(enc) => {
                let mut buf = PrependBuf::new(self.max_packet_size)?;
                let payload_pos = enc.prepend_content(name, payload, &mut buf)?;
                ContentPacket {
                    bytes: buf.to_bytes(),
                    payload_offset: payload_pos - buf.offset(),
                }
            }
        };

        debug!(
            suite = %name.suite(),
            len = packet.bytes.len(),
            payload_offset = packet.payload_offset,
            "built content"
        );
        Ok(packet)
    }
}

impl Default for PacketBuilder {
    fn default() -> Self {
        Self::new(SuiteSet::default())
    }
}
