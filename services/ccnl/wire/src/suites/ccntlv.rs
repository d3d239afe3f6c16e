//! CCNx 2014 TLV encoder.
//!
//! ```text
//! +---------+-------+-----------+-----------+----------+--------+
//! | version | ptype | pkt_len   | hop_limit | reserved | hdrlen |
//! | u8      | u8    | u16 BE    | u8        | u16      | u8     |
//! +---------+-------+-----------+-----------+----------+--------+
//! | message TLV (Interest / Object) containing Name, Payload     |
//! +--------------------------------------------------------------+
//! ```
//!
//! All TLVs use a 2-byte type and a 2-byte length, big-endian.

use crate::component::prepend_component;
use crate::packet::PrependEncoder;
use crate::prepend::PrependBuf;
use crate::suites::minimal_be;
use crate::{Prefix, Suite, WireError};
use tracing::trace;

/// Fixed header version byte
pub const VERSION: u8 = 0x00;
/// Interest packet type
pub const PT_INTEREST: u8 = 0x01;
/// Content object packet type
pub const PT_CONTENT: u8 = 0x02;
/// Size of the fixed header
pub const FIXED_HEADER_LEN: u8 = 8;
/// Hop limit written into new packets
pub const DEFAULT_HOP_LIMIT: u8 = 64;

/// Interest message
pub const TL_INTEREST: u16 = 0x0001;
/// Content object message
pub const TL_OBJECT: u16 = 0x0002;
/// Name inside a message
pub const M_NAME: u16 = 0x0000;
/// Payload inside a message
pub const M_PAYLOAD: u16 = 0x0001;
/// Name segment inside a name
pub const N_NAME_SEGMENT: u16 = 0x0001;
/// Chunk number inside a name
pub const N_CHUNK: u16 = 0x0010;

/// Prepend a type/length pair for `len` value bytes
pub fn prepend_tl(buf: &mut PrependBuf, typ: u16, len: usize) -> Result<usize, WireError> {
    let len = u16::try_from(len).map_err(|_| WireError::PacketTooLarge(len))?;
    buf.prepend_u16(len)?;
    buf.prepend_u16(typ)?;
    Ok(4)
}

/// Prepend the Name TLV for `name`
pub fn prepend_name(name: &Prefix, buf: &mut PrependBuf) -> Result<usize, WireError> {
    let end = buf.len();

    if let Some(chunk) = name.chunknum() {
        let len = buf.prepend_slice(&minimal_be(chunk))?;
        prepend_tl(buf, N_CHUNK, len)?;
    }
    if name.suite() == Suite::CcnTlv {
        // components are stored as NameSegment TLVs already
        buf.prepend_slice(name.as_bytes())?;
    } else {
        for value in name.values().rev() {
            prepend_component(Suite::CcnTlv, value, buf)?;
        }
    }

    prepend_tl(buf, M_NAME, buf.len() - end)?;
    Ok(buf.len() - end)
}

fn prepend_fixed_header(buf: &mut PrependBuf, ptype: u8) -> Result<(), WireError> {
    let total = buf.len() + usize::from(FIXED_HEADER_LEN);
    let pkt_len = u16::try_from(total).map_err(|_| WireError::PacketTooLarge(total))?;

    buf.prepend_u8(FIXED_HEADER_LEN)?;
    buf.prepend_u16(0)?;
    buf.prepend_u8(DEFAULT_HOP_LIMIT)?;
    buf.prepend_u16(pkt_len)?;
    buf.prepend_u8(ptype)?;
    buf.prepend_u8(VERSION)?;
    Ok(())
}

/// Back-to-front CCNx 2014 encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct CcnTlvEncoder;

impl PrependEncoder for CcnTlvEncoder {
    fn prepend_interest(
        &self,
        name: &Prefix,
        nonce: Option<u32>,
        buf: &mut PrependBuf,
    ) -> Result<(), WireError> {
        if nonce.is_some() {
            trace!("ccnx2014 interests carry no nonce, ignoring");
        }
        let end = buf.len();
        prepend_name(name, buf)?;
        prepend_tl(buf, TL_INTEREST, buf.len() - end)?;
        prepend_fixed_header(buf, PT_INTEREST)
    }

    fn prepend_content(
        &self,
        name: &Prefix,
        payload: &[u8],
        buf: &mut PrependBuf,
    ) -> Result<usize, WireError> {
        let end = buf.len();
        buf.prepend_slice(payload)?;
        let payload_pos = buf.offset();
        prepend_tl(buf, M_PAYLOAD, payload.len())?;
        prepend_name(name, buf)?;
        prepend_tl(buf, TL_OBJECT, buf.len() - end)?;
        prepend_fixed_header(buf, PT_CONTENT)?;
        Ok(payload_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_layout() {
        let name = Prefix::from_uri("/a", Suite::CcnTlv, None, None).unwrap();
        let mut buf = PrependBuf::new(128).unwrap();
        CcnTlvEncoder.prepend_interest(&name, None, &mut buf).unwrap();
        assert_eq!(
            buf.as_slice(),
            &[
                VERSION, PT_INTEREST, 0x00, 0x15, DEFAULT_HOP_LIMIT, 0x00, 0x00, FIXED_HEADER_LEN,
                0x00, 0x01, 0x00, 0x09, // Interest
                0x00, 0x00, 0x00, 0x05, // Name
                0x00, 0x01, 0x00, 0x01, b'a', // NameSegment
            ]
        );
    }

    #[test]
    fn test_name_from_other_suite_is_reencoded() {
        let ccn = Prefix::from_uri("/a/bc", Suite::CcnTlv, None, Some(1)).unwrap();
        let ndn = Prefix::from_uri("/a/bc", Suite::NdnTlv, None, Some(1)).unwrap();

        let mut a = PrependBuf::new(64).unwrap();
        let mut b = PrependBuf::new(64).unwrap();
        prepend_name(&ccn, &mut a).unwrap();
        prepend_name(&ndn, &mut b).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
        assert_eq!(&a.as_slice()[a.len() - 5..], &[0x00, 0x10, 0x00, 0x01, 0x01]);
    }

    #[test]
    fn test_content_payload_position() {
        let name = Prefix::from_uri("/a/b", Suite::CcnTlv, None, None).unwrap();
        let mut buf = PrependBuf::new(128).unwrap();
        let pos = CcnTlvEncoder.prepend_content(&name, b"data", &mut buf).unwrap();
        let rel = pos - buf.offset();

        let pkt = buf.as_slice();
        assert_eq!(pkt[1], PT_CONTENT);
        assert_eq!(u16::from_be_bytes([pkt[2], pkt[3]]) as usize, pkt.len());
        assert_eq!(&pkt[rel..], b"data");
        assert_eq!(&pkt[rel - 4..rel], &[0x00, 0x01, 0x00, 0x04]);
    }

    #[test]
    fn test_small_buffer_fails() {
        let name = Prefix::from_uri("/abcdef", Suite::CcnTlv, None, None).unwrap();
        let mut buf = PrependBuf::new(12).unwrap();
        assert!(matches!(
            CcnTlvEncoder.prepend_interest(&name, None, &mut buf),
            Err(WireError::BufferUnderflow { .. })
        ));
    }
}
