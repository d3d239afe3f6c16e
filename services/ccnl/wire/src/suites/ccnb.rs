//! CCNx binary XML (ccnb) encoder.
//!
//! Every element starts with a block header: the number is written as
//! big-endian 7-bit groups, the final byte carries the high bit, the low
//! four bits of the number and a 3-bit block type.

use crate::packet::ForwardEncoder;
use crate::suites::minimal_be;
use crate::{Prefix, WireError};
use bytes::{BufMut, BytesMut};

/// First byte of an encoded Interest
pub const INTEREST_MARKER: u8 = 0x01;
/// First byte of an encoded ContentObject
pub const CONTENT_MARKER: u8 = 0x04;

/// Dictionary tag block type
pub const TT_DTAG: u8 = 2;
/// Binary blob block type
pub const TT_BLOB: u8 = 5;
/// Element close marker
pub const CLOSE: u8 = 0x00;

/// Name element
pub const DTAG_NAME: usize = 14;
/// Name component element
pub const DTAG_COMPONENT: usize = 15;
/// Content element
pub const DTAG_CONTENT: usize = 19;
/// Interest element
pub const DTAG_INTEREST: usize = 26;
/// Nonce element
pub const DTAG_NONCE: usize = 41;
/// ContentObject element
pub const DTAG_CONTENT_OBJECT: usize = 64;

/// Marker byte of a segment (chunk) component
pub const SEGMENT_MARKER: u8 = 0x00;

/// Append a block header
pub fn put_header(out: &mut BytesMut, num: usize, tt: u8) {
    let mut tmp = [0u8; 10];
    let mut i = tmp.len() - 1;
    tmp[i] = 0x80 | (((num & 0x0f) as u8) << 3) | (tt & 0x07);
    let mut n = num >> 4;
    while n > 0 {
        i -= 1;
        tmp[i] = (n & 0x7f) as u8;
        n >>= 7;
    }
    out.put_slice(&tmp[i..]);
}

fn put_blob_element(out: &mut BytesMut, dtag: usize, parts: &[&[u8]]) {
    let len = parts.iter().map(|p| p.len()).sum();
    put_header(out, dtag, TT_DTAG);
    put_header(out, len, TT_BLOB);
    for part in parts {
        out.put_slice(part);
    }
    out.put_u8(CLOSE);
}

fn put_name(out: &mut BytesMut, name: &Prefix) {
    put_header(out, DTAG_NAME, TT_DTAG);
    for value in name.values() {
        put_blob_element(out, DTAG_COMPONENT, &[value]);
    }
    if let Some(chunk) = name.chunknum() {
        let seg = minimal_be(chunk);
        let parts: [&[u8]; 2] = [&[SEGMENT_MARKER], &seg];
        put_blob_element(out, DTAG_COMPONENT, &parts);
    }
    out.put_u8(CLOSE);
}

/// Front-to-back ccnb encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct CcnbEncoder;

impl ForwardEncoder for CcnbEncoder {
    fn fill_interest(
        &self,
        name: &Prefix,
        nonce: Option<u32>,
        out: &mut BytesMut,
    ) -> Result<(), WireError> {
        put_header(out, DTAG_INTEREST, TT_DTAG);
        put_name(out, name);
        if let Some(nonce) = nonce {
            let nonce = nonce.to_be_bytes();
            put_blob_element(out, DTAG_NONCE, &[&nonce[..]]);
        }
        out.put_u8(CLOSE);
        Ok(())
    }

    fn fill_content(
        &self,
        name: &Prefix,
        payload: &[u8],
        out: &mut BytesMut,
    ) -> Result<usize, WireError> {
        put_header(out, DTAG_CONTENT_OBJECT, TT_DTAG);
        put_name(out, name);
        put_header(out, DTAG_CONTENT, TT_DTAG);
        put_header(out, payload.len(), TT_BLOB);
        let payload_offset = out.len();
        out.put_slice(payload);
        out.put_u8(CLOSE);
        out.put_u8(CLOSE);
        Ok(payload_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suite;

    fn header(num: usize, tt: u8) -> Vec<u8> {
        let mut out = BytesMut::new();
        put_header(&mut out, num, tt);
        out.to_vec()
    }

    #[test]
    fn test_block_headers() {
        assert_eq!(header(DTAG_INTEREST, TT_DTAG), [INTEREST_MARKER, 0xd2]);
        assert_eq!(header(DTAG_CONTENT_OBJECT, TT_DTAG), [CONTENT_MARKER, 0x82]);
        assert_eq!(header(DTAG_NAME, TT_DTAG), [0xf2]);
        assert_eq!(header(DTAG_COMPONENT, TT_DTAG), [0xfa]);
        assert_eq!(header(DTAG_NONCE, TT_DTAG), [0x02, 0xca]);
        assert_eq!(header(0, TT_BLOB), [0x85]);
        assert_eq!(header(300, TT_BLOB), [0x12, 0xe5]);
    }

    #[test]
    fn test_interest_layout() {
        let name = Prefix::from_uri("/a", Suite::Ccnb, None, None).unwrap();
        let mut out = BytesMut::new();
        CcnbEncoder.fill_interest(&name, None, &mut out).unwrap();
        assert_eq!(
            &out[..],
            &[0x01, 0xd2, 0xf2, 0xfa, 0x8d, b'a', CLOSE, CLOSE, CLOSE]
        );
    }

    #[test]
    fn test_interest_with_nonce_and_chunk() {
        let name = Prefix::from_uri("/a", Suite::Ccnb, None, Some(2)).unwrap();
        let mut out = BytesMut::new();
        CcnbEncoder.fill_interest(&name, Some(0x01020304), &mut out).unwrap();
        assert_eq!(
            &out[..],
            &[
                0x01, 0xd2, 0xf2, // Interest, Name
                0xfa, 0x8d, b'a', CLOSE, // component "a"
                0xfa, 0x95, SEGMENT_MARKER, 0x02, CLOSE, // chunk 2
                CLOSE, // /Name
                0x02, 0xca, 0xa5, 0x01, 0x02, 0x03, 0x04, CLOSE, // Nonce
                CLOSE,
            ]
        );
    }

    #[test]
    fn test_content_payload_offset() {
        let name = Prefix::from_uri("/x/y", Suite::Ccnb, None, None).unwrap();
        let mut out = BytesMut::new();
        let pos = CcnbEncoder.fill_content(&name, b"hello", &mut out).unwrap();
        assert_eq!(out[0], CONTENT_MARKER);
        assert_eq!(&out[pos..pos + 5], b"hello");
        assert_eq!(&out[out.len() - 2..], &[CLOSE, CLOSE]);
    }
}
