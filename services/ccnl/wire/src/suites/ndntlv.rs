//! NDN 2013 TLV encoder.
//!
//! Types and lengths are variable-size numbers: values below 253 take one
//! byte, larger ones are introduced by 0xFD, 0xFE or 0xFF followed by a
//! 2, 4 or 8 byte big-endian value.

use crate::component::prepend_component;
use crate::packet::PrependEncoder;
use crate::prepend::PrependBuf;
use crate::suites::minimal_be;
use crate::{Prefix, Suite, WireError};

/// Interest packet
pub const TLV_INTEREST: u8 = 0x05;
/// Data packet
pub const TLV_DATA: u8 = 0x06;
/// Name
pub const TLV_NAME: u8 = 0x07;
/// Generic name component
pub const TLV_NAME_COMPONENT: u8 = 0x08;
/// Nonce
pub const TLV_NONCE: u8 = 0x0A;
/// Content
pub const TLV_CONTENT: u8 = 0x15;

/// Marker byte of a segment (chunk) component
pub const SEGMENT_MARKER: u8 = 0x00;

/// Prepend a variable-size number, returning the bytes written
pub fn prepend_var_number(buf: &mut PrependBuf, n: u64) -> Result<usize, WireError> {
    if n < 253 {
        buf.prepend_u8(n as u8)
    } else if let Ok(n) = u16::try_from(n) {
        buf.prepend_u16(n)?;
        buf.prepend_u8(0xFD)?;
        Ok(3)
    } else if let Ok(n) = u32::try_from(n) {
        buf.prepend_u32(n)?;
        buf.prepend_u8(0xFE)?;
        Ok(5)
    } else {
        buf.prepend_u64(n)?;
        buf.prepend_u8(0xFF)?;
        Ok(9)
    }
}

/// Prepend a type/length pair for `len` value bytes
pub fn prepend_tl(buf: &mut PrependBuf, typ: u8, len: usize) -> Result<usize, WireError> {
    let n = prepend_var_number(buf, len as u64)?;
    Ok(n + prepend_var_number(buf, u64::from(typ))?)
}

/// Prepend the Name TLV for `name`
pub fn prepend_name(name: &Prefix, buf: &mut PrependBuf) -> Result<usize, WireError> {
    let end = buf.len();

    if let Some(chunk) = name.chunknum() {
        let mut len = buf.prepend_slice(&minimal_be(chunk))?;
        len += buf.prepend_u8(SEGMENT_MARKER)?;
        prepend_tl(buf, TLV_NAME_COMPONENT, len)?;
    }
    for value in name.values().rev() {
        let len = prepend_component(Suite::NdnTlv, value, buf)?;
        prepend_tl(buf, TLV_NAME_COMPONENT, len)?;
    }

    prepend_tl(buf, TLV_NAME, buf.len() - end)?;
    Ok(buf.len() - end)
}

/// Back-to-front NDN 2013 encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct NdnTlvEncoder;

impl PrependEncoder for NdnTlvEncoder {
    fn prepend_interest(
        &self,
        name: &Prefix,
        nonce: Option<u32>,
        buf: &mut PrependBuf,
    ) -> Result<(), WireError> {
        let end = buf.len();
        if let Some(nonce) = nonce {
            buf.prepend_u32(nonce)?;
            prepend_tl(buf, TLV_NONCE, 4)?;
        }
        prepend_name(name, buf)?;
        prepend_tl(buf, TLV_INTEREST, buf.len() - end)?;
        Ok(())
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
        prepend_tl(buf, TLV_CONTENT, payload.len())?;
        prepend_name(name, buf)?;
        prepend_tl(buf, TLV_DATA, buf.len() - end)?;
        Ok(payload_pos)
    }
}
