//! Per-suite encoding of a single name component.

use crate::prepend::PrependBuf;
use crate::suites::ccntlv;
use crate::{Suite, WireError};
use bytes::BufMut;

/// Type and length header carried by every CCNTLV name segment
pub const CCNTLV_COMPONENT_HEADER: usize = 4;

/// Encoded size of a component of `len` bytes under `suite`
pub fn encoded_component_len(suite: Suite, len: usize) -> usize {
    match suite {
        Suite::CcnTlv => len + CCNTLV_COMPONENT_HEADER,
        Suite::Ccnb | Suite::NdnTlv | Suite::LocalRpc => len,
    }
}

fn segment_len(suite: Suite, src: &[u8]) -> Result<Option<u16>, WireError> {
    match suite {
        Suite::CcnTlv => u16::try_from(src.len())
            .map(Some)
            .map_err(|_| WireError::ComponentTooLong(src.len())),
        Suite::Ccnb | Suite::NdnTlv | Suite::LocalRpc => Ok(None),
    }
}

/// Encode one component into `dst`, returning the encoded length.
///
/// CCNTLV writes a NameSegment TLV; the other suites carry the raw bytes and
/// leave framing to their enclosing codec.
pub fn encode_component<B: BufMut>(
    suite: Suite,
    src: &[u8],
    dst: &mut B,
) -> Result<usize, WireError> {
    let needed = encoded_component_len(suite, src.len());
    let seg_len = segment_len(suite, src)?;
    if dst.remaining_mut() < needed {
        return Err(WireError::BufferOverflow {
            needed,
            available: dst.remaining_mut(),
        });
    }

    if let Some(len) = seg_len {
        dst.put_u16(ccntlv::N_NAME_SEGMENT);
        dst.put_u16(len);
    }
    dst.put_slice(src);

    Ok(needed)
}

/// Encode one component in front of the written region of `buf`.
///
/// Fails with [`WireError::BufferUnderflow`] without writing anything when
/// the remaining front space is too small.
pub fn prepend_component(
    suite: Suite,
    src: &[u8],
    buf: &mut PrependBuf,
) -> Result<usize, WireError> {
    let needed = encoded_component_len(suite, src.len());
    let seg_len = segment_len(suite, src)?;
    if buf.offset() < needed {
        return Err(WireError::BufferUnderflow {
            needed,
            available: buf.offset(),
        });
    }

    buf.prepend_slice(src)?;
    if let Some(len) = seg_len {
        buf.prepend_u16(len)?;
        buf.prepend_u16(ccntlv::N_NAME_SEGMENT)?;
    }

    Ok(needed)
}
