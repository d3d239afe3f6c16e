//! Full packet encoders for the suites that have one.
//!
//! CCNB writes front to back, the TLV suites write back to front into a
//! [`PrependBuf`](crate::PrependBuf).

pub mod ccnb;
pub mod ccntlv;
pub mod ndntlv;

use smallvec::SmallVec;

/// Big-endian bytes of `n` without leading zeros (at least one byte)
pub(crate) fn minimal_be(n: u32) -> SmallVec<[u8; 4]> {
    let bytes = n.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(3);
    SmallVec::from_slice(&bytes[skip..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_be() {
        assert_eq!(minimal_be(0).as_slice(), &[0x00]);
        assert_eq!(minimal_be(0x7f).as_slice(), &[0x7f]);
        assert_eq!(minimal_be(0x0100).as_slice(), &[0x01, 0x00]);
        assert_eq!(minimal_be(u32::MAX).as_slice(), &[0xff; 4]);
    }
}
