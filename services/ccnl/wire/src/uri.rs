//! URI tokenizing.
//!
//! Splits a `/`-separated URI into name components and percent-decodes each
//! one in place. The input buffer is rewritten; callers pass a scratch copy.

use smallvec::SmallVec;
use std::ops::Range;

/// Default component capacity of a name
pub const MAX_NAME_COMPONENTS: usize = 64;

/// Component byte ranges into a tokenized URI buffer
pub type ComponentRanges = SmallVec<[Range<usize>; 16]>;

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

/// Percent-decode `buf` in place, returning the decoded length.
///
/// `%XY` with two hex digits becomes one byte. Any other `%`, including one
/// near the end without two following bytes, is copied through unchanged.
///
/// Note that a complete triple with a non-hex digit, such as `%zz` or `%1g`,
/// is not decoded here. The C ccn-lite tools decode every complete triple and
/// read non-hex digits as 0, so `%zz` becomes a NUL byte there.
pub fn unescape_component(buf: &mut [u8]) -> usize {
    let mut rd = 0;
    let mut wr = 0;

    while rd < buf.len() {
        if buf[rd] == b'%' && rd + 2 < buf.len() {
            if let (Some(hi), Some(lo)) = (hex_value(buf[rd + 1]), hex_value(buf[rd + 2])) {
                buf[wr] = (hi << 4) | lo;
                rd += 3;
                wr += 1;
                continue;
            }
        }
        buf[wr] = buf[rd];
        rd += 1;
        wr += 1;
    }

    wr
}

/// Tokenize `uri` into at most `capacity - 1` unescaped components.
///
/// One leading `/` is skipped. Components beyond the limit are dropped
/// silently; the last slot is kept free for an NFN expression. A trailing
/// `/` does not produce an empty component, an interior `//` does.
pub fn uri_to_components(uri: &mut [u8], capacity: usize) -> ComponentRanges {
    let mut comps = ComponentRanges::new();
    let limit = capacity.saturating_sub(1);
    let mut pos = usize::from(uri.first() == Some(&b'/'));

    while pos < uri.len() && comps.len() < limit {
        let end = uri[pos..]
            .iter()
            .position(|&b| b == b'/')
            .map_or(uri.len(), |i| pos + i);
        let len = unescape_component(&mut uri[pos..end]);
        comps.push(pos..pos + len);
        pos = end + 1;
    }

    comps
}

/// Split an NFN expression into components the same way as a URI
pub fn lambda_expr_components(expr: &mut [u8]) -> ComponentRanges {
    uri_to_components(expr, MAX_NAME_COMPONENTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unescape(s: &str) -> Vec<u8> {
        let mut buf = s.as_bytes().to_vec();
        let len = unescape_component(&mut buf);
        buf.truncate(len);
        buf
    }

    fn tokenize(s: &str, capacity: usize) -> Vec<Vec<u8>> {
        let mut buf = s.as_bytes().to_vec();
        uri_to_components(&mut buf, capacity)
            .into_iter()
            .map(|r| buf[r].to_vec())
            .collect()
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a%2fb"), b"a/b");
        assert_eq!(unescape("a%2Fb"), b"a/b");
        assert_eq!(unescape("%41%42"), b"AB");
        assert_eq!(unescape("plain"), b"plain");
    }

    #[test]
    fn test_unescape_incomplete() {
        assert_eq!(unescape("a%2"), b"a%2");
        assert_eq!(unescape("a%"), b"a%");
        assert_eq!(unescape("%"), b"%");
        assert_eq!(unescape("%zz"), b"%zz");
        assert_eq!(unescape("x%1gy"), b"x%1gy");
        assert_eq!(unescape("%g1%41"), b"%g1A");
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("/a/b%20c/", MAX_NAME_COMPONENTS), vec![b"a".to_vec(), b"b c".to_vec()]);
        assert_eq!(tokenize("a/b", MAX_NAME_COMPONENTS), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(
            tokenize("/a//b", MAX_NAME_COMPONENTS),
            vec![b"a".to_vec(), Vec::new(), b"b".to_vec()]
        );
        assert!(tokenize("/", MAX_NAME_COMPONENTS).is_empty());
        assert!(tokenize("", MAX_NAME_COMPONENTS).is_empty());
    }

    #[test]
    fn test_tokenize_truncates() {
        let comps = tokenize("/a/b/c/d/e", 4);
        assert_eq!(comps, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(tokenize("/a/b", 1).is_empty());
        assert!(tokenize("/a/b", 0).is_empty());
    }

    #[test]
    fn test_ranges_point_into_buffer() {
        let mut buf = b"/x%2fy/z".to_vec();
        let ranges = uri_to_components(&mut buf, MAX_NAME_COMPONENTS);
        assert_eq!(ranges.len(), 2);
        assert_eq!(&buf[ranges[0].clone()], b"x/y");
        assert_eq!(&buf[ranges[1].clone()], b"z");
    }

    proptest! {
        #[test]
        fn prop_unescape_never_grows(input in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut buf = input.clone();
            let len = unescape_component(&mut buf);
            prop_assert!(len <= input.len());
        }

        #[test]
        fn prop_escaped_bytes_decode(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
            let escaped: String = bytes.iter().map(|b| format!("%{:02x}", b)).collect();
            prop_assert_eq!(unescape(&escaped), bytes);
        }
    }
}
