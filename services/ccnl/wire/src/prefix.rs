//! Name prefixes.
//!
//! A [`Prefix`] owns one contiguous buffer holding every encoded component
//! back to back; components are `(offset, len)` spans into it. The buffer is
//! allocated once per prefix and never shared between prefixes.

use crate::component::{encode_component, encoded_component_len, CCNTLV_COMPONENT_HEADER};
use crate::uri::{uri_to_components, ComponentRanges, MAX_NAME_COMPONENTS};
use crate::{Suite, WireError};
use bitflags::bitflags;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace};

bitflags! {
    /// Named-Function Networking markers of a prefix
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NfnFlags: u8 {
        /// Last component is an NFN expression
        const NFN = 1 << 0;
        /// Request for a thunk instead of the computed result
        const THUNK = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    offset: usize,
    len: usize,
}

/// Hierarchical content name encoded for one suite
#[derive(Debug, PartialEq, Eq)]
pub struct Prefix {
    suite: Suite,
    bytes: Bytes,
    comps: SmallVec<[Span; 8]>,
    capacity: usize,
    chunknum: Option<u32>,
    nfn: NfnFlags,
}

impl Prefix {
    /// Create an empty prefix with room for `capacity` components
    pub fn new(suite: Suite, capacity: usize) -> Result<Self, WireError> {
        let mut comps = SmallVec::new();
        comps
            .try_reserve_exact(capacity)
            .map_err(|_| WireError::Alloc)?;

        Ok(Self {
            suite,
            bytes: Bytes::new(),
            comps,
            capacity,
            chunknum: None,
            nfn: NfnFlags::empty(),
        })
    }

    /// Build a prefix from already split components
    pub fn from_components(
        suite: Suite,
        comps: &[&[u8]],
        chunknum: Option<u32>,
    ) -> Result<Self, WireError> {
        let mut prefix = Self::new(suite, comps.len())?;
        prefix.fill(comps)?;
        prefix.chunknum = chunknum;
        Ok(prefix)
    }

    /// Build a prefix from a URI such as `/ccnx/test%20page`.
    ///
    /// A non-empty `nfn_expr` becomes the final component and marks the
    /// prefix as NFN.
    pub fn from_uri(
        uri: &str,
        suite: Suite,
        nfn_expr: Option<&str>,
        chunknum: Option<u32>,
    ) -> Result<Self, WireError> {
        Self::from_uri_limited(uri, suite, nfn_expr, chunknum, MAX_NAME_COMPONENTS)
    }

    /// Like [`Prefix::from_uri`] with an explicit component limit
    pub fn from_uri_limited(
        uri: &str,
        suite: Suite,
        nfn_expr: Option<&str>,
        chunknum: Option<u32>,
        max_components: usize,
    ) -> Result<Self, WireError> {
        trace!(%suite, uri, ?nfn_expr, "prefix from uri");

        let mut work = uri.as_bytes().to_vec();
        let ranges = if work.is_empty() {
            ComponentRanges::new()
        } else {
            uri_to_components(&mut work, max_components)
        };
        let nfn_expr = nfn_expr.filter(|e| !e.is_empty());

        let mut parts: SmallVec<[&[u8]; 16]> = ranges.iter().map(|r| &work[r.clone()]).collect();
        if let Some(expr) = nfn_expr {
            parts.push(expr.as_bytes());
        }

        let mut prefix = Self::new(suite, parts.len())?;
        prefix.fill(&parts)?;
        if nfn_expr.is_some() {
            prefix.nfn |= NfnFlags::NFN;
        }
        prefix.chunknum = chunknum;

        debug!(
            %suite,
            components = prefix.len(),
            bytes = prefix.bytes.len(),
            "built prefix"
        );
        Ok(prefix)
    }

    /// Encode `comps` into a freshly allocated buffer
    fn fill(&mut self, comps: &[&[u8]]) -> Result<(), WireError> {
        if self.comps.len() + comps.len() > self.capacity {
            return Err(WireError::Capacity(self.capacity));
        }

        let total: usize = comps
            .iter()
            .map(|c| encoded_component_len(self.suite, c.len()))
            .sum();
        let mut buf = Vec::new();
        buf.try_reserve_exact(total).map_err(|_| WireError::Alloc)?;

        // spans go into the slots reserved by `new`
        let start = self.comps.len();
        for comp in comps {
            let offset = buf.len();
            match encode_component(self.suite, comp, &mut buf) {
                Ok(len) => self.comps.push(Span { offset, len }),
                Err(err) => {
                    self.comps.truncate(start);
                    return Err(err);
                }
            }
        }

        self.bytes = Bytes::from(buf);
        Ok(())
    }

    /// Deep copy into a new buffer; the copy shares nothing with `self`
    pub fn duplicate(&self) -> Result<Self, WireError> {
        let mut copy = Self::new(self.suite, self.capacity)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(self.bytes.len())
            .map_err(|_| WireError::Alloc)?;
        buf.extend_from_slice(&self.bytes);

        copy.comps.extend(self.comps.iter().copied());
        copy.bytes = Bytes::from(buf);
        copy.chunknum = self.chunknum;
        copy.nfn = self.nfn;
        Ok(copy)
    }

    /// Suite the components are encoded for
    pub fn suite(&self) -> Suite {
        self.suite
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.comps.len()
    }

    /// Whether the prefix has no components
    pub fn is_empty(&self) -> bool {
        self.comps.is_empty()
    }

    /// Component capacity fixed at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All encoded components, back to back
    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Encoded component `i`, including any suite header
    pub fn component(&self, i: usize) -> Option<&[u8]> {
        self.comps
            .get(i)
            .map(|s| &self.bytes[s.offset..s.offset + s.len])
    }

    /// Value of component `i` without its suite header
    pub fn component_value(&self, i: usize) -> Option<&[u8]> {
        self.component(i).map(|c| self.strip_header(c))
    }

    /// Iterate over encoded components
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator + '_ {
        self.comps
            .iter()
            .map(move |s| &self.bytes[s.offset..s.offset + s.len])
    }

    /// Iterate over component values
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator + '_ {
        self.components().map(move |c| self.strip_header(c))
    }

    fn strip_header<'a>(&self, comp: &'a [u8]) -> &'a [u8] {
        match self.suite {
            Suite::CcnTlv => &comp[CCNTLV_COMPONENT_HEADER.min(comp.len())..],
            Suite::Ccnb | Suite::NdnTlv | Suite::LocalRpc => comp,
        }
    }

    /// Chunk number, if this names one fragment of segmented content
    pub fn chunknum(&self) -> Option<u32> {
        self.chunknum
    }

    /// Set or clear the chunk number
    pub fn set_chunknum(&mut self, chunknum: Option<u32>) {
        self.chunknum = chunknum;
    }

    /// Chunk number as an integer, -1 when unset
    pub fn chunknum_tag(&self) -> i64 {
        self.chunknum.map_or(-1, i64::from)
    }

    /// NFN markers
    pub fn nfn_flags(&self) -> NfnFlags {
        self.nfn
    }

    /// Replace the NFN markers
    pub fn set_nfn_flags(&mut self, flags: NfnFlags) {
        self.nfn = flags;
    }

    /// The NFN expression carried in the last component
    pub fn nfn_expression(&self) -> Option<&[u8]> {
        if !self.nfn.contains(NfnFlags::NFN) {
            return None;
        }
        self.len()
            .checked_sub(1)
            .and_then(|last| self.component_value(last))
    }

    /// Write the human-readable path, e.g. `/a/b` or `nfn[/a/expr]`.
    ///
    /// Components of plain prefixes are percent-escaped where needed so the
    /// output tokenizes back to the same bytes. NFN prefixes print raw.
    pub fn write_path<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        if self.nfn.contains(NfnFlags::NFN) {
            out.write_str("nfn")?;
        }
        if self.nfn.contains(NfnFlags::THUNK) {
            out.write_str("thunk")?;
        }
        if !self.nfn.is_empty() {
            out.write_char('[')?;
        }

        for value in self.values() {
            if self.nfn.is_empty() {
                out.write_char('/')?;
                write_escaped(out, value)?;
            } else {
                let bare_call = self.len() == 1
                    && self.nfn.contains(NfnFlags::NFN)
                    && value.starts_with(b"call");
                if !bare_call {
                    out.write_char('/')?;
                }
                out.write_str(&String::from_utf8_lossy(value))?;
            }
        }

        // a trailing empty component needs its own separator to survive tokenizing
        if self.nfn.is_empty() && self.values().next_back().is_some_and(<[u8]>::is_empty) {
            out.write_char('/')?;
        }

        if !self.nfn.is_empty() {
            out.write_char(']')?;
        }
        Ok(())
    }

    /// The human-readable path as a new string
    pub fn to_path(&self) -> String {
        let mut path = String::new();
        // Writing into a String cannot fail
        let _ = self.write_path(&mut path);
        path
    }
}

fn write_escaped<W: fmt::Write>(out: &mut W, value: &[u8]) -> fmt::Result {
    for &b in value {
        if b == b'/' || b == b'%' || !(0x20..0x7f).contains(&b) {
            write!(out, "%{:02X}", b)?;
        } else {
            out.write_char(b as char)?;
        }
    }
    Ok(())
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_path(f)
    }
}
