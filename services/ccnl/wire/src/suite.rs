//! Wire suites and packet sniffing.
//!
//! A suite selects one of the binary encodings a node speaks. The set of
//! suites is closed; which of them a node accepts is a runtime capability
//! expressed by [`SuiteSet`].

use crate::suites::{ccnb, ccntlv, ndntlv};
use crate::WireError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer tag used for "no suite"
pub const UNKNOWN_SUITE_TAG: i32 = -1;

/// First byte of a local RPC packet
pub const LOCALRPC_MARKER: u8 = 0x80;

/// Wire suites
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suite {
    /// CCNx binary XML encoding
    #[serde(rename = "ccnb")]
    Ccnb = 1,
    /// CCNx 2014 TLV encoding
    #[serde(rename = "ccnx2014")]
    CcnTlv = 2,
    /// NDN 2013 TLV encoding
    #[serde(rename = "ndn2013")]
    NdnTlv = 3,
    /// Local RPC between a node and its controller
    #[serde(rename = "localrpc")]
    LocalRpc = 4,
}

impl Suite {
    /// All suites in sniffing priority order
    pub const ALL: [Suite; 4] = [Suite::Ccnb, Suite::CcnTlv, Suite::NdnTlv, Suite::LocalRpc];

    /// Integer tag of this suite
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Map an integer tag back to a suite
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            1 => Some(Suite::Ccnb),
            2 => Some(Suite::CcnTlv),
            3 => Some(Suite::NdnTlv),
            4 => Some(Suite::LocalRpc),
            _ => None,
        }
    }

    /// Canonical config/URI name, if the suite has one
    pub fn name(self) -> Option<&'static str> {
        match self {
            Suite::Ccnb => Some("ccnb"),
            Suite::CcnTlv => Some("ccnx2014"),
            Suite::NdnTlv => Some("ndn2013"),
            Suite::LocalRpc => None,
        }
    }

    fn matches(self, data: &[u8]) -> bool {
        match self {
            Suite::Ccnb => data[0] == ccnb::INTEREST_MARKER || data[0] == ccnb::CONTENT_MARKER,
            Suite::CcnTlv => {
                data[0] == ccntlv::VERSION
                    && data.len() > 1
                    && (data[1] == ccntlv::PT_INTEREST || data[1] == ccntlv::PT_CONTENT)
            }
            Suite::NdnTlv => data[0] == ndntlv::TLV_INTEREST || data[0] == ndntlv::TLV_DATA,
            Suite::LocalRpc => data[0] == LOCALRPC_MARKER,
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("?"))
    }
}

impl FromStr for Suite {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ccnb" => Ok(Suite::Ccnb),
            "ccnx2014" => Ok(Suite::CcnTlv),
            "ndn2013" => Ok(Suite::NdnTlv),
            _ => Err(WireError::UnknownSuite(s.to_string())),
        }
    }
}

/// Integer tag for an optional suite, -1 when unknown
pub fn suite_tag(suite: Option<Suite>) -> i32 {
    suite.map_or(UNKNOWN_SUITE_TAG, Suite::tag)
}

bitflags! {
    /// Suites enabled on this node
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SuiteSet: u8 {
        /// CCNB
        const CCNB = 1 << 0;
        /// CCNx 2014 TLV
        const CCNTLV = 1 << 1;
        /// NDN 2013 TLV
        const NDNTLV = 1 << 2;
        /// Local RPC
        const LOCALRPC = 1 << 3;
    }
}

impl From<Suite> for SuiteSet {
    fn from(suite: Suite) -> Self {
        match suite {
            Suite::Ccnb => SuiteSet::CCNB,
            Suite::CcnTlv => SuiteSet::CCNTLV,
            Suite::NdnTlv => SuiteSet::NDNTLV,
            Suite::LocalRpc => SuiteSet::LOCALRPC,
        }
    }
}

impl FromIterator<Suite> for SuiteSet {
    fn from_iter<I: IntoIterator<Item = Suite>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SuiteSet::empty(), |set, suite| set | suite.into())
    }
}

impl Default for SuiteSet {
    fn default() -> Self {
        SuiteSet::all()
    }
}

impl SuiteSet {
    /// Whether `suite` is enabled
    pub fn enables(self, suite: Suite) -> bool {
        self.contains(suite.into())
    }

    /// Enabled suites in priority order
    pub fn suites(self) -> impl Iterator<Item = Suite> {
        Suite::ALL.into_iter().filter(move |s| self.enables(*s))
    }

    /// Classify a raw packet by its leading bytes.
    ///
    /// Suites are tested in fixed priority order (CCNB, CCNTLV, NDNTLV,
    /// LOCALRPC) and only if enabled. Returns `None` for an empty buffer or
    /// when no signature matches.
    pub fn sniff(self, data: &[u8]) -> Option<Suite> {
        if data.is_empty() {
            return None;
        }
        self.suites().find(|suite| suite.matches(data))
    }

    /// Parse a suite name, honouring the enabled set
    pub fn suite_from_str(self, name: &str) -> Option<Suite> {
        name.parse::<Suite>().ok().filter(|s| self.enables(*s))
    }

    /// Name for an integer tag, `"?"` when unknown or disabled
    pub fn suite_to_str(self, tag: i32) -> &'static str {
        Suite::from_tag(tag)
            .filter(|s| self.enables(*s))
            .and_then(Suite::name)
            .unwrap_or("?")
    }
}

/// Classify a raw packet against every suite
pub fn pkt_to_suite(data: &[u8]) -> Option<Suite> {
    SuiteSet::all().sniff(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_conversion() {
        for suite in Suite::ALL {
            assert_eq!(Suite::from_tag(suite.tag()), Some(suite));
        }
        assert_eq!(Suite::from_tag(0), None);
        assert_eq!(Suite::from_tag(-1), None);
        assert_eq!(suite_tag(None), -1);
        assert_eq!(suite_tag(Some(Suite::NdnTlv)), 3);
    }

    #[test]
    fn test_suite_strings() {
        assert_eq!("ccnb".parse::<Suite>().unwrap(), Suite::Ccnb);
        assert_eq!("ccnx2014".parse::<Suite>().unwrap(), Suite::CcnTlv);
        assert_eq!("ndn2013".parse::<Suite>().unwrap(), Suite::NdnTlv);
        assert!("?".parse::<Suite>().is_err());
        assert!("ndn".parse::<Suite>().is_err());

        assert_eq!(Suite::CcnTlv.to_string(), "ccnx2014");
        assert_eq!(Suite::LocalRpc.to_string(), "?");
    }

    #[test]
    fn test_disabled_suite_mapping() {
        let set = SuiteSet::CCNB | SuiteSet::NDNTLV;
        assert_eq!(set.suite_from_str("ndn2013"), Some(Suite::NdnTlv));
        assert_eq!(set.suite_from_str("ccnx2014"), None);
        assert_eq!(set.suite_to_str(Suite::CcnTlv.tag()), "?");
        assert_eq!(set.suite_to_str(Suite::Ccnb.tag()), "ccnb");
        assert_eq!(set.suite_to_str(-1), "?");
        assert_eq!(set.suite_to_str(42), "?");
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(pkt_to_suite(&[0x01, 0xd2]), Some(Suite::Ccnb));
        assert_eq!(pkt_to_suite(&[0x04, 0x82]), Some(Suite::Ccnb));
        assert_eq!(pkt_to_suite(&[0x00, 0x01, 0x00]), Some(Suite::CcnTlv));
        assert_eq!(pkt_to_suite(&[0x00, 0x02]), Some(Suite::CcnTlv));
        assert_eq!(pkt_to_suite(&[0x05, 0x00]), Some(Suite::NdnTlv));
        assert_eq!(pkt_to_suite(&[0x06]), Some(Suite::NdnTlv));
        assert_eq!(pkt_to_suite(&[0x80, 0x01]), Some(Suite::LocalRpc));
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(pkt_to_suite(&[]), None);
        // CCNTLV needs the packet type byte
        assert_eq!(pkt_to_suite(&[0x00]), None);
        assert_eq!(pkt_to_suite(&[0x00, 0x09]), None);
        assert_eq!(pkt_to_suite(&[0xff, 0x00]), None);
    }

    #[test]
    fn test_sniff_respects_enabled_set() {
        let set = SuiteSet::NDNTLV;
        assert_eq!(set.sniff(&[0x05]), Some(Suite::NdnTlv));
        assert_eq!(set.sniff(&[0x01, 0xd2]), None);
        assert_eq!(set.sniff(&[0x80]), None);
        assert_eq!(SuiteSet::empty().sniff(&[0x05]), None);
    }

    #[test]
    fn test_suite_set_collect() {
        let set: SuiteSet = [Suite::Ccnb, Suite::LocalRpc].into_iter().collect();
        assert!(set.enables(Suite::Ccnb));
        assert!(set.enables(Suite::LocalRpc));
        assert!(!set.enables(Suite::NdnTlv));
        assert_eq!(set.suites().collect::<Vec<_>>(), vec![Suite::Ccnb, Suite::LocalRpc]);
    }
}
