//! Name encoding and multi-suite packet building for content-centric networking.
//!
//! This crate turns human-readable URIs into name prefixes, encodes name
//! components for each wire suite, sniffs the suite of incoming packets and
//! builds simple Interest and Content packets.
//!
//! ## Features
//!
//! - **Runtime Suites**: CCNB, CCNx 2014 TLV, NDN 2013 TLV and local RPC,
//!   each enabled through a [`SuiteSet`]
//! - **Single-Buffer Prefixes**: all components of a name live in one
//!   `Bytes` allocation, addressed by offset and length
//! - **Prepend Encoding**: TLV packets are built back to front in a
//!   fixed scratch buffer with underflow checks
//! - **NFN Names**: a lambda expression can ride as the last component
//!
//! ## Data Flow
//!
//! ```text
//! URI --tokenize--> components --encode(suite)--> Prefix buffer
//!                                                     |
//!                     PacketBuilder --dispatch(suite)-+--> packet bytes
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod error;
pub mod packet;
pub mod prefix;
pub mod prepend;
pub mod suite;
pub mod suites;
pub mod uri;

// Re-export main types
pub use component::{
    encode_component, encoded_component_len, prepend_component, CCNTLV_COMPONENT_HEADER,
};
pub use error::WireError;
pub use packet::{
    encoder_for, ContentPacket, ForwardEncoder, PacketBuilder, PrependEncoder, SuiteEncoder,
    MAX_PACKET_SIZE,
};
pub use prefix::{NfnFlags, Prefix};
pub use prepend::PrependBuf;
pub use suite::{pkt_to_suite, suite_tag, Suite, SuiteSet, LOCALRPC_MARKER, UNKNOWN_SUITE_TAG};
pub use uri::{
    lambda_expr_components, unescape_component, uri_to_components, ComponentRanges,
    MAX_NAME_COMPONENTS,
};
