//! ccnl command line utility.
//!
//! Builds Interest and Content packets for the configured suites, sniffs the
//! suite of captured packets, canonicalises NFN lambda expressions and
//! prints names the way forwarders log them.

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use ccnl_wire::{PacketBuilder, Prefix, Suite};
use chrono::{DateTime, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod logging;

use config::CcnlConfig;
use logging::CcnlLogFormatter;

// Component logging macros are defined in logging.rs and available via #[macro_export]

/// CCN name and packet tool
#[derive(Parser, Debug)]
#[command(name = "ccnl", version, about = "CCN name encoding and packet tool")]
struct Args {
    /// Configuration file path
    #[arg(long, default_value = "ccnl.yaml", global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Print a JSON report instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Name selection shared by the packet subcommands
#[derive(ClapArgs, Debug)]
struct NameArgs {
    /// Name URI, e.g. /ccnx/test%20page
    uri: String,

    /// Wire suite (ccnb, ccnx2014, ndn2013, localrpc); defaults to the configured suite
    #[arg(long, value_parser = parse_suite_arg)]
    suite: Option<Suite>,

    /// Chunk number appended as the last component
    #[arg(long)]
    chunk: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an Interest packet
    Interest {
        #[command(flatten)]
        name: NameArgs,

        /// NFN lambda expression carried as the final component
        #[arg(long)]
        nfn: Option<String>,

        /// Nonce for suites that carry one
        #[arg(long)]
        nonce: Option<u32>,

        /// Write the raw packet to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build a Content packet
    Content {
        #[command(flatten)]
        name: NameArgs,

        /// Payload given inline
        #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
        payload: Option<String>,

        /// Payload read from a file
        #[arg(long)]
        payload_file: Option<PathBuf>,

        /// Write the raw packet to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report the suite of a captured packet
    Sniff {
        /// Packet file
        file: PathBuf,
    },
    /// Print the canonical form of a lambda expression
    Lambda {
        /// Expression, e.g. "(@x x) y"
        expr: String,
    },
    /// Print a name the way forwarders log it
    Path {
        #[command(flatten)]
        name: NameArgs,

        /// NFN lambda expression carried as the final component
        #[arg(long)]
        nfn: Option<String>,
    },
}

/// Report for a built packet
#[derive(Debug, Serialize)]
struct PacketReport {
    kind: &'static str,
    suite: Suite,
    tag: i32,
    path: String,
    len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_offset: Option<usize>,
    hex: String,
    generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct SniffReport {
    file: PathBuf,
    suite: Option<Suite>,
    name: &'static str,
    tag: i32,
}

#[derive(Debug, Serialize)]
struct LambdaReport {
    input: String,
    canonical: String,
}

#[derive(Debug, Serialize)]
struct PathReport {
    suite: Suite,
    path: String,
    components: usize,
    chunk: Option<u32>,
}

fn parse_suite_arg(s: &str) -> Result<Suite, String> {
    config::parse_suite(s).ok_or_else(|| format!("unknown suite {:?}", s))
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Canonicalise an NFN expression so equal terms yield equal names
fn canonical_expr(expr: &str) -> Result<String> {
    let term = ccnl_nfn::parse(expr).with_context(|| format!("invalid lambda expression {:?}", expr))?;
    Ok(term.to_string())
}

/// Build the prefix for `name`, with an optional NFN expression as last component
fn nfn_prefix(config: &CcnlConfig, name: &NameArgs, nfn: Option<&str>) -> Result<Prefix> {
    let suite = name.suite.unwrap_or(config.default_suite);
    let expr = nfn.map(canonical_expr).transpose()?;

    let prefix = Prefix::from_uri_limited(
        &name.uri,
        suite,
        expr.as_deref(),
        name.chunk,
        config.max_name_components,
    )
    .with_context(|| format!("cannot encode {:?} for {}", name.uri, suite))?;
    Ok(prefix)
}

fn emit<T: Serialize>(json: bool, report: &T, text: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn write_packet(out: Option<&Path>, bytes: &Bytes) -> Result<()> {
    if let Some(path) = out {
        std::fs::write(path, bytes).with_context(|| format!("cannot write {:?}", path))?;
        component_info!("packet", "Wrote {} bytes to {:?}", bytes.len(), path);
    }
    Ok(())
}

fn packet_report(kind: &'static str, prefix: &Prefix, bytes: &Bytes, payload_offset: Option<usize>) -> PacketReport {
    PacketReport {
        kind,
        suite: prefix.suite(),
        tag: prefix.suite().tag(),
        path: prefix.to_path(),
        len: bytes.len(),
        payload_offset,
        hex: to_hex(bytes),
        generated_at: Utc::now(),
    }
}

fn run(args: Args) -> Result<()> {
    let config = CcnlConfig::load_from_file(&args.config)?;
    let builder = PacketBuilder::new(config.suite_set()).with_max_packet_size(config.max_packet_size);

    match args.command {
        Command::Interest { name, nfn, nonce, out } => {
            let prefix = nfn_prefix(&config, &name, nfn.as_deref())?;
            let bytes = builder.interest(&prefix, nonce)?;
            if bytes.is_empty() {
                bail!("suite {} cannot build interest packets", prefix.suite());
            }
            component_info!("packet", "Built interest for {} ({} bytes)", prefix, bytes.len());
            write_packet(out.as_deref(), &bytes)?;
            let report = packet_report("interest", &prefix, &bytes, None);
            emit(args.json, &report, &report.hex)
        }
        Command::Content { name, payload, payload_file, out } => {
            let payload = match (payload, payload_file) {
                (Some(inline), _) => inline.into_bytes(),
                (None, Some(path)) => {
                    std::fs::read(&path).with_context(|| format!("cannot read payload {:?}", path))?
                }
                (None, None) => bail!("either --payload or --payload-file is required"),
            };
            let prefix = nfn_prefix(&config, &name, None)?;
            let packet = builder.content(&prefix, &payload)?;
            if packet.is_empty() {
                bail!("suite {} cannot build content packets", prefix.suite());
            }
            component_info!(
                "packet",
                "Built content for {} ({} bytes, payload at {})",
                prefix,
                packet.bytes.len(),
                packet.payload_offset
            );
            write_packet(out.as_deref(), &packet.bytes)?;
            let report = packet_report("content", &prefix, &packet.bytes, Some(packet.payload_offset));
            emit(args.json, &report, &report.hex)
        }
        Command::Sniff { file } => {
            let data = std::fs::read(&file).with_context(|| format!("cannot read {:?}", file))?;
            let enabled = config.suite_set();
            let suite = enabled.sniff(&data);
            component_debug!("sniff", "{} bytes from {:?} classified as {:?}", data.len(), file, suite);
            let tag = ccnl_wire::suite_tag(suite);
            let report = SniffReport {
                file,
                suite,
                name: enabled.suite_to_str(tag),
                tag,
            };
            emit(args.json, &report, report.name)
        }
        Command::Lambda { expr } => {
            let canonical = canonical_expr(&expr)?;
            let report = LambdaReport { input: expr, canonical };
            emit(args.json, &report, &report.canonical)
        }
        Command::Path { name, nfn } => {
            let prefix = nfn_prefix(&config, &name, nfn.as_deref())?;
            let report = PathReport {
                suite: prefix.suite(),
                path: prefix.to_path(),
                components: prefix.len(),
                chunk: prefix.chunknum(),
            };
            emit(args.json, &report, &report.path)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so packet output on stdout stays clean
    let env_filter = EnvFilter::new("warn")
        .add_directive(format!("ccnl={}", args.log_level).parse()?)
        .add_directive(format!("ccnl_wire={}", args.log_level).parse()?)
        .add_directive(format!("ccnl_nfn={}", args.log_level).parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .event_format(CcnlLogFormatter::new("ccnl"))
        .init();

    if let Err(e) = run(args) {
        component_error!("cli", "{:#}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccnl_wire::NfnFlags;

    fn name(uri: &str, suite: Option<Suite>) -> NameArgs {
        NameArgs {
            uri: uri.to_string(),
            suite,
            chunk: None,
        }
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab]), "000fab");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_canonical_expr() {
        assert_eq!(canonical_expr("  f   x ").unwrap(), "f x");
        assert!(canonical_expr("(f x").is_err());
    }

    #[test]
    fn test_nfn_prefix_uses_default_suite() {
        let config = CcnlConfig::default();
        let prefix = nfn_prefix(&config, &name("/a/b", None), None).unwrap();
        assert_eq!(prefix.suite(), config.default_suite);
        assert_eq!(prefix.len(), 2);
        assert_eq!(prefix.to_path(), "/a/b");
    }

    #[test]
    fn test_nfn_prefix_canonicalises_expression() {
        let config = CcnlConfig::default();
        let prefix = nfn_prefix(&config, &name("/node", Some(Suite::Ccnb)), Some("f   x")).unwrap();
        assert!(prefix.nfn_flags().contains(NfnFlags::NFN));
        assert_eq!(prefix.nfn_expression(), Some(&b"f x"[..]));
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "ccnl", "--json", "interest", "/a/b", "--suite", "ccnx2014", "--nonce", "7",
        ])
        .unwrap();
        assert!(args.json);
        match args.command {
            Command::Interest { name, nonce, .. } => {
                assert_eq!(name.suite, Some(Suite::CcnTlv));
                assert_eq!(nonce, Some(7));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_content_requires_payload() {
        assert!(Args::try_parse_from(["ccnl", "content", "/a"]).is_err());
        assert!(Args::try_parse_from(["ccnl", "content", "/a", "--payload", "x", "--payload-file", "f"]).is_err());
    }

    #[test]
    fn test_unknown_suite_rejected() {
        assert!(Args::try_parse_from(["ccnl", "path", "/a", "--suite", "bogus"]).is_err());
    }
}
