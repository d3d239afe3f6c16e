//! Basic usage example for the ccnl wire layer.

use ccnl_wire::{pkt_to_suite, PacketBuilder, Prefix, Suite, SuiteSet};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== CCN Wire Example ===\n");

    // 1. Build a prefix from a URI
    println!("1. Building a prefix...");
    let name = Prefix::from_uri("/ccnx/demo/hello%20world", Suite::NdnTlv, None, None)?;
    println!("   Path: {}", name);
    println!("   Components: {}", name.len());

    // 2. Encode an Interest for every suite
    println!("\n2. Encoding interests...");
    let builder = PacketBuilder::new(SuiteSet::all());
    for suite in [Suite::Ccnb, Suite::CcnTlv, Suite::NdnTlv] {
        let name = Prefix::from_uri("/ccnx/demo", suite, None, Some(0))?;
        let pkt = builder.interest(&name, Some(0x1234))?;
        println!(
            "   {:<9} {:>3} bytes, sniffed as {}",
            suite.to_string(),
            pkt.len(),
            pkt_to_suite(&pkt).map_or("?".to_string(), |s| s.to_string())
        );
    }

    // 3. Encode content and locate its payload
    println!("\n3. Encoding content...");
    let name = Prefix::from_uri("/ccnx/demo", Suite::CcnTlv, None, None)?;
    let packet = builder.content(&name, b"Hello, CCN!")?;
    println!(
        "   {} bytes, payload at offset {}",
        packet.bytes.len(),
        packet.payload_offset
    );

    // 4. NFN names carry an expression as the last component
    println!("\n4. NFN name...");
    let name = Prefix::from_uri("", Suite::NdnTlv, Some("call 2 /fn/wc /doc"), None)?;
    println!("   Path: {}", name);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
