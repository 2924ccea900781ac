//! Minimal monitor: logs in to a master and prints every call it relays.
//!
//! Run with:
//!   DMRLINK_MASTER=master.example.org:62031 DMRLINK_ID=204342 \
//!   DMRLINK_AUTH_KEY=passw0rd cargo run --example monitor

use std::time::Duration;

use dmrlink::frame::{Frame, FrameType};
use dmrlink::link::{Link, LinkConfig, RepeaterConfiguration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let master = std::env::var("DMRLINK_MASTER")?;
    let id: u32 = std::env::var("DMRLINK_ID")?.parse()?;
    let key = std::env::var("DMRLINK_AUTH_KEY").unwrap_or_default();

    let config = LinkConfig::new(id, master)
        .with_auth_key(key)
        .with_keepalive_interval(Duration::from_secs(10));
    let repeater = RepeaterConfiguration {
        callsign: "MONITOR".to_string(),
        repeater_id: id,
        color_code: 1,
        description: "dmrlink monitor example".to_string(),
        ..Default::default()
    };

    let handle = Link::new(config, repeater)?
        .with_handler(|frame: &Frame| {
            if frame.frame_type() == FrameType::DataSync {
                eprintln!(
                    "slot {} stream {:08x}: {} -> {} (data type {})",
                    frame.slot(),
                    frame.stream_id,
                    frame.src_id,
                    frame.dst_id,
                    frame.data_type()
                );
            }
        })
        .start()
        .await?;

    handle.authenticated().await?;
    eprintln!("Linked as {} via {}", handle.identity(), handle.local_addr());

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await?;
    Ok(())
}
