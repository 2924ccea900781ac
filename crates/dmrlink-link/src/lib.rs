//! Home Brew repeater link.
//!
//! A [`Link`] logs a repeater in with a master over UDP, answers the
//! salted key challenge, reports the repeater configuration, keeps the
//! session alive with periodic pings and hands every data frame the master
//! sends to a [`StreamHandler`].
//!
//! ```no_run
//! use dmrlink_link::{Link, LinkConfig, RepeaterConfiguration};
//!
//! # async fn run() -> dmrlink_link::Result<()> {
//! let config = LinkConfig::new(204_342, "master.example.org:62031").with_auth_key("passw0rd");
//! let repeater = RepeaterConfiguration {
//!     callsign: "PD0ZRY".to_string(),
//!     repeater_id: 204_342,
//!     color_code: 1,
//!     ..Default::default()
//! };
//! let handle = Link::new(config, repeater)?
//!     .with_handler(|frame: &dmrlink_frame::Frame| println!("{} -> {}", frame.src_id, frame.dst_id))
//!     .start()
//!     .await?;
//! handle.wait().await
//! # }
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod handshake;
pub mod identity;
pub mod keepalive;
pub mod provider;
pub mod repeater;
pub mod session;

pub use config::{
    AuthKey, LinkConfig, DEFAULT_KEEPALIVE_INTERVAL, DEFAULT_LOCAL_ADDR, DEFAULT_LOGIN_TIMEOUT,
    DEFAULT_RETRY_INTERVAL,
};
pub use error::{HandshakeStage, LinkError, Result};
pub use handshake::{auth_digest, transition, AuthState, Transition};
pub use identity::RepeaterIdentity;
pub use keepalive::{KeepaliveCounters, KeepaliveSnapshot};
pub use provider::{ConfigProvider, StreamHandler};
pub use repeater::{RepeaterConfiguration, SoftwareInfo, RECORD_LEN};
pub use session::{Link, LinkHandle};
