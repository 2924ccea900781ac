//! UDP transport for the Home Brew repeater link.
//!
//! The link talks to exactly one master over a single bound socket. This
//! crate owns that socket:
//! - Resolving the master and local addresses
//! - Binding, with the socket shared between a receive task and senders
//! - Serialized, time-bounded sends
//!
//! Everything above it (handshake, keepalive, frame dispatch) lives in
//! `dmrlink-link`.

pub mod error;
pub mod udp;

pub use error::{Result, TransportError};
pub use udp::{resolve, UdpEndpoint, DEFAULT_IO_TIMEOUT, MAX_DATAGRAM_SIZE};
