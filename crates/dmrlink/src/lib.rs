//! DMR Home Brew repeater link.
//!
//! dmrlink connects a DMR repeater to a Home Brew master over UDP and gives
//! structured access to the traffic it carries.
//!
//! # Crate Structure
//!
//! - [`dmr`]: CRC engines, QR(16,7,6) code, burst layout and EMB parsing
//! - [`frame`]: The 53-byte `DMRD` frame codec and packet signatures
//! - [`transport`]: The UDP endpoint the link runs on
//! - [`link`]: Login, key exchange, keepalive and frame streaming (behind `link` feature)

/// Re-export air-interface types.
pub mod dmr {
    pub use dmrlink_dmr::*;
}

/// Re-export frame types.
pub mod frame {
    pub use dmrlink_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use dmrlink_transport::*;
}

/// Re-export link types (requires `link` feature).
#[cfg(feature = "link")]
pub mod link {
    pub use dmrlink_link::*;
}
