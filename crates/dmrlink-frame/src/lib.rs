//! Home Brew repeater data frame codec.
//!
//! A `DMRD` datagram is always exactly 53 bytes:
//! - A 4-byte signature
//! - Sequence, 24-bit source and destination IDs, 32-bit repeater ID
//! - A flags byte (slot, call type, frame type, data type)
//! - A 32-bit stream ID and the 33-byte DMR burst at offset 20
//!
//! Signatures for the link's control packets live in [`signature`].

pub mod codec;
pub mod error;
pub mod signature;

pub use codec::{
    compose_flags, decode_frame, encode_frame, CallType, Frame, FrameType, FRAME_SIZE,
    MAX_RADIO_ID, PAYLOAD_OFFSET,
};
pub use error::{FrameError, Result};
pub use signature::{is_data, signature_name};
