use bytes::{Buf, BufMut, Bytes, BytesMut};
use dmrlink_dmr::{Burst, Emb, BURST_BYTES};

use crate::error::{FrameError, Result};
use crate::signature::DMR_DATA;

/// Wire size of a repeater data frame.
pub const FRAME_SIZE: usize = 53;

/// Offset of the DMR burst payload within a frame.
pub const PAYLOAD_OFFSET: usize = 20;

/// Largest radio ID that fits the 24-bit source/destination fields.
pub const MAX_RADIO_ID: u32 = 0x00FF_FFFF;

/// Whether a call is addressed to a talk group or to a single radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Group,
    Unit,
}

/// Burst classification carried in the frame flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Voice,
    VoiceSync,
    DataSync,
    Unused,
}

impl FrameType {
    fn from_bits(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Voice,
            1 => Self::VoiceSync,
            2 => Self::DataSync,
            _ => Self::Unused,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::Voice => 0,
            Self::VoiceSync => 1,
            Self::DataSync => 2,
            Self::Unused => 3,
        }
    }
}

/// A repeater data frame (`DMRD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Packet signature, `DMRD` for frames built locally.
    pub signature: [u8; 4],
    /// Per-stream sequence counter.
    pub sequence: u8,
    /// Source radio ID (24 bits).
    pub src_id: u32,
    /// Destination radio or talk group ID (24 bits).
    pub dst_id: u32,
    /// Originating repeater ID.
    pub repeater_id: u32,
    /// Slot, call type, frame type and data type.
    pub flags: u8,
    /// Identifies all frames belonging to one call.
    pub stream_id: u32,
    /// The 33-byte DMR burst.
    pub dmr: [u8; BURST_BYTES],
}

impl Frame {
    /// Create a frame carrying `dmr` with a zeroed header.
    pub fn new(dmr: [u8; BURST_BYTES]) -> Self {
        Self {
            signature: *DMR_DATA,
            sequence: 0,
            src_id: 0,
            dst_id: 0,
            repeater_id: 0,
            flags: 0,
            stream_id: 0,
            dmr,
        }
    }

    pub fn with_sequence(mut self, sequence: u8) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set the source radio ID. Only the low 24 bits are kept.
    pub fn with_source(mut self, src_id: u32) -> Self {
        self.src_id = src_id & MAX_RADIO_ID;
        self
    }

    /// Set the destination ID. Only the low 24 bits are kept.
    pub fn with_destination(mut self, dst_id: u32) -> Self {
        self.dst_id = dst_id & MAX_RADIO_ID;
        self
    }

    pub fn with_repeater(mut self, repeater_id: u32) -> Self {
        self.repeater_id = repeater_id;
        self
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_stream(mut self, stream_id: u32) -> Self {
        self.stream_id = stream_id;
        self
    }

    /// Group or unit call (flags bit 1).
    pub fn call_type(&self) -> CallType {
        if (self.flags >> 1) & 0x01 == 0 {
            CallType::Group
        } else {
            CallType::Unit
        }
    }

    /// Voice, voice sync or data sync (flags bits 2-3).
    pub fn frame_type(&self) -> FrameType {
        FrameType::from_bits(self.flags >> 2)
    }

    /// Data type (flags bits 4-7).
    ///
    /// For data sync frames this is the slot data type. For voice frames it
    /// is the voice sequence number, 0 = A through 5 = F.
    pub fn data_type(&self) -> u8 {
        self.flags >> 4
    }

    /// Time slot, 1 or 2 (flags bit 0).
    pub fn slot(&self) -> u8 {
        (self.flags & 0x01) + 1
    }

    /// The payload as a burst.
    pub fn burst(&self) -> Burst {
        Burst::new(self.dmr)
    }

    /// Embedded signalling of a voice burst.
    ///
    /// Returns `None` for frames that do not carry EMB (sync and data bursts).
    pub fn emb(&self) -> Option<dmrlink_dmr::Result<Emb>> {
        match self.frame_type() {
            FrameType::Voice => Some(self.burst().emb()),
            _ => None,
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_SIZE);
        encode_frame(self, &mut buf);
        buf.freeze()
    }
}

/// Build the flags byte from its parts. `data_type` is masked to 4 bits and
/// any slot other than 2 maps to slot 1.
pub fn compose_flags(slot: u8, call_type: CallType, frame_type: FrameType, data_type: u8) -> u8 {
    let slot_bit = u8::from(slot == 2);
    let call_bit = match call_type {
        CallType::Group => 0,
        CallType::Unit => 1,
    };
    ((data_type & 0x0F) << 4) | (frame_type.bits() << 2) | (call_bit << 1) | slot_bit
}

/// Encode a frame into the wire format.
///
/// Wire format (big endian):
/// ```text
/// ┌───────────┬─────┬─────────┬─────────┬──────────┬───────┬──────────┬───────────┐
/// │ Signature │ Seq │ Src ID  │ Dst ID  │ Repeater │ Flags │ Stream   │ DMR burst │
/// │ (4B)      │(1B) │ (3B)    │ (3B)    │ (4B)     │ (1B)  │ (4B)     │ (33B)     │
/// │ 0         │ 4   │ 5       │ 8       │ 11       │ 15    │ 16       │ 20        │
/// └───────────┴─────┴─────────┴─────────┴──────────┴───────┴──────────┴───────────┘
/// ```
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    dst.reserve(FRAME_SIZE);
    dst.put_slice(&frame.signature);
    dst.put_u8(frame.sequence);
    dst.put_uint(u64::from(frame.src_id & MAX_RADIO_ID), 3);
    dst.put_uint(u64::from(frame.dst_id & MAX_RADIO_ID), 3);
    dst.put_u32(frame.repeater_id);
    dst.put_u8(frame.flags);
    dst.put_u32(frame.stream_id);
    dst.put_slice(&frame.dmr);
}

/// Decode a frame from a datagram.
///
/// The datagram must be exactly [`FRAME_SIZE`] bytes. The signature is
/// carried over as-is.
pub fn decode_frame(src: &[u8]) -> Result<Frame> {
    if src.len() != FRAME_SIZE {
        return Err(FrameError::Length {
            expected: FRAME_SIZE,
            actual: src.len(),
        });
    }

    let mut buf = src;
    let mut signature = [0u8; 4];
    buf.copy_to_slice(&mut signature);
    let sequence = buf.get_u8();
    let src_id = buf.get_uint(3) as u32;
    let dst_id = buf.get_uint(3) as u32;
    let repeater_id = buf.get_u32();
    let flags = buf.get_u8();
    let stream_id = buf.get_u32();
    let mut dmr = [0u8; BURST_BYTES];
    buf.copy_to_slice(&mut dmr);

    Ok(Frame {
        signature,
        sequence,
        src_id,
        dst_id,
        repeater_id,
        flags,
        stream_id,
        dmr,
    })
}
