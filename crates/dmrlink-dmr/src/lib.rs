//! DMR air-interface primitives.
//!
//! The pieces of a DMR burst that the Home Brew link needs to look inside:
//! - Bit-serial checksum engines (CRC-9, CRC-16, CRC-32)
//! - The quadratic-residue (16,7,6) code protecting embedded signalling
//! - Burst bit layout (info, sync, EMB and embedded LC fragment regions)
//! - The stateless EMB parser and a caller-owned LC fragment assembler
//!
//! Bit sequences are `[u8]` slices holding one bit (0 or 1) per element,
//! most significant bit first.

pub mod bits;
pub mod burst;
pub mod crc;
pub mod emb;
pub mod error;
pub mod lc;
pub mod quadres;

pub use bits::{bits_from_bytes, bytes_from_bits, pack_bits};
pub use burst::{Burst, BURST_BITS, BURST_BYTES, INFO_BITS, SYNC_BITS};
pub use crc::{Crc16, Crc32, Crc9};
pub use emb::{
    extract_emb_bits, extract_lc_fragment_bits, parse_emb, parse_emb_with, Emb, Lcss, EMB_BITS,
    EMB_HALF_BITS, EMB_LC_FRAGMENT_BITS,
};
pub use error::{DmrError, Result};
pub use lc::LcAssembler;
pub use quadres::{ParityCheck, QuadraticResidue1676};
