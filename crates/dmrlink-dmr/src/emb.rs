//! Embedded signalling (EMB).
//!
//! Voice bursts B to F replace the 48-bit sync pattern with two 8-bit EMB
//! halves around a 32-bit embedded LC fragment. The 16 EMB bits form a
//! QR(16,7,6) codeword carrying color code (4 bits), PI (1 bit, always 0)
//! and LCSS (2 bits).

use std::fmt;

use tracing::trace;

use crate::bits::{pack_bits, unpack_bits};
use crate::burst::SYNC_BITS;
use crate::error::{DmrError, Result};
use crate::quadres::{ParityCheck, QuadraticResidue1676};

/// Width of the EMB codeword.
pub const EMB_BITS: usize = 16;
/// Width of each EMB half inside the sync region.
pub const EMB_HALF_BITS: usize = 8;
/// Width of the embedded LC fragment between the EMB halves.
pub const EMB_LC_FRAGMENT_BITS: usize = 32;

const PI_BIT: usize = 4;

/// Link control start/stop: how an LC message is spread over bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lcss {
    /// Complete message in this burst.
    Single,
    /// First fragment of a multi-burst message.
    First,
    /// Last fragment of a multi-burst message.
    Last,
    /// Any fragment between first and last.
    Continuation,
}

impl Lcss {
    /// Decode the 2-bit LCSS value. Only the low two bits are used.
    pub fn from_bits(value: u8) -> Self {
        match value & 0x03 {
            0 => Self::Single,
            1 => Self::First,
            2 => Self::Last,
            _ => Self::Continuation,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::First => 1,
            Self::Last => 2,
            Self::Continuation => 3,
        }
    }
}

impl fmt::Display for Lcss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Single => "single",
            Self::First => "first",
            Self::Last => "last",
            Self::Continuation => "continuation",
        };
        f.write_str(name)
    }
}

/// A validated EMB field.
///
/// Obtained from [`parse_emb`]; there is no way to build one that carries a
/// set PI bit or failed parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emb {
    color_code: u8,
    lcss: Lcss,
}

impl Emb {
    /// Build an EMB for transmission. The color code is masked to 4 bits.
    pub fn new(color_code: u8, lcss: Lcss) -> Self {
        Self {
            color_code: color_code & 0x0F,
            lcss,
        }
    }

    pub fn color_code(&self) -> u8 {
        self.color_code
    }

    pub fn lcss(&self) -> Lcss {
        self.lcss
    }

    /// The 16-bit QR(16,7,6) codeword for this EMB (PI = 0).
    pub fn encode(&self) -> u16 {
        let data = (self.color_code << 3) | self.lcss.bits();
        QuadraticResidue1676::encode(data)
    }

    /// The codeword as 16 bits, MSB first.
    pub fn to_bits(&self) -> Vec<u8> {
        unpack_bits(u32::from(self.encode()), EMB_BITS)
    }
}

/// Gather the two EMB halves out of a 48-bit sync region.
///
/// Pure rearrangement: `sync[0..8]` followed by `sync[40..48]`.
pub fn extract_emb_bits(sync: &[u8; SYNC_BITS]) -> Vec<u8> {
    let second = EMB_HALF_BITS + EMB_LC_FRAGMENT_BITS;
    let mut bits = Vec::with_capacity(EMB_BITS);
    bits.extend_from_slice(&sync[..EMB_HALF_BITS]);
    bits.extend_from_slice(&sync[second..second + EMB_HALF_BITS]);
    bits
}

/// The 32-bit embedded LC fragment between the EMB halves.
pub fn extract_lc_fragment_bits(sync: &[u8; SYNC_BITS]) -> Vec<u8> {
    sync[EMB_HALF_BITS..EMB_HALF_BITS + EMB_LC_FRAGMENT_BITS].to_vec()
}

/// Parse 16 EMB bits using the QR(16,7,6) checker.
pub fn parse_emb(bits: &[u8]) -> Result<Emb> {
    parse_emb_with(&QuadraticResidue1676, bits)
}

/// Parse 16 EMB bits with an explicit parity checker.
pub fn parse_emb_with<C: ParityCheck + ?Sized>(checker: &C, bits: &[u8]) -> Result<Emb> {
    if bits.len() != EMB_BITS {
        return Err(DmrError::Length {
            expected: EMB_BITS,
            actual: bits.len(),
        });
    }

    if let Some((index, &value)) = bits.iter().enumerate().find(|(_, bit)| **bit > 1) {
        return Err(DmrError::NotABit { index, value });
    }

    let codeword = pack_bits(bits) as u16;
    if !checker.check(codeword) {
        trace!(codeword, "emb parity check failed");
        return Err(DmrError::Checksum);
    }

    if bits[PI_BIT] != 0 {
        return Err(DmrError::ReservedBit);
    }

    Ok(Emb {
        color_code: pack_bits(&bits[0..4]) as u8,
        lcss: Lcss::from_bits(pack_bits(&bits[5..7]) as u8),
    })
}
