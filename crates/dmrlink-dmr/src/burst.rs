//! Bit layout of a 33-byte DMR burst.
//!
//! ```text
//! ┌──────────┬───────────┬──────────────┬───────────┬──────────┐
//! │ Info     │ Slot type │ Sync / EMB   │ Slot type │ Info     │
//! │ 98 bits  │ 10 bits   │ 48 bits      │ 10 bits   │ 98 bits  │
//! └──────────┴───────────┴──────────────┴───────────┴──────────┘
//! ```
//!
//! Voice bursts have no slot type: 108 bits of voice either side of the
//! 48-bit sync region, which lands on the same offset.

use crate::bits::bits_from_bytes;
use crate::emb::{extract_emb_bits, extract_lc_fragment_bits, parse_emb, Emb};
use crate::error::{DmrError, Result};

pub const BURST_BYTES: usize = 33;
pub const BURST_BITS: usize = BURST_BYTES * 8;
pub const INFO_BITS: usize = 196;
pub const INFO_HALF_BITS: usize = 98;
pub const SLOT_TYPE_BITS: usize = 20;
pub const SLOT_TYPE_HALF_BITS: usize = 10;
pub const SYNC_BITS: usize = 48;

/// Offset of the sync region within the burst.
pub const SYNC_OFFSET: usize = INFO_HALF_BITS + SLOT_TYPE_HALF_BITS;

/// A single 264-bit burst as carried in a repeater data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    bytes: [u8; BURST_BYTES],
}

impl Burst {
    pub fn new(bytes: [u8; BURST_BYTES]) -> Self {
        Self { bytes }
    }

    /// Build a burst from a slice that must be exactly 33 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; BURST_BYTES] = bytes.try_into().map_err(|_| DmrError::Length {
            expected: BURST_BYTES,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; BURST_BYTES] {
        &self.bytes
    }

    /// All 264 bits, MSB first.
    pub fn bits(&self) -> Vec<u8> {
        bits_from_bytes(&self.bytes)
    }

    /// The 48-bit sync (or EMB + embedded LC) region.
    pub fn sync_bits(&self) -> Vec<u8> {
        self.sync_region().to_vec()
    }

    fn sync_region(&self) -> [u8; SYNC_BITS] {
        let mut region = [0u8; SYNC_BITS];
        region.copy_from_slice(&self.bits()[SYNC_OFFSET..SYNC_OFFSET + SYNC_BITS]);
        region
    }

    /// The 196 info bits of a data burst, with slot type and sync removed.
    pub fn info_bits(&self) -> Vec<u8> {
        let bits = self.bits();
        let mut info = Vec::with_capacity(INFO_BITS);
        info.extend_from_slice(&bits[..INFO_HALF_BITS]);
        info.extend_from_slice(&bits[INFO_HALF_BITS + SYNC_BITS + SLOT_TYPE_BITS..]);
        info
    }

    /// The 16 EMB bits of a voice burst, unvalidated.
    pub fn emb_bits(&self) -> Vec<u8> {
        extract_emb_bits(&self.sync_region())
    }

    /// The 32-bit embedded LC fragment of a voice burst.
    pub fn lc_fragment_bits(&self) -> Vec<u8> {
        extract_lc_fragment_bits(&self.sync_region())
    }

    /// Parse and validate the EMB of a voice burst.
    pub fn emb(&self) -> Result<Emb> {
        parse_emb(&self.emb_bits())
    }
}

impl From<[u8; BURST_BYTES]> for Burst {
    fn from(bytes: [u8; BURST_BYTES]) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bytes_from_bits;
    use crate::emb::Lcss;

    fn voice_burst_with(emb: Emb, fragment: &[u8]) -> Burst {
        let mut bits = vec![0u8; BURST_BITS];
        let emb_bits = emb.to_bits();
        bits[SYNC_OFFSET..SYNC_OFFSET + 8].copy_from_slice(&emb_bits[..8]);
        bits[SYNC_OFFSET + 8..SYNC_OFFSET + 40].copy_from_slice(fragment);
        bits[SYNC_OFFSET + 40..SYNC_OFFSET + 48].copy_from_slice(&emb_bits[8..]);
        Burst::from_slice(&bytes_from_bits(&bits)).unwrap()
    }

    #[test]
    fn layout_widths_add_up() {
        assert_eq!(SYNC_OFFSET, 108);
        assert_eq!(2 * INFO_HALF_BITS + SLOT_TYPE_BITS + SYNC_BITS, BURST_BITS);
        assert_eq!(2 * SYNC_OFFSET + SYNC_BITS, BURST_BITS);
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        assert_eq!(
            Burst::from_slice(&[0; 32]),
            Err(DmrError::Length {
                expected: 33,
                actual: 32
            })
        );
    }

    #[test]
    fn emb_and_fragment_from_voice_burst() {
        let fragment: Vec<u8> = (0..32).map(|i| (i % 2) as u8).collect();
        let burst = voice_burst_with(Emb::new(9, Lcss::First), &fragment);

        let emb = burst.emb().unwrap();
        assert_eq!(emb.color_code(), 9);
        assert_eq!(emb.lcss(), Lcss::First);
        assert_eq!(burst.lc_fragment_bits(), fragment);
    }

    #[test]
    fn all_zero_burst_is_color_code_zero() {
        // The all-zero codeword is valid parity, CC 0, single fragment.
        let burst = Burst::new([0; BURST_BYTES]);
        let emb = burst.emb().unwrap();
        assert_eq!(emb.color_code(), 0);
        assert_eq!(emb.lcss(), Lcss::Single);
    }

    #[test]
    fn info_bits_skip_slot_type_and_sync() {
        let mut bits = vec![0u8; BURST_BITS];
        // Mark the region that must be dropped.
        for bit in bits.iter_mut().skip(INFO_HALF_BITS).take(SLOT_TYPE_BITS + SYNC_BITS) {
            *bit = 1;
        }
        let burst = Burst::from_slice(&bytes_from_bits(&bits)).unwrap();
        let info = burst.info_bits();
        assert_eq!(info.len(), INFO_BITS);
        assert!(info.iter().all(|&bit| bit == 0));
    }
}
