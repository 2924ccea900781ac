//! Bit-serial cyclic redundancy checks.
//!
//! All three engines share the same shape: a left-shifting register fed MSB
//! first, the generator XORed in whenever the bit shifted out was set, and a
//! `finalize` that clocks in zeros to drain the register. With an initial
//! register of zero this yields the plain (non-reflected, no final XOR) CRC of
//! the input.

/// CRC-9 generator, G(x) = x^9 + x^6 + x^4 + x^3 + 1.
pub const CRC9_POLY: u16 = 0x0059;
/// CRC-16 generator, G(x) = x^16 + x^12 + x^5 + 1.
pub const CRC16_POLY: u16 = 0x1021;
/// CRC-32 generator, G(x) = x^32 + x^26 + x^23 + ... + x + 1.
pub const CRC32_POLY: u32 = 0x04C1_1DB7;

const CRC9_MASK: u16 = 0x01FF;
const CRC9_TOP: u16 = 0x0100;

/// Running CRC-9 register.
///
/// Used over bit counts that are not a multiple of eight, so both feeding and
/// draining take an explicit bit count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc9 {
    state: u16,
}

impl Crc9 {
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Feed all eight bits of `byte`, MSB first.
    pub fn update(&mut self, byte: u8) {
        self.update_bits(byte, 8);
    }

    /// Feed the `bits` significant bits of `byte`, MSB first, padded with
    /// zero-input shifts to a full eight clocks.
    ///
    /// Equivalent to `update(byte << (8 - bits))`. `bits` is capped at 8.
    pub fn update_bits(&mut self, byte: u8, bits: u32) {
        let bits = bits.min(8);
        for i in 0..8 {
            let input = i < bits && (byte >> (bits - 1 - i)) & 1 == 1;
            self.clock(input);
        }
    }

    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Drain the register with `bits` zero-input shifts and return the checksum.
    pub fn finalize(mut self, bits: u32) -> u16 {
        for _ in 0..bits {
            self.clock(false);
        }
        self.state
    }

    /// One-shot CRC-9 of byte-aligned data, drained with nine zero shifts.
    pub fn checksum(data: &[u8]) -> u16 {
        let mut crc = Self::new();
        crc.update_slice(data);
        crc.finalize(9)
    }

    /// Current register contents.
    pub fn state(&self) -> u16 {
        self.state
    }

    fn clock(&mut self, input: bool) {
        let xor = self.state & CRC9_TOP != 0;
        self.state = (self.state << 1) & CRC9_MASK;
        if input {
            self.state |= 1;
        }
        if xor {
            self.state ^= CRC9_POLY;
        }
    }
}

/// Running CRC-16 (CCITT polynomial) register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16 {
    state: u16,
}

impl Crc16 {
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    pub fn update(&mut self, byte: u8) {
        for i in (0..8).rev() {
            self.clock((byte >> i) & 1 == 1);
        }
    }

    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Drain the register with 16 zero-input shifts and return the checksum.
    pub fn finalize(mut self) -> u16 {
        for _ in 0..16 {
            self.clock(false);
        }
        self.state
    }

    /// One-shot checksum of a byte slice.
    pub fn checksum(data: &[u8]) -> u16 {
        let mut crc = Self::new();
        crc.update_slice(data);
        crc.finalize()
    }

    pub fn state(&self) -> u16 {
        self.state
    }

    fn clock(&mut self, input: bool) {
        let xor = self.state & 0x8000 != 0;
        self.state <<= 1;
        if input {
            self.state |= 1;
        }
        if xor {
            self.state ^= CRC16_POLY;
        }
    }
}

/// Running CRC-32 register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    pub fn update(&mut self, byte: u8) {
        for i in (0..8).rev() {
            self.clock((byte >> i) & 1 == 1);
        }
    }

    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Drain the register with 32 zero-input shifts and return the checksum.
    pub fn finalize(mut self) -> u32 {
        for _ in 0..32 {
            self.clock(false);
        }
        self.state
    }

    /// One-shot checksum of a byte slice.
    pub fn checksum(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update_slice(data);
        crc.finalize()
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    fn clock(&mut self, input: bool) {
        let xor = self.state & 0x8000_0000 != 0;
        self.state <<= 1;
        if input {
            self.state |= 1;
        }
        if xor {
            self.state ^= CRC32_POLY;
        }
    }
}
