//! Quadratic-residue (16,7,6) code.
//!
//! Seven data bits followed by eight check bits from
//! g(x) = x^8 + x^5 + x^4 + x^3 + 1 and one overall even-parity bit.
//! Minimum distance is 6, so every single- and double-bit error is detected.

/// Generator polynomial including the x^8 term.
const GENERATOR: u16 = 0x0139;

/// Validates a 16-bit codeword.
pub trait ParityCheck {
    /// Returns true when `codeword` is a valid code word.
    fn check(&self, codeword: u16) -> bool;
}

impl<F> ParityCheck for F
where
    F: Fn(u16) -> bool,
{
    fn check(&self, codeword: u16) -> bool {
        self(codeword)
    }
}

/// The QR(16,7,6) code used by DMR embedded signalling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadraticResidue1676;

impl QuadraticResidue1676 {
    /// Encode the low seven bits of `data` into a systematic codeword.
    pub fn encode(data: u8) -> u16 {
        let data = u16::from(data & 0x7F);

        let mut remainder = data << 8;
        for i in (8..15).rev() {
            if remainder & (1 << i) != 0 {
                remainder ^= GENERATOR << (i - 8);
            }
        }

        let codeword = (data << 9) | ((remainder & 0xFF) << 1);
        codeword | (codeword.count_ones() as u16 & 1)
    }

    /// The seven data bits of a codeword, without validation.
    pub fn data(codeword: u16) -> u8 {
        (codeword >> 9) as u8
    }
}

impl ParityCheck for QuadraticResidue1676 {
    fn check(&self, codeword: u16) -> bool {
        Self::encode(Self::data(codeword)) == codeword
    }
}
