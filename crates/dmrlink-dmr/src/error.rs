/// Errors raised while validating DMR air-interface fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DmrError {
    /// The bit or byte sequence has the wrong width for a fixed-format field.
    #[error("invalid length (expected {expected}, got {actual})")]
    Length { expected: usize, actual: usize },

    /// A bit sequence element was something other than 0 or 1.
    #[error("element {index} is not a bit (value {value})")]
    NotABit { index: usize, value: u8 },

    /// The parity code rejected the codeword.
    #[error("checksum error")]
    Checksum,

    /// A bit defined to be constant zero was set.
    #[error("reserved bit is not 0")]
    ReservedBit,
}

pub type Result<T> = std::result::Result<T, DmrError>;
