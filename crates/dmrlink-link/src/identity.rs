use std::fmt;

use crate::error::{LinkError, Result};

/// Width of the hex-encoded repeater ID on the wire.
pub const HEX_ID_LEN: usize = 8;

/// The local repeater ID and its wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeaterIdentity {
    id: u32,
    hex: String,
}

impl RepeaterIdentity {
    /// ID 0 is reserved and rejected.
    pub fn new(id: u32) -> Result<Self> {
        if id == 0 {
            return Err(LinkError::Config("missing local repeater id".to_string()));
        }
        Ok(Self {
            id,
            hex: format!("{id:08X}"),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Eight uppercase hex digits.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.hex.as_bytes()
    }
}

impl fmt::Display for RepeaterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_eight_uppercase_digits() {
        let identity = RepeaterIdentity::new(0xABCD).unwrap();
        assert_eq!(identity.hex(), "0000ABCD");
        assert_eq!(identity.as_bytes().len(), HEX_ID_LEN);
        assert_eq!(identity.id(), 0xABCD);

        let identity = RepeaterIdentity::new(u32::MAX).unwrap();
        assert_eq!(identity.hex(), "FFFFFFFF");
    }

    #[test]
    fn rejects_zero() {
        assert!(matches!(
            RepeaterIdentity::new(0),
            Err(LinkError::Config(_))
        ));
    }

    #[test]
    fn displays_decimal_id() {
        let identity = RepeaterIdentity::new(204_342).unwrap();
        assert_eq!(identity.to_string(), "204342");
    }
}
