//! Home Brew packet signatures.
//!
//! Every datagram starts with an ASCII tag. Repeater-originated tags start
//! with `RPT`, master-originated ones with `MST`; data frames use `DMRD`.

/// DMR data frame.
pub const DMR_DATA: &[u8; 4] = b"DMRD";
/// Repeater login request.
pub const REPEATER_LOGIN: &[u8; 4] = b"RPTL";
/// Repeater key exchange.
pub const REPEATER_KEY: &[u8; 4] = b"RPTK";
/// Repeater configuration record.
pub const REPEATER_CONFIG: &[u8; 4] = b"RPTC";
/// Repeater keepalive ping.
pub const REPEATER_PING: &[u8; 7] = b"RPTPING";
/// Repeater closing the link.
pub const REPEATER_CLOSING: &[u8; 5] = b"RPTCL";
/// Master accepted the last request.
pub const MASTER_ACK: &[u8; 6] = b"RPTACK";
/// Master refused the last request.
pub const MASTER_NAK: &[u8; 6] = b"MSTNAK";
/// Master keepalive reply.
pub const MASTER_PONG: &[u8; 7] = b"MSTPONG";
/// Master closing the link.
pub const MASTER_CLOSING: &[u8; 5] = b"MSTCL";

/// Width of the ACK/NAK signature at the start of a reply.
pub const REPLY_SIGNATURE_LEN: usize = 6;

/// Returns a human-readable name for the signature `data` starts with.
pub fn signature_name(data: &[u8]) -> &'static str {
    let names: [(&[u8], &str); 10] = [
        (DMR_DATA, "DMRD"),
        (REPEATER_LOGIN, "RPTL"),
        (REPEATER_KEY, "RPTK"),
        (REPEATER_CONFIG, "RPTC"),
        (REPEATER_PING, "RPTPING"),
        (REPEATER_CLOSING, "RPTCL"),
        (MASTER_ACK, "RPTACK"),
        (MASTER_NAK, "MSTNAK"),
        (MASTER_PONG, "MSTPONG"),
        (MASTER_CLOSING, "MSTCL"),
    ];
    names
        .iter()
        .filter(|(sig, _)| data.starts_with(sig))
        .max_by_key(|(sig, _)| sig.len())
        .map(|(_, name)| *name)
        .unwrap_or("UNKNOWN")
}

/// Returns true if the datagram is a DMR data frame.
pub fn is_data(data: &[u8]) -> bool {
    data.starts_with(DMR_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_signatures() {
        assert_eq!(signature_name(b"DMRD\x01\x02"), "DMRD");
        assert_eq!(signature_name(b"RPTACK0000000A"), "RPTACK");
        assert_eq!(signature_name(b"MSTPONG0000000A"), "MSTPONG");
        assert_eq!(signature_name(b"MSTCL0000000A"), "MSTCL");
        assert_eq!(signature_name(b"RPTPING0000000A"), "RPTPING");
    }

    #[test]
    fn unknown_and_short_input() {
        assert_eq!(signature_name(b"XYZW"), "UNKNOWN");
        assert_eq!(signature_name(b"DM"), "UNKNOWN");
        assert_eq!(signature_name(b""), "UNKNOWN");
    }

    #[test]
    fn data_detection() {
        assert!(is_data(b"DMRD"));
        assert!(!is_data(b"DMR"));
        assert!(!is_data(b"RPTL0000000A"));
    }
}
