//! Control packets exchanged with the master.

use bytes::{BufMut, Bytes, BytesMut};
use dmrlink_frame::signature::{
    MASTER_ACK, MASTER_NAK, REPEATER_CLOSING, REPEATER_KEY, REPEATER_LOGIN, REPEATER_PING,
    REPLY_SIGNATURE_LEN,
};

use crate::error::{LinkError, Result};
use crate::identity::{RepeaterIdentity, HEX_ID_LEN};

/// Shortest valid login or key reply: signature plus hex master ID.
pub const MIN_REPLY_LEN: usize = REPLY_SIGNATURE_LEN + HEX_ID_LEN;

/// Verdict carried by a handshake reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Ack,
    Nak,
}

/// A parsed login or key exchange reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub master_id: u32,
    /// Trailing bytes after the master ID. For a login ACK this is the salt.
    pub salt: Bytes,
}

fn with_identity(signature: &[u8], identity: &RepeaterIdentity, extra: usize) -> BytesMut {
    let mut buf = BytesMut::with_capacity(signature.len() + HEX_ID_LEN + extra);
    buf.put_slice(signature);
    buf.put_slice(identity.as_bytes());
    buf
}

/// `RPTL` + hex ID.
pub fn login_request(identity: &RepeaterIdentity) -> Bytes {
    with_identity(REPEATER_LOGIN, identity, 0).freeze()
}

/// `RPTK` + hex ID + hex digest of salt and key.
pub fn key_exchange(identity: &RepeaterIdentity, digest: &str) -> Bytes {
    let mut buf = with_identity(REPEATER_KEY, identity, digest.len());
    buf.put_slice(digest.as_bytes());
    buf.freeze()
}

/// `RPTPING` + hex ID.
pub fn ping(identity: &RepeaterIdentity) -> Bytes {
    with_identity(REPEATER_PING, identity, 0).freeze()
}

/// `RPTCL` + hex ID.
pub fn closing(identity: &RepeaterIdentity) -> Bytes {
    with_identity(REPEATER_CLOSING, identity, 0).freeze()
}

/// Parse the eight hex digits of a master ID.
pub fn parse_hex_id(digits: &[u8]) -> Result<u32> {
    let mut raw = [0u8; 4];
    hex::decode_to_slice(digits, &mut raw)
        .map_err(|e| LinkError::Protocol(format!("invalid master id: {e}")))?;
    Ok(u32::from_be_bytes(raw))
}

/// Parse a login or key exchange reply.
pub fn parse_reply(data: &[u8]) -> Result<Reply> {
    if data.len() < MIN_REPLY_LEN {
        return Err(LinkError::Protocol(format!(
            "reply too short ({} bytes, need {MIN_REPLY_LEN})",
            data.len()
        )));
    }

    let signature = &data[..REPLY_SIGNATURE_LEN];
    let master_id = parse_hex_id(&data[REPLY_SIGNATURE_LEN..MIN_REPLY_LEN])?;
    let kind = if signature == MASTER_ACK {
        ReplyKind::Ack
    } else if signature == MASTER_NAK {
        ReplyKind::Nak
    } else {
        return Err(LinkError::Protocol(format!(
            "unexpected reply {:?} from master {master_id}",
            String::from_utf8_lossy(signature)
        )));
    };

    Ok(Reply {
        kind,
        master_id,
        salt: Bytes::copy_from_slice(&data[MIN_REPLY_LEN..]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> RepeaterIdentity {
        RepeaterIdentity::new(0xABCD).unwrap()
    }

    #[test]
    fn builds_control_packets() {
        assert_eq!(&login_request(&identity())[..], b"RPTL0000ABCD");
        assert_eq!(&ping(&identity())[..], b"RPTPING0000ABCD");
        assert_eq!(&closing(&identity())[..], b"RPTCL0000ABCD");
        assert_eq!(&key_exchange(&identity(), "00ff")[..], b"RPTK0000ABCD00ff");
    }

    #[test]
    fn parses_ack_with_salt() {
        let reply = parse_reply(b"RPTACK00000001deadbeef").unwrap();
        assert_eq!(reply.kind, ReplyKind::Ack);
        assert_eq!(reply.master_id, 1);
        assert_eq!(&reply.salt[..], b"deadbeef");
    }

    #[test]
    fn parses_nak_without_salt() {
        let reply = parse_reply(b"MSTNAK0000ABCD").unwrap();
        assert_eq!(reply.kind, ReplyKind::Nak);
        assert_eq!(reply.master_id, 0xABCD);
        assert!(reply.salt.is_empty());
    }

    #[test]
    fn master_id_accepts_either_case() {
        assert_eq!(parse_hex_id(b"00c0ffee").unwrap(), 0x00C0_FFEE);
        assert_eq!(parse_hex_id(b"00C0FFEE").unwrap(), 0x00C0_FFEE);
    }

    #[test]
    fn rejects_short_reply() {
        let err = parse_reply(b"RPTACK0000").unwrap_err();
        assert!(matches!(err, LinkError::Protocol(_)));
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn rejects_bad_master_id() {
        assert!(matches!(
            parse_reply(b"RPTACK0000XYZ1"),
            Err(LinkError::Protocol(_))
        ));
        assert!(matches!(
            parse_reply(b"RPTACK+0000001"),
            Err(LinkError::Protocol(_))
        ));
    }

    #[test]
    fn rejects_unknown_signature() {
        let err = parse_reply(b"MSTPON00000001").unwrap_err();
        assert!(err.to_string().contains("unexpected reply"));
    }
}
