//! Login and key exchange state machine.
//!
//! ```text
//! NotAuthenticated --ACK--> Authenticating --ACK--> Authenticated
//!        |                        |
//!        +--NAK / malformed--> Failed <--NAK / malformed--+
//! ```
//!
//! [`transition`] is pure: it classifies one datagram against the current
//! state and leaves all I/O to the session.

use std::fmt;

use bytes::Bytes;
use dmrlink_frame::signature::{is_data, MASTER_CLOSING};
use sha2::{Digest, Sha256};

use crate::control::{parse_reply, ReplyKind};
use crate::error::{HandshakeStage, LinkError};

/// Authentication progress of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NotAuthenticated,
    Authenticating,
    Authenticated,
    Failed,
}

impl AuthState {
    /// True while login or key exchange is outstanding.
    pub fn is_handshaking(self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Authenticating)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a datagram does to the handshake.
#[derive(Debug)]
pub enum Transition {
    /// Drop the datagram and stay put.
    Ignore { reason: &'static str },
    /// Login accepted; continue with the key exchange using `salt`.
    Challenge { master_id: u32, salt: Bytes },
    /// Key accepted; the link is up.
    Authenticated { master_id: u32 },
    /// The handshake is over for good.
    Failed(LinkError),
}

impl Transition {
    /// State after applying this transition to `current`.
    pub fn next_state(&self, current: AuthState) -> AuthState {
        match self {
            Self::Ignore { .. } => current,
            Self::Challenge { .. } => AuthState::Authenticating,
            Self::Authenticated { .. } => AuthState::Authenticated,
            Self::Failed(_) => AuthState::Failed,
        }
    }
}

/// Classify `datagram` received from the master while in `state`.
pub fn transition(state: AuthState, datagram: &[u8]) -> Transition {
    let stage = match state {
        AuthState::NotAuthenticated => HandshakeStage::Login,
        AuthState::Authenticating => HandshakeStage::Key,
        AuthState::Authenticated | AuthState::Failed => {
            return Transition::Ignore {
                reason: "handshake not in progress",
            }
        }
    };

    if datagram.len() < 4 {
        return Transition::Ignore {
            reason: "datagram too short",
        };
    }
    if is_data(datagram) {
        return Transition::Ignore {
            reason: "data frame before authentication",
        };
    }
    if datagram.starts_with(MASTER_CLOSING) {
        return Transition::Failed(LinkError::Disconnected(format!(
            "master closed the link during {stage}"
        )));
    }

    let reply = match parse_reply(datagram) {
        Ok(reply) => reply,
        Err(err) => return Transition::Failed(err),
    };

    match (reply.kind, stage) {
        (ReplyKind::Nak, _) => Transition::Failed(LinkError::AuthRejected {
            stage,
            master_id: reply.master_id,
        }),
        (ReplyKind::Ack, HandshakeStage::Login) => Transition::Challenge {
            master_id: reply.master_id,
            salt: reply.salt,
        },
        (ReplyKind::Ack, HandshakeStage::Key) => Transition::Authenticated {
            master_id: reply.master_id,
        },
    }
}

/// Lowercase hex SHA-256 of `salt` followed by `key`.
pub fn auth_digest(salt: &[u8], key: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(key);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_ack_yields_salt() {
        match transition(AuthState::NotAuthenticated, b"RPTACK00000001deadbeef") {
            Transition::Challenge { master_id, salt } => {
                assert_eq!(master_id, 1);
                assert_eq!(&salt[..], b"deadbeef");
            }
            other => panic!("unexpected transition: {other:?}"),
        }
    }

    #[test]
    fn key_ack_authenticates() {
        let t = transition(AuthState::Authenticating, b"RPTACK00000001");
        assert!(matches!(t, Transition::Authenticated { master_id: 1 }));
        assert_eq!(
            t.next_state(AuthState::Authenticating),
            AuthState::Authenticated
        );
    }

    #[test]
    fn nak_fails_with_stage() {
        let t = transition(AuthState::NotAuthenticated, b"MSTNAK00000002");
        assert!(matches!(
            t,
            Transition::Failed(LinkError::AuthRejected {
                stage: HandshakeStage::Login,
                master_id: 2
            })
        ));
        assert_eq!(t.next_state(AuthState::NotAuthenticated), AuthState::Failed);

        let t = transition(AuthState::Authenticating, b"MSTNAK00000002");
        assert!(matches!(
            t,
            Transition::Failed(LinkError::AuthRejected {
                stage: HandshakeStage::Key,
                ..
            })
        ));
    }

    #[test]
    fn short_reply_fails() {
        for state in [AuthState::NotAuthenticated, AuthState::Authenticating] {
            let t = transition(state, b"RPTACK0000");
            assert!(matches!(t, Transition::Failed(LinkError::Protocol(_))));
        }
    }

    #[test]
    fn unknown_reply_fails() {
        let t = transition(AuthState::NotAuthenticated, b"RPTXXX00000001");
        assert!(matches!(t, Transition::Failed(LinkError::Protocol(_))));
    }

    #[test]
    fn data_frames_never_advance_the_handshake() {
        let mut frame = vec![0u8; 53];
        frame[..4].copy_from_slice(b"DMRD");
        for state in [AuthState::NotAuthenticated, AuthState::Authenticating] {
            let t = transition(state, &frame);
            assert!(matches!(t, Transition::Ignore { .. }));
            assert_eq!(t.next_state(state), state);
        }
    }

    #[test]
    fn tiny_datagrams_are_ignored() {
        assert!(matches!(
            transition(AuthState::NotAuthenticated, b"RPT"),
            Transition::Ignore { .. }
        ));
    }

    #[test]
    fn master_closing_fails_handshake() {
        let t = transition(AuthState::Authenticating, b"MSTCL00000001");
        assert!(matches!(t, Transition::Failed(LinkError::Disconnected(_))));
    }

    #[test]
    fn settled_states_ignore_replies() {
        for state in [AuthState::Authenticated, AuthState::Failed] {
            let t = transition(state, b"RPTACK00000001");
            assert!(matches!(t, Transition::Ignore { .. }));
            assert_eq!(t.next_state(state), state);
        }
    }

    #[test]
    fn digest_is_lowercase_sha256_of_salt_then_key() {
        // sha256("abc")
        assert_eq!(
            auth_digest(b"ab", b"c"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let digest = auth_digest(b"deadbeef", b"passw0rd");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(digest, auth_digest(b"passw0rd", b"deadbeef"));
    }

    #[test]
    fn handshaking_states() {
        assert!(AuthState::NotAuthenticated.is_handshaking());
        assert!(AuthState::Authenticating.is_handshaking());
        assert!(!AuthState::Authenticated.is_handshaking());
        assert!(!AuthState::Failed.is_handshaking());
        assert_eq!(AuthState::Authenticated.to_string(), "authenticated");
    }
}
