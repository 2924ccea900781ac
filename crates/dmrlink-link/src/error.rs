use std::fmt;
use std::time::Duration;

/// Handshake step at which the master answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStage {
    /// Reply to the login request.
    Login,
    /// Reply to the key exchange.
    Key,
}

impl fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Key => f.write_str("key exchange"),
        }
    }
}

/// Errors that can occur on a repeater link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] dmrlink_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] dmrlink_frame::FrameError),

    /// The link configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The master sent something the handshake cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The master refused the repeater.
    #[error("{stage} rejected by master {master_id}")]
    AuthRejected {
        stage: HandshakeStage,
        master_id: u32,
    },

    /// The handshake did not complete in time.
    #[error("login timed out after {0:?}")]
    Timeout(Duration),

    /// The session ended.
    #[error("link disconnected: {0}")]
    Disconnected(String),

    /// The operation needs an authenticated link.
    #[error("link is not authenticated")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, LinkError>;
