use std::net::SocketAddr;
use std::time::Duration;

/// Errors that can occur on the UDP endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The host name did not resolve to any usable address.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Failed to bind to the local address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// Sending a datagram failed.
    #[error("failed to send to {peer}: {source}")]
    Send {
        peer: SocketAddr,
        source: std::io::Error,
    },

    /// Receiving a datagram failed.
    #[error("failed to receive: {0}")]
    Receive(std::io::Error),

    /// The operation did not finish within the configured I/O timeout.
    #[error("{op} timed out after {timeout:?}")]
    Timeout { op: &'static str, timeout: Duration },

    /// The endpoint has been shut down.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
