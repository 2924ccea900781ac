use std::fmt;
use std::io;

use dmrlink_dmr::DmrError;
use dmrlink_frame::FrameError;
use dmrlink_link::LinkError;
use dmrlink_transport::TransportError;

// Process exit codes. 124 matches timeout(1), 64 is EX_USAGE.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const AUTH_REJECTED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => AUTH_REJECTED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable => TRANSPORT_ERROR,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Timeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::Resolve { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn dmr_error(context: &str, err: DmrError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Transport(err) => transport_error(context, err),
        LinkError::Frame(err) => frame_error(context, err),
        LinkError::Config(_) => CliError::new(USAGE, format!("{context}: {err}")),
        LinkError::AuthRejected { .. } => CliError::new(AUTH_REJECTED, format!("{context}: {err}")),
        LinkError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        LinkError::Protocol(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        LinkError::Disconnected(_) | LinkError::NotAuthenticated => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dmrlink_link::HandshakeStage;

    use super::*;

    #[test]
    fn link_errors_map_to_exit_codes() {
        let cases = [
            (
                LinkError::AuthRejected {
                    stage: HandshakeStage::Login,
                    master_id: 1,
                },
                AUTH_REJECTED,
            ),
            (LinkError::Timeout(Duration::from_secs(30)), TIMEOUT),
            (LinkError::Config("missing".into()), USAGE),
            (LinkError::Protocol("short".into()), DATA_INVALID),
            (LinkError::Disconnected("closed".into()), FAILURE),
            (TransportError::Shutdown.into(), TRANSPORT_ERROR),
        ];
        for (err, code) in cases {
            assert_eq!(link_error("connect failed", err).code, code);
        }
    }

    #[test]
    fn message_carries_context() {
        let err = frame_error(
            "decode failed",
            FrameError::Length {
                expected: 53,
                actual: 2,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().starts_with("decode failed: "));
    }
}
