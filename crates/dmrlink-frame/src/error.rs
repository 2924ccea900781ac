/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The datagram is not exactly one frame long.
    #[error("invalid frame length ({actual} bytes, expected {expected})")]
    Length { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
