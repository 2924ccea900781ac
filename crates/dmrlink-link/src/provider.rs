//! Caller-supplied capabilities.

use bytes::Bytes;
use dmrlink_frame::Frame;

/// Supplies the configuration record sent once the link is authenticated.
pub trait ConfigProvider: Send + Sync {
    fn configuration(&self) -> Bytes;
}

impl<F> ConfigProvider for F
where
    F: Fn() -> Bytes + Send + Sync,
{
    fn configuration(&self) -> Bytes {
        self()
    }
}

/// Receives every data frame the master sends once authenticated.
///
/// Called inline on the dispatch task, so implementations should hand heavy
/// work off rather than block.
pub trait StreamHandler: Send + Sync {
    fn on_frame(&self, frame: &Frame);
}

impl<F> StreamHandler for F
where
    F: Fn(&Frame) + Send + Sync,
{
    fn on_frame(&self, frame: &Frame) {
        self(frame)
    }
}
