use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};

/// Default bound on a single socket write.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive buffer size. Larger than any Home Brew message.
pub const MAX_DATAGRAM_SIZE: usize = 512;

/// Resolve `addr` (`host:port`) to the first socket address it yields.
pub async fn resolve(addr: &str) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host(addr)
        .await
        .map_err(|e| TransportError::Resolve {
            addr: addr.to_string(),
            source: e,
        })?;
    addrs.next().ok_or_else(|| TransportError::Resolve {
        addr: addr.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
    })
}

/// A bound UDP socket shared by one receiver and any number of senders.
///
/// Sends are serialized through an async mutex and bounded by the I/O
/// timeout. Receives are not bounded; callers race them against their own
/// cancellation.
#[derive(Debug)]
pub struct UdpEndpoint {
    socket: UdpSocket,
    write_lock: Mutex<()>,
    io_timeout: Duration,
    local_addr: SocketAddr,
    closed: AtomicBool,
}

impl UdpEndpoint {
    /// Resolve and bind `addr`.
    pub async fn bind(addr: &str, io_timeout: Duration) -> Result<Self> {
        let local = resolve(addr).await.map_err(|e| match e {
            TransportError::Resolve { source, .. } => TransportError::Bind {
                addr: addr.to_string(),
                source,
            },
            other => other,
        })?;

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| TransportError::Bind {
                addr: addr.to_string(),
                source: e,
            })?;
        let local_addr = socket.local_addr().map_err(|e| TransportError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;

        info!(%local_addr, "udp endpoint bound");

        Ok(Self {
            socket,
            write_lock: Mutex::new(()),
            io_timeout,
            local_addr,
            closed: AtomicBool::new(false),
        })
    }

    /// The address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    /// Send one datagram to `peer`.
    pub async fn send_to(&self, data: &[u8], peer: SocketAddr) -> Result<()> {
        if self.is_closed() {
            return Err(TransportError::Shutdown);
        }

        let _guard = self.write_lock.lock().await;
        match tokio::time::timeout(self.io_timeout, self.socket.send_to(data, peer)).await {
            Ok(Ok(sent)) => {
                trace!(%peer, len = sent, "datagram sent");
                Ok(())
            }
            Ok(Err(e)) => Err(TransportError::Send { peer, source: e }),
            Err(_) => Err(TransportError::Timeout {
                op: "send",
                timeout: self.io_timeout,
            }),
        }
    }

    /// Receive one datagram into `buf`.
    pub async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        if self.is_closed() {
            return Err(TransportError::Shutdown);
        }

        let (len, peer) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(TransportError::Receive)?;
        trace!(%peer, len, "datagram received");
        Ok((len, peer))
    }

    /// Refuse further sends and receives. The socket itself is released when
    /// the last reference is dropped.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(local_addr = %self.local_addr, "udp endpoint closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
