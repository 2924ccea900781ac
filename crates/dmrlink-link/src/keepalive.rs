use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dmrlink_transport::UdpEndpoint;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{LinkError, Result};

/// Ping bookkeeping shared between the keepalive task and pong handling.
#[derive(Debug, Default)]
pub struct KeepaliveCounters {
    outstanding: AtomicU32,
    sent: AtomicU64,
    pongs: AtomicU64,
}

/// Point-in-time copy of [`KeepaliveCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepaliveSnapshot {
    pub outstanding: u32,
    pub sent: u64,
    pub pongs: u64,
}

impl KeepaliveCounters {
    /// Count a ping about to be sent. Returns the new outstanding count.
    pub fn record_ping(&self) -> u32 {
        self.sent.fetch_add(1, Ordering::Relaxed);
        self.outstanding.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    /// Count a pong. The outstanding count never drops below zero.
    pub fn record_pong(&self) {
        self.pongs.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    pub fn outstanding(&self) -> u32 {
        self.outstanding.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> KeepaliveSnapshot {
        KeepaliveSnapshot {
            outstanding: self.outstanding(),
            sent: self.sent.load(Ordering::Relaxed),
            pongs: self.pongs.load(Ordering::Relaxed),
        }
    }
}

/// Everything the keepalive task needs.
pub(crate) struct Keepalive {
    pub endpoint: Arc<UdpEndpoint>,
    pub master: SocketAddr,
    pub ping: Bytes,
    pub interval: Duration,
    pub max_outstanding: Option<u32>,
    pub counters: Arc<KeepaliveCounters>,
    pub cancel: CancellationToken,
}

impl Keepalive {
    /// Ping the master every interval, starting immediately, until cancelled.
    ///
    /// A failed send or too many unanswered pings ends the loop with an error
    /// and cancels the session.
    pub async fn run(self) -> Result<()> {
        let result = self.ping_loop().await;
        if let Err(err) = &result {
            warn!(master = %self.master, error = %err, "keepalive stopped");
            self.cancel.cancel();
        }
        result
    }

    async fn ping_loop(&self) -> Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }

            if let Some(max) = self.max_outstanding {
                let outstanding = self.counters.outstanding();
                if outstanding >= max {
                    return Err(LinkError::Disconnected(format!(
                        "{outstanding} keepalive pings unanswered"
                    )));
                }
            }

            let outstanding = self.counters.record_ping();
            debug!(master = %self.master, outstanding, "sending keepalive ping");
            self.endpoint.send_to(&self.ping, self.master).await?;
        }
    }
}
