use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use dmrlink_frame::signature::{is_data, signature_name, MASTER_CLOSING, MASTER_PONG};
use dmrlink_frame::{decode_frame, Frame};
use dmrlink_transport::{resolve, TransportError, UdpEndpoint, MAX_DATAGRAM_SIZE};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, trace, warn};

use crate::config::{AuthKey, LinkConfig};
use crate::control;
use crate::error::{LinkError, Result};
use crate::handshake::{auth_digest, transition, AuthState, Transition};
use crate::identity::RepeaterIdentity;
use crate::keepalive::{Keepalive, KeepaliveCounters, KeepaliveSnapshot};
use crate::provider::{ConfigProvider, StreamHandler};

/// Datagrams buffered between the receive and dispatch tasks.
const QUEUE_DEPTH: usize = 64;

struct Datagram {
    peer: SocketAddr,
    data: Bytes,
}

/// What the receive task hands to the dispatch task. A receive error is
/// the last item before the queue closes.
type Received = std::result::Result<Datagram, TransportError>;

/// A configured, not yet started repeater link.
pub struct Link {
    config: LinkConfig,
    auth_key: AuthKey,
    identity: RepeaterIdentity,
    provider: Arc<dyn ConfigProvider>,
    handler: Option<Arc<dyn StreamHandler>>,
}

impl Link {
    /// Validate `config` and prepare a link that reports `provider`'s
    /// configuration record once authenticated.
    pub fn new<P>(config: LinkConfig, provider: P) -> Result<Self>
    where
        P: ConfigProvider + 'static,
    {
        let auth_key = config.validate()?;
        let identity = RepeaterIdentity::new(config.local_id)?;
        Ok(Self {
            config,
            auth_key,
            identity,
            provider: Arc::new(provider),
            handler: None,
        })
    }

    /// Deliver incoming data frames to `handler`. Without one they are
    /// decoded and dropped.
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: StreamHandler + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn identity(&self) -> &RepeaterIdentity {
        &self.identity
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Bind the local socket, start logging in and return a handle to the
    /// running session.
    pub async fn start(self) -> Result<LinkHandle> {
        let master = resolve(&self.config.master).await?;
        let endpoint = Arc::new(
            UdpEndpoint::bind(self.config.local_addr(), self.config.io_timeout).await?,
        );

        let cancel = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(AuthState::NotAuthenticated);
        let counters = Arc::new(KeepaliveCounters::default());
        let (queue_tx, queue_rx) = mpsc::channel(QUEUE_DEPTH);

        info!(
            repeater_id = self.identity.id(),
            %master,
            local = %endpoint.local_addr(),
            "starting repeater link"
        );

        let receiver = tokio::spawn(receive_loop(
            Arc::clone(&endpoint),
            queue_tx,
            cancel.clone(),
        ));

        let retry_interval = self.config.retry_interval;
        let mut retry = tokio::time::interval_at(Instant::now() + retry_interval, retry_interval);
        retry.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let session = Session {
            endpoint: Arc::clone(&endpoint),
            master,
            pending: control::login_request(&self.identity),
            identity: self.identity.clone(),
            auth_key: self.auth_key,
            config: self.config,
            provider: self.provider,
            handler: self.handler,
            counters: Arc::clone(&counters),
            state: state_tx,
            cancel: cancel.clone(),
            retry,
            keepalive: None,
        };
        let session = tokio::spawn(session.run(queue_rx));

        Ok(LinkHandle {
            endpoint,
            master,
            identity: self.identity,
            state: state_rx,
            counters,
            _guard: cancel.clone().drop_guard(),
            cancel,
            session,
            receiver,
        })
    }
}

/// Handle to a running link.
///
/// Dropping the handle stops the session; [`LinkHandle::shutdown`] does the
/// same and reports how it ended.
pub struct LinkHandle {
    endpoint: Arc<UdpEndpoint>,
    master: SocketAddr,
    identity: RepeaterIdentity,
    state: watch::Receiver<AuthState>,
    counters: Arc<KeepaliveCounters>,
    cancel: CancellationToken,
    session: JoinHandle<Result<()>>,
    receiver: JoinHandle<()>,
    _guard: DropGuard,
}

impl LinkHandle {
    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.clone()
    }

    /// Wait until the handshake settles. Errors unless the link is
    /// authenticated.
    pub async fn authenticated(&self) -> Result<()> {
        let mut state = self.state.clone();
        let settled = *state
            .wait_for(|s| !s.is_handshaking())
            .await
            .map_err(|_| LinkError::Disconnected("session ended during handshake".to_string()))?;
        match settled {
            AuthState::Authenticated => Ok(()),
            _ => Err(LinkError::NotAuthenticated),
        }
    }

    pub fn keepalive(&self) -> KeepaliveSnapshot {
        self.counters.snapshot()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.endpoint.local_addr()
    }

    pub fn master_addr(&self) -> SocketAddr {
        self.master
    }

    pub fn identity(&self) -> &RepeaterIdentity {
        &self.identity
    }

    /// True once the session task has ended.
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    /// Send a data frame to the master. Only allowed while authenticated.
    pub async fn send_frame(&self, frame: &Frame) -> Result<()> {
        let state = self.state();
        if state != AuthState::Authenticated {
            return Err(LinkError::NotAuthenticated);
        }
        self.endpoint.send_to(&frame.to_bytes(), self.master).await?;
        Ok(())
    }

    /// Stop the session, telling the master first if authenticated.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        self.wait().await
    }

    /// Wait for the session to end on its own and return why it ended.
    pub async fn wait(self) -> Result<()> {
        let LinkHandle {
            endpoint,
            cancel,
            session,
            receiver,
            _guard,
            ..
        } = self;

        let result = session.await.unwrap_or_else(|e| {
            Err(LinkError::Disconnected(format!("session task failed: {e}")))
        });
        cancel.cancel();
        let _ = receiver.await;
        endpoint.close();
        result
    }
}

async fn receive_loop(
    endpoint: Arc<UdpEndpoint>,
    queue: mpsc::Sender<Received>,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = endpoint.recv_from(&mut buf) => received,
        };

        match received {
            Ok((len, peer)) => {
                let datagram = Datagram {
                    peer,
                    data: Bytes::copy_from_slice(&buf[..len]),
                };
                if queue.send(Ok(datagram)).await.is_err() {
                    break;
                }
            }
            Err(TransportError::Shutdown) => break,
            Err(err) => {
                warn!(error = %err, "receive failed, stopping receive loop");
                let _ = queue.send(Err(err)).await;
                break;
            }
        }
    }
    debug!("receive loop stopped");
}

/// State owned by the dispatch task.
struct Session {
    endpoint: Arc<UdpEndpoint>,
    master: SocketAddr,
    /// Request re-sent on every retry tick while handshaking.
    pending: Bytes,
    identity: RepeaterIdentity,
    auth_key: AuthKey,
    config: LinkConfig,
    provider: Arc<dyn ConfigProvider>,
    handler: Option<Arc<dyn StreamHandler>>,
    counters: Arc<KeepaliveCounters>,
    state: watch::Sender<AuthState>,
    cancel: CancellationToken,
    retry: Interval,
    keepalive: Option<JoinHandle<Result<()>>>,
}

impl Session {
    async fn run(mut self, mut queue: mpsc::Receiver<Received>) -> Result<()> {
        let result = self.drive(&mut queue).await;
        self.cancel.cancel();

        let keepalive = match self.keepalive.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                Err(LinkError::Disconnected(format!("keepalive task failed: {e}")))
            }),
            None => Ok(()),
        };

        let result = result.and(keepalive);
        match &result {
            Ok(()) => info!(repeater_id = self.identity.id(), "link closed"),
            Err(err) => warn!(
                repeater_id = self.identity.id(),
                state = %self.state(),
                reason = %err,
                "link ended"
            ),
        }
        result
    }

    async fn drive(&mut self, queue: &mut mpsc::Receiver<Received>) -> Result<()> {
        info!(repeater_id = self.identity.id(), master = %self.master, "logging in");
        self.send_pending().await?;
        let deadline = self.config.login_timeout.map(|t| Instant::now() + t);

        loop {
            let handshaking = self.state().is_handshaking();
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    self.close().await;
                    return Ok(());
                }
                datagram = queue.recv() => match datagram {
                    Some(Ok(datagram)) => self.dispatch(datagram).await?,
                    Some(Err(err)) => return Err(self.fail_handshake(err.into())),
                    None => {
                        return Err(LinkError::Disconnected("receive task stopped".to_string()));
                    }
                },
                _ = self.retry.tick(), if handshaking => {
                    info!(state = %self.state(), "waiting for master to respond");
                    self.send_pending().await?;
                }
                _ = expire(deadline), if handshaking && deadline.is_some() => {
                    self.set_state(AuthState::Failed);
                    return Err(LinkError::Timeout(self.config.login_timeout.unwrap_or_default()));
                }
            }
        }
    }

    async fn dispatch(&mut self, datagram: Datagram) -> Result<()> {
        let peer = datagram.peer;
        if peer != self.master {
            debug!(%peer, reason = "unexpected peer", "dropping datagram");
            return Ok(());
        }

        let state = self.state();
        if state == AuthState::Authenticated {
            return self.handle_traffic(&datagram.data);
        }

        let step = transition(state, &datagram.data);
        let next = step.next_state(state);
        match step {
            Transition::Ignore { reason } => {
                debug!(%peer, %state, reason, "dropping datagram");
            }
            Transition::Challenge { master_id, salt } => {
                info!(master_id, "login accepted, authenticating");
                let digest = auth_digest(&salt, self.auth_key.as_bytes());
                self.pending = control::key_exchange(&self.identity, &digest);
                self.set_state(next);
                self.retry.reset();
                self.send_pending().await?;
            }
            Transition::Authenticated { master_id } => {
                info!(master_id, "authentication accepted");
                self.set_state(next);
                self.start_keepalive().await?;
            }
            Transition::Failed(err) => {
                warn!(%peer, %state, reason = %err, "handshake failed");
                self.set_state(next);
                return Err(err);
            }
        }
        Ok(())
    }

    fn handle_traffic(&self, data: &[u8]) -> Result<()> {
        if data.len() < 4 {
            debug!(len = data.len(), reason = "datagram too short", "dropping datagram");
            return Ok(());
        }

        if is_data(data) {
            match decode_frame(data) {
                Ok(frame) => {
                    trace!(
                        stream_id = frame.stream_id,
                        sequence = frame.sequence,
                        "data frame"
                    );
                    if let Some(handler) = &self.handler {
                        handler.on_frame(&frame);
                    }
                }
                Err(err) => warn!(reason = %err, "dropping malformed data frame"),
            }
        } else if data.starts_with(MASTER_PONG) {
            self.counters.record_pong();
            trace!(outstanding = self.counters.outstanding(), "keepalive pong");
        } else if data.starts_with(MASTER_CLOSING) {
            return Err(LinkError::Disconnected(
                "master closed the link".to_string(),
            ));
        } else {
            debug!(signature = signature_name(data), "ignoring datagram");
        }
        Ok(())
    }

    async fn start_keepalive(&mut self) -> Result<()> {
        let record = self.provider.configuration();
        info!(
            len = record.len(),
            "logged in, sending repeater configuration"
        );
        debug!(record = %hex::encode(&record), "repeater configuration");
        self.endpoint.send_to(&record, self.master).await?;

        let keepalive = Keepalive {
            endpoint: Arc::clone(&self.endpoint),
            master: self.master,
            ping: control::ping(&self.identity),
            interval: self.config.keepalive_interval,
            max_outstanding: self.config.max_outstanding_pings,
            counters: Arc::clone(&self.counters),
            cancel: self.cancel.clone(),
        };
        self.keepalive = Some(tokio::spawn(keepalive.run()));
        Ok(())
    }

    async fn send_pending(&self) -> Result<()> {
        debug!(
            signature = signature_name(&self.pending),
            master = %self.master,
            "sending handshake request"
        );
        self.endpoint
            .send_to(&self.pending, self.master)
            .await
            .map_err(|err| self.fail_handshake(err.into()))
    }

    /// Mark the handshake failed if one is in progress and pass `err` on.
    fn fail_handshake(&self, err: LinkError) -> LinkError {
        if self.state().is_handshaking() {
            warn!(state = %self.state(), reason = %err, "handshake failed");
            self.set_state(AuthState::Failed);
        }
        err
    }

    async fn close(&self) {
        if self.state() != AuthState::Authenticated {
            return;
        }
        let packet = control::closing(&self.identity);
        match self.endpoint.send_to(&packet, self.master).await {
            Ok(()) => info!(master = %self.master, "sent closing notice"),
            Err(err) => debug!(error = %err, "failed to send closing notice"),
        }
    }

    fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    fn set_state(&self, next: AuthState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            info!(from = %previous, to = %next, "link state changed");
        }
    }
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
