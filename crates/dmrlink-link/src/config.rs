use std::fmt;
use std::time::Duration;

use dmrlink_transport::DEFAULT_IO_TIMEOUT;

use crate::error::{LinkError, Result};

/// Local bind address used when none is configured.
pub const DEFAULT_LOCAL_ADDR: &str = "0.0.0.0:62030";
/// Interval between keepalive pings once authenticated.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);
/// Interval between handshake re-sends while waiting for the master.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
/// Time allowed for login and key exchange to complete.
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared secret used in the key exchange.
///
/// A `0x` prefix marks a hex-encoded key; anything else is used verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKey(Vec<u8>);

impl AuthKey {
    pub fn parse(key: &str) -> Result<Self> {
        match key.strip_prefix("0x") {
            Some(encoded) => hex::decode(encoded)
                .map(Self)
                .map_err(|e| LinkError::Config(format!("invalid hex auth key: {e}"))),
            None => Ok(Self(key.as_bytes().to_vec())),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthKey(<redacted:{} bytes>)", self.0.len())
    }
}

/// Network and timing configuration for a repeater link.
#[derive(Clone)]
pub struct LinkConfig {
    /// Shared secret, see [`AuthKey`]. Never logged.
    pub auth_key: String,
    /// Local bind address. Empty means [`DEFAULT_LOCAL_ADDR`].
    pub local: String,
    /// Local repeater ID. Must be nonzero.
    pub local_id: u32,
    /// Master address (`host:port`).
    pub master: String,
    /// Time between keepalive pings.
    pub keepalive_interval: Duration,
    /// Time between handshake re-sends.
    pub retry_interval: Duration,
    /// Deadline for reaching the authenticated state. `None` waits forever.
    pub login_timeout: Option<Duration>,
    /// Bound on each socket write.
    pub io_timeout: Duration,
    /// End the session once this many pings go unanswered. `None` disables.
    pub max_outstanding_pings: Option<u32>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            auth_key: String::new(),
            local: DEFAULT_LOCAL_ADDR.to_string(),
            local_id: 0,
            master: String::new(),
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            login_timeout: Some(DEFAULT_LOGIN_TIMEOUT),
            io_timeout: DEFAULT_IO_TIMEOUT,
            max_outstanding_pings: None,
        }
    }
}

impl LinkConfig {
    pub fn new(local_id: u32, master: impl Into<String>) -> Self {
        Self {
            local_id,
            master: master.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_key(mut self, auth_key: impl Into<String>) -> Self {
        self.auth_key = auth_key.into();
        self
    }

    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local = local.into();
        self
    }

    pub fn with_keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn with_login_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.login_timeout = timeout;
        self
    }

    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    pub fn with_max_outstanding_pings(mut self, max: Option<u32>) -> Self {
        self.max_outstanding_pings = max;
        self
    }

    /// The bind address, falling back to [`DEFAULT_LOCAL_ADDR`].
    pub fn local_addr(&self) -> &str {
        if self.local.is_empty() {
            DEFAULT_LOCAL_ADDR
        } else {
            &self.local
        }
    }

    /// Check everything that can be checked without touching the network and
    /// return the decoded auth key.
    pub fn validate(&self) -> Result<AuthKey> {
        if self.local_id == 0 {
            return Err(LinkError::Config("missing local repeater id".to_string()));
        }
        if self.master.trim().is_empty() {
            return Err(LinkError::Config("no master address configured".to_string()));
        }
        for (name, value) in [
            ("keepalive interval", self.keepalive_interval),
            ("retry interval", self.retry_interval),
            ("io timeout", self.io_timeout),
        ] {
            if value.is_zero() {
                return Err(LinkError::Config(format!("{name} must be nonzero")));
            }
        }
        if self.max_outstanding_pings == Some(0) {
            return Err(LinkError::Config(
                "max outstanding pings must be at least 1".to_string(),
            ));
        }
        AuthKey::parse(&self.auth_key)
    }
}

impl fmt::Debug for LinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkConfig")
            .field(
                "auth_key",
                &format_args!("<redacted:{} bytes>", self.auth_key.len()),
            )
            .field("local", &self.local)
            .field("local_id", &self.local_id)
            .field("master", &self.master)
            .field("keepalive_interval", &self.keepalive_interval)
            .field("retry_interval", &self.retry_interval)
            .field("login_timeout", &self.login_timeout)
            .field("io_timeout", &self.io_timeout)
            .field("max_outstanding_pings", &self.max_outstanding_pings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.local_addr(), "0.0.0.0:62030");
        assert_eq!(config.keepalive_interval, Duration::from_secs(60));
        assert_eq!(config.retry_interval, Duration::from_secs(1));
        assert_eq!(config.login_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.io_timeout, Duration::from_secs(5));
        assert_eq!(config.max_outstanding_pings, None);
    }

    #[test]
    fn empty_local_falls_back_to_default() {
        let config = LinkConfig::new(1, "master:62031").with_local("");
        assert_eq!(config.local_addr(), DEFAULT_LOCAL_ADDR);
    }

    #[test]
    fn plain_auth_key_is_used_verbatim() {
        let key = AuthKey::parse("passw0rd").unwrap();
        assert_eq!(key.as_bytes(), b"passw0rd");
    }

    #[test]
    fn hex_auth_key_is_decoded() {
        let key = AuthKey::parse("0xDEADbeef").unwrap();
        assert_eq!(key.as_bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(AuthKey::parse("0x").unwrap().is_empty());
    }

    #[test]
    fn bad_hex_auth_key_is_a_config_error() {
        assert!(matches!(AuthKey::parse("0xABC"), Err(LinkError::Config(_))));
        assert!(matches!(AuthKey::parse("0xZZ"), Err(LinkError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_id() {
        let err = LinkConfig::new(0, "127.0.0.1:62031").validate().unwrap_err();
        assert!(err.to_string().contains("missing local repeater id"));
    }

    #[test]
    fn validate_rejects_missing_master() {
        let err = LinkConfig::new(1, "  ").validate().unwrap_err();
        assert!(err.to_string().contains("no master address"));
    }

    #[test]
    fn validate_rejects_zero_intervals() {
        let config = LinkConfig::new(1, "127.0.0.1:62031").with_retry_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(LinkError::Config(_))));

        let config = LinkConfig::new(1, "127.0.0.1:62031").with_max_outstanding_pings(Some(0));
        assert!(matches!(config.validate(), Err(LinkError::Config(_))));
    }

    #[test]
    fn validate_returns_decoded_key() {
        let key = LinkConfig::new(1, "127.0.0.1:62031")
            .with_auth_key("0x0102")
            .validate()
            .unwrap();
        assert_eq!(key.as_bytes(), &[1, 2]);
    }

    #[test]
    fn debug_output_redacts_auth_key() {
        let config = LinkConfig::new(1, "127.0.0.1:62031").with_auth_key("s3cr3t-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cr3t-key"));
        assert!(rendered.contains("<redacted:10 bytes>"));

        let key = AuthKey::parse("s3cr3t-key").unwrap();
        assert!(!format!("{key:?}").contains("s3cr3t"));
    }
}
