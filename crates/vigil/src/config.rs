use std::time::Duration;

/// Default wall-clock limit for one request, connect through body drain.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// User agent reported by the shared client.
pub const DEFAULT_USER_AGENT: &str = concat!("vigil/", env!("CARGO_PKG_VERSION"));

/// Configurable options for the shared HTTP client and the probe loops.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Per-request timeout. A request that blows through it is classified as
    /// a transport error; the loop carries on.
    pub request_timeout: Duration,

    /// User agent string sent with every probe.
    pub user_agent: String,

    /// Whether to follow redirects (up to 10 hops).
    pub follow_redirects: bool,

    /// Maximum idle connections kept per host.
    ///
    /// Probers revisit the same hosts every cycle. Default: 2
    pub pool_max_idle_per_host: usize,

    /// How long idle pooled connections are kept alive. Default: 30 seconds
    pub pool_idle_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            follow_redirects: true,
            pool_max_idle_per_host: 2,
            pool_idle_timeout: Duration::from_secs(30),
        }
    }
}

impl ProbeConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }
}
