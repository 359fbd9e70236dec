use std::time::Duration;

/// User agent sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = concat!("newsly-http/", env!("CARGO_PKG_VERSION"));

/// Root certificate source for TLS connections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Mozilla roots bundled through webpki-roots
    #[default]
    WebPki,
    /// Roots from the OS certificate store
    Native,
}

/// Whether plain `http://` URLs are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// Only `https://` URLs are sent
    #[default]
    TlsOnly,
    /// `http://` is accepted as well. Meant for a locally running API and mock servers.
    AllowInsecureHttp,
}

/// Settings consumed by [`HttpClientBuilder`](crate::HttpClientBuilder).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout, covering connect, send and response headers.
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Upper bound for a buffered response body, after decompression.
    pub max_body_size: usize,
    pub transport: TransportSecurity,
    pub tls_roots: TlsRootConfig,
    /// Queue depth of the request buffer in front of the service stack.
    pub buffer_capacity: usize,
    /// Idle connections are dropped after this long. `None` keeps them forever.
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: 4 * 1024 * 1024,
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::WebPki,
            buffer_capacity: 64,
            pool_idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl HttpClientConfig {
    /// Settings for talking to a local API server over plain HTTP.
    #[must_use]
    pub fn local() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            transport: TransportSecurity::AllowInsecureHttp,
            ..Self::default()
        }
    }
}
