//! HTTP transport used by [`BarkClient`](super::BarkClient)
//!
//! Requests and responses are plain data so the client can be driven by any
//! [`Transport`]. [`HttpTransport`] is the production implementation, backed
//! by a long-lived blocking `reqwest` client that is rebuilt only when its
//! options change.

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// User agent sent with every push
pub const USER_AGENT: &str = concat!("bark-push/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A single setting applied to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOption {
    ConnectTimeout(Duration),
    Timeout(Duration),
    VerifyPeer(bool),
    VerifyHost(bool),
    UserAgent(String),
}

impl TransportOption {
    /// Baseline options every client starts from
    pub fn defaults() -> Vec<TransportOption> {
        vec![
            TransportOption::ConnectTimeout(DEFAULT_CONNECT_TIMEOUT),
            TransportOption::Timeout(DEFAULT_TIMEOUT),
            TransportOption::VerifyPeer(true),
            TransportOption::VerifyHost(true),
            TransportOption::UserAgent(USER_AGENT.to_string()),
        ]
    }

    pub fn insecure() -> Vec<TransportOption> {
        vec![
            TransportOption::VerifyPeer(false),
            TransportOption::VerifyHost(false),
        ]
    }
}

/// Effective transport configuration after applying options in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub verify_peer: bool,
    pub verify_host: bool,
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            verify_peer: true,
            verify_host: true,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl TransportSettings {
    pub fn apply(&mut self, option: &TransportOption) {
        match option {
            TransportOption::ConnectTimeout(timeout) => self.connect_timeout = *timeout,
            TransportOption::Timeout(timeout) => self.timeout = *timeout,
            TransportOption::VerifyPeer(verify) => self.verify_peer = *verify,
            TransportOption::VerifyHost(verify) => self.verify_host = *verify,
            TransportOption::UserAgent(agent) => self.user_agent = agent.clone(),
        }
    }
}

/// An outgoing POST described as plain data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// What came back from the relay once a response was received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Session capable of carrying push requests
///
/// `post` returns `Err` only when no HTTP response was obtained at all
/// (DNS, connect, TLS, timeout). Any HTTP status is an `Ok`.
pub trait Transport {
    fn configure(&mut self, options: &[TransportOption]) -> AppResult<()>;

    fn post(&mut self, request: &PushRequest) -> AppResult<TransportResponse>;
}

/// Process-wide transport state, initialized once on first use
///
/// Lives until the process exits. It owns no OS resources, so there is
/// nothing to tear down.
#[derive(Debug)]
pub struct TransportRuntime {
    pub tls_backend: &'static str,
    pub user_agent: &'static str,
}

static RUNTIME: OnceCell<TransportRuntime> = OnceCell::new();

/// Get the process-wide runtime, initializing it on the first call
pub fn runtime() -> &'static TransportRuntime {
    RUNTIME.get_or_init(|| {
        let runtime = TransportRuntime {
            tls_backend: "rustls",
            user_agent: USER_AGENT,
        };
        debug!(
            tls_backend = runtime.tls_backend,
            user_agent = runtime.user_agent,
            "Initialized transport runtime"
        );
        runtime
    })
}

/// Blocking HTTPS transport backed by reqwest
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    settings: TransportSettings,
}

impl HttpTransport {
    /// Create a transport with the baseline settings
    pub fn new() -> AppResult<Self> {
        let runtime = runtime();
        let settings = TransportSettings {
            user_agent: runtime.user_agent.to_string(),
            ..TransportSettings::default()
        };
        let client = Self::build_client(&settings)?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    /// Redirects are never followed; a 3xx is reported as the relay's answer.
    fn build_client(settings: &TransportSettings) -> AppResult<Client> {
        Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .danger_accept_invalid_certs(!settings.verify_peer)
            .danger_accept_invalid_hostnames(!settings.verify_host)
            .build()
            .map_err(|e| AppError::transport_init_with_source("Failed to create HTTP client", e))
    }
}

impl Transport for HttpTransport {
    fn configure(&mut self, options: &[TransportOption]) -> AppResult<()> {
        let mut next = self.settings.clone();
        for option in options {
            next.apply(option);
        }
        if next == self.settings {
            return Ok(());
        }

        debug!(settings = ?next, "Rebuilding HTTP client");
        self.client = Self::build_client(&next)?;
        self.settings = next;
        Ok(())
    }

    fn post(&mut self, request: &PushRequest) -> AppResult<TransportResponse> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body.clone()).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(TransportResponse { status, body })
    }
}
