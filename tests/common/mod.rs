//! Common test utilities and helpers
//!
//! Reusable pieces for the integration tests: a builder around the
//! `bark-push` binary and a wiremock-backed loopback relay that records
//! the requests it receives.

#![allow(dead_code)]

use assert_cmd::Command;
use std::net::TcpListener;
use std::path::Path;
use tokio::runtime::Runtime;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Test command builder for the bark-push CLI
pub struct TestCommand {
    cmd: Command,
}

impl TestCommand {
    /// New command with a private config file and no inherited Bark environment
    pub fn new(config_path: &Path) -> Self {
        let mut cmd = Command::cargo_bin("bark-push").expect("Failed to find bark-push binary");
        cmd.env_remove("BARK_CONFIG")
            .env_remove("BARK_SERVER")
            .env_remove("BARK_DEVICE_KEY")
            .env_remove("RUST_LOG")
            .env("NO_PROXY", "127.0.0.1,localhost")
            .arg("--config")
            .arg(config_path);
        Self { cmd }
    }

    /// Add arguments to the command
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.cmd.arg(arg.as_ref());
        }
        self
    }

    pub fn assert(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert()
    }
}

/// Request as seen by the loopback relay
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl From<&Request> for CapturedRequest {
    fn from(request: &Request) -> Self {
        Self {
            method: request.method.to_string(),
            path: request.url.path().to_string(),
            headers: request
                .headers
                .iter()
                .map(|(name, value)| {
                    (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string())
                })
                .collect(),
            body: String::from_utf8_lossy(&request.body).into_owned(),
        }
    }
}

/// Loopback relay answering every request with one canned response
///
/// The mock server runs on its own thread; the local runtime only drives
/// setup and inspection, so blocking clients never run inside it.
pub struct MockRelay {
    pub url: String,
    server: MockServer,
    runtime: Runtime,
}

impl MockRelay {
    pub fn respond(status: u16, body: &'static str) -> Self {
        Self::start(ResponseTemplate::new(status).set_body_string(body))
    }

    /// Answer with a redirect to `location`
    pub fn redirect(status: u16, location: &str) -> Self {
        Self::start(ResponseTemplate::new(status).insert_header("Location", location))
    }

    fn start(response: ResponseTemplate) -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build test runtime");
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(any()).respond_with(response).mount(&server).await;
            server
        });

        Self {
            url: format!("{}/", server.uri()),
            server,
            runtime,
        }
    }

    /// Every request received so far
    pub fn received(&self) -> Vec<CapturedRequest> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(CapturedRequest::from)
            .collect()
    }

    /// The single request the relay received
    pub fn captured(self) -> CapturedRequest {
        let mut requests = self.received();
        assert_eq!(requests.len(), 1, "relay expected exactly one request");
        requests.remove(0)
    }
}

/// URL of a loopback port with nothing listening on it
pub fn refused_url() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}/")
}
