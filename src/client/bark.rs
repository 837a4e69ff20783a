use tracing::{debug, info, warn};

use super::outcome::SendOutcome;
use super::transport::{HttpTransport, PushRequest, Transport, TransportOption};
use crate::errors::AppResult;
use crate::payload::{
    call_params, normalize_url, push_endpoint, PushBody, PushOptions, PushParams,
    DEFAULT_SERVER_URL,
};

/// Title used by [`BarkClient::send_link`]
pub const LINK_TITLE: &str = "跳转链接";

/// Client for a Bark push relay
///
/// Holds the target device keys, the server base URL and one long-lived
/// transport. Each send makes exactly one request and leaves its
/// diagnostic in [`last_error`](Self::last_error) and
/// [`last_http_status`](Self::last_http_status).
///
/// Not meant for concurrent use: sends take `&mut self`.
#[derive(Debug)]
pub struct BarkClient<T = HttpTransport> {
    device_keys: Vec<String>,
    server_url: String,
    last_error: String,
    last_http_status: u16,
    transport: Option<T>,
}

impl BarkClient<HttpTransport> {
    /// Client for a single device on the default relay
    pub fn new(device_key: impl Into<String>) -> AppResult<Self> {
        Self::with_server([device_key.into()], DEFAULT_SERVER_URL)
    }

    /// Client for several devices on the default relay
    pub fn with_devices<I, S>(device_keys: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_server(device_keys, DEFAULT_SERVER_URL)
    }

    /// Client for several devices on a custom relay
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be created.
    pub fn with_server<I, S>(device_keys: I, server_url: impl Into<String>) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transport = HttpTransport::new()?;
        Self::with_transport(device_keys, server_url, transport)
    }
}

impl<T: Transport> BarkClient<T> {
    /// Build a client around an existing transport and apply the baseline options
    pub fn with_transport<I, S>(
        device_keys: I,
        server_url: impl Into<String>,
        transport: T,
    ) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut client = Self {
            device_keys: Vec::new(),
            server_url: server_url.into(),
            last_error: String::new(),
            last_http_status: 0,
            transport: Some(transport),
        };
        for key in device_keys {
            client.add_device_key(key);
        }
        client.set_default_options()?;
        Ok(client)
    }

    /// Append a device key; empty keys are ignored
    pub fn add_device_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !key.is_empty() {
            self.device_keys.push(key);
        }
    }

    pub fn clear_device_keys(&mut self) {
        self.device_keys.clear();
    }

    pub fn device_keys(&self) -> Vec<String> {
        self.device_keys.clone()
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Diagnostic of the most recent send, empty after a success
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// HTTP status of the most recent send, 0 when no response was received
    pub fn last_http_status(&self) -> u16 {
        self.last_http_status
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Take the transport out of the client
    ///
    /// Later sends report [`SendOutcome::InitializationFailed`].
    pub fn release_transport(&mut self) -> Option<T> {
        self.transport.take()
    }

    /// Reapply connect/total timeouts, TLS verification and user agent
    pub fn set_default_options(&mut self) -> AppResult<()> {
        self.apply_options(&TransportOption::defaults())
    }

    /// Turn off certificate and host name verification
    pub fn disable_ssl_verification(&mut self) -> AppResult<()> {
        warn!("TLS certificate verification disabled");
        self.apply_options(&TransportOption::insecure())
    }

    /// Apply options to the transport, in order. No-op without a transport.
    pub fn apply_options(&mut self, options: &[TransportOption]) -> AppResult<()> {
        match self.transport.as_mut() {
            Some(transport) => transport.configure(options),
            None => Ok(()),
        }
    }

    /// Describe the request `send` would make, without sending it
    pub fn build_request(
        &self,
        title: &str,
        message: &str,
        params: &PushParams,
    ) -> AppResult<PushRequest> {
        let body = PushBody {
            device_keys: &self.device_keys,
            title,
            body: message,
            params,
        }
        .to_json()?;

        Ok(PushRequest {
            url: push_endpoint(&self.server_url),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Send one push with arbitrary extra parameters
    ///
    /// Parameter values of `true`/`false` go out as JSON booleans, numeric
    /// literals as JSON numbers, everything else as strings. A `url`
    /// parameter is normalized first.
    pub fn send(&mut self, title: &str, message: &str, params: &PushParams) -> SendOutcome {
        self.last_error.clear();
        self.last_http_status = 0;

        if self.device_keys.is_empty() {
            return self.finish(
                SendOutcome::NoDevicesSpecified,
                0,
                "No device keys specified".to_string(),
            );
        }
        if self.transport.is_none() {
            return self.finish(
                SendOutcome::InitializationFailed,
                0,
                "HTTP transport is not initialized".to_string(),
            );
        }

        let request = match self.build_request(title, message, params) {
            Ok(request) => request,
            Err(e) => {
                return self.finish(
                    SendOutcome::InitializationFailed,
                    0,
                    format!("Failed to encode request body: {}", e.describe()),
                )
            }
        };

        debug!(
            url = %request.url,
            devices = self.device_keys.len(),
            params = params.len(),
            "Sending push notification"
        );

        let result = match self.transport.as_mut() {
            Some(transport) => transport.post(&request),
            None => {
                return self.finish(
                    SendOutcome::InitializationFailed,
                    0,
                    "HTTP transport is not initialized".to_string(),
                )
            }
        };

        match result {
            Err(e) => self.finish(
                SendOutcome::NetworkError,
                0,
                format!("Network request failed: {}", e.describe()),
            ),
            Ok(response) if response.status != 200 => self.finish(
                SendOutcome::HttpError,
                response.status,
                format!("Server returned HTTP {}: {}", response.status, response.body),
            ),
            Ok(response) if response.body.is_empty() => self.finish(
                SendOutcome::EmptyResponse,
                response.status,
                "Server returned HTTP 200 with an empty body".to_string(),
            ),
            Ok(response) => self.finish(SendOutcome::Success, response.status, String::new()),
        }
    }

    /// Send with the common optional fields; unset or empty fields are left out
    pub fn send_advanced(&mut self, title: &str, message: &str, options: &PushOptions) -> SendOutcome {
        self.send(title, message, &options.to_params())
    }

    /// Send a push whose body the device copies to the clipboard
    pub fn send_copy(&mut self, title: &str, message: &str) -> SendOutcome {
        self.send_advanced(title, message, &PushOptions::default().with_auto_copy("1"))
    }

    /// Send a bare link; it becomes both the message and the tap target
    pub fn send_link(&mut self, url: &str) -> SendOutcome {
        let url = normalize_url(url);
        let options = PushOptions::default().with_url(url.clone());
        self.send_advanced(LINK_TITLE, &url, &options)
    }

    /// Send a push that opens `url` when tapped
    pub fn send_url(&mut self, title: &str, message: &str, url: &str) -> SendOutcome {
        self.send_advanced(title, message, &PushOptions::default().with_url(url))
    }

    /// Send a critical alert, which plays sound even when the device is muted
    pub fn send_critical(&mut self, title: &str, message: &str) -> SendOutcome {
        self.send_advanced(title, message, &PushOptions::default().with_level("critical"))
    }

    /// Send a push that rings like an incoming call
    pub fn send_call(&mut self, title: &str, message: &str) -> SendOutcome {
        self.send(title, message, &call_params())
    }

    /// Send without sound
    pub fn send_silence(&mut self, title: &str, message: &str) -> SendOutcome {
        self.send_advanced(title, message, &PushOptions::default().with_sound("silence"))
    }

    fn finish(&mut self, outcome: SendOutcome, status: u16, detail: String) -> SendOutcome {
        self.last_http_status = status;
        self.last_error = detail;

        if outcome.is_success() {
            info!(status, "Push notification delivered");
        } else {
            warn!(%outcome, status, detail = %self.last_error, "Push notification failed");
        }
        outcome
    }
}
