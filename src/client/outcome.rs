use std::fmt;

/// Result of one send attempt
///
/// Exactly one request is made per attempt; the outcome says how far it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendOutcome {
    /// HTTP 200 with a non-empty body
    Success,
    /// No transport handle, or the request could not be prepared
    InitializationFailed,
    /// Malformed URL. Normalization always yields a usable scheme, so sends never report it
    InvalidUrl,
    /// A response arrived with a status other than 200
    HttpError,
    /// No HTTP response was obtained
    NetworkError,
    /// HTTP 200 with an empty body
    EmptyResponse,
    /// The client holds no device keys
    NoDevicesSpecified,
}

impl SendOutcome {
    pub fn is_success(self) -> bool {
        self == SendOutcome::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SendOutcome::Success => "success",
            SendOutcome::InitializationFailed => "initialization failed",
            SendOutcome::InvalidUrl => "invalid url",
            SendOutcome::HttpError => "http error",
            SendOutcome::NetworkError => "network error",
            SendOutcome::EmptyResponse => "empty response",
            SendOutcome::NoDevicesSpecified => "no devices specified",
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_is_success() {
        assert!(SendOutcome::Success.is_success());
        for outcome in [
            SendOutcome::InitializationFailed,
            SendOutcome::InvalidUrl,
            SendOutcome::HttpError,
            SendOutcome::NetworkError,
            SendOutcome::EmptyResponse,
            SendOutcome::NoDevicesSpecified,
        ] {
            assert!(!outcome.is_success(), "{outcome}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(SendOutcome::HttpError.to_string(), "http error");
        assert_eq!(SendOutcome::NoDevicesSpecified.to_string(), "no devices specified");
    }
}
