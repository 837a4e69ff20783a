//! Bark push client
//!
//! ## Architecture
//!
//! - **BarkClient**: holds device keys and the server URL, builds one request per send
//! - **Transport**: the session that carries the request; `HttpTransport` in production
//! - **SendOutcome**: typed result of a send, with the diagnostic kept on the client
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bark_push::client::{BarkClient, SendOutcome};
//! use bark_push::payload::PushOptions;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = BarkClient::new("your-device-key")?;
//!
//!     let outcome = client.send_advanced("Build", "Finished", &PushOptions::default().with_group("ci"));
//!     if outcome != SendOutcome::Success {
//!         eprintln!("{outcome}: {}", client.last_error());
//!     }
//!     Ok(())
//! }
//! ```

pub mod bark;
pub mod outcome;
pub mod transport;

pub use bark::BarkClient;
pub use outcome::SendOutcome;
pub use transport::{HttpTransport, PushRequest, Transport, TransportOption, TransportResponse};
