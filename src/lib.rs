//! Bark Push Client Library
//!
//! Sends push notifications to one or more devices through a Bark relay
//! server over HTTPS.

pub mod client;
pub mod config;
pub mod errors;
pub mod payload;

// Re-export commonly used types for convenience
pub use client::{BarkClient, SendOutcome};
pub use config::{Config, ConfigManager};
pub use errors::{AppError, AppResult};
pub use payload::{PushOptions, PushParams};
