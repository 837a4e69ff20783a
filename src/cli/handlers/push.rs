//! Push notification handler
//!
//! Turns a push command into title, message and parameters, then either
//! sends it or prints the request it would make.

use super::super::CliContext;
use anyhow::{bail, Result};
use bark_push::client::bark::LINK_TITLE;
use bark_push::errors::{AppError, AppResult};
use bark_push::payload::{call_params, normalize_url, PushOptions, PushParams};

/// A fully resolved push, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushJob {
    pub title: String,
    pub message: String,
    pub params: PushParams,
}

impl PushJob {
    pub fn advanced(title: String, message: String, options: PushOptions) -> Self {
        Self {
            title,
            message,
            params: options.to_params(),
        }
    }

    /// Link push: the normalized link doubles as the message unless one is given
    pub fn link(url: &str, title: Option<String>, message: Option<String>, options: PushOptions) -> Self {
        let url = normalize_url(url);
        let title = title.unwrap_or_else(|| LINK_TITLE.to_string());
        let message = message.unwrap_or_else(|| url.clone());
        Self::advanced(title, message, options.with_url(url))
    }

    /// Call push: only `call` and `archive`, configured defaults are not merged
    pub fn call(title: String, message: String) -> Self {
        Self {
            title,
            message,
            params: call_params(),
        }
    }

    /// Merge `key=value` pairs, overriding parameters of the same name
    pub fn with_extra(mut self, pairs: &[String]) -> AppResult<Self> {
        for pair in pairs {
            let (key, value) = parse_param(pair)?;
            self.params.insert(key, value);
        }
        Ok(self)
    }
}

fn parse_param(pair: &str) -> AppResult<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(AppError::invalid_argument(pair, "expected KEY=VALUE")),
    }
}

/// Handler for push operations
pub struct PushHandler<'a> {
    context: &'a CliContext,
}

impl<'a> PushHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn handle(&self, job: PushJob) -> Result<()> {
        let mut client = self.context.build_client()?;
        if client.device_keys().is_empty() {
            bail!("No device keys specified; pass --device or run `bark-push config add-device <KEY>`");
        }

        if self.context.dry_run {
            let request = client.build_request(&job.title, &job.message, &job.params)?;
            println!("Dry run - would send notification");
            println!("POST {}", request.url);
            for (name, value) in &request.headers {
                println!("{name}: {value}");
            }
            println!();
            println!("{}", request.body);
            return Ok(());
        }

        let outcome = client.send(&job.title, &job.message, &job.params);
        if !outcome.is_success() {
            bail!(
                "Push failed: {} (HTTP {}): {}",
                outcome,
                client.last_http_status(),
                client.last_error()
            );
        }

        println!(
            "Notification sent to {} device(s) via {}",
            client.device_keys().len(),
            client.server_url()
        );
        Ok(())
    }
}
