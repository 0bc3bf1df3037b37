//! HTTP client for Blossom servers.
//!
//! [`BlossomClient`] performs a single authenticated multipart upload and
//! classifies the outcome. [`UploadExecutor`] drives it with per-attempt auth
//! events, exponential backoff, and bounded retries.

pub mod backoff;
pub mod executor;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use blossom_core::request::UPLOAD_PATH;
use blossom_core::{BlobDescriptor, Result, UploadError};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio_util::io::ReaderStream;

pub use backoff::{backoff_delay, Sleeper, TokioSleeper};
pub use executor::{attempt_token, UploadExecutor};

/// Response marker some servers send when an auth event is replayed.
const AUTH_REPLAY_MARKER: &str = "Auth event already used";

/// HTTP client bound to one Blossom server.
#[derive(Clone, Debug)]
pub struct BlossomClient {
    client: Client,
    base_url: String,
}

impl BlossomClient {
    /// `timeout` bounds each request, including the body upload.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            // A redirected POST is replayed as a bodiless GET; surface the 3xx instead.
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("blossom-upload/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exact URL the auth event's `u` tag must carry.
    pub fn upload_url(&self) -> String {
        self.build_url(UPLOAD_PATH)
    }

    /// POST one file as a streamed multipart part.
    ///
    /// Returns the usable URL and the full descriptor on success. Non-2xx
    /// responses are `Server` errors, network failures and non-JSON 2xx
    /// bodies are `Transport` errors, and a 2xx JSON body without a `url`
    /// is a `Semantic` error.
    pub async fn upload_file(
        &self,
        path: &Path,
        file_name: &str,
        size: u64,
        content_type: Option<&str>,
        authorization: &str,
    ) -> Result<(String, BlobDescriptor)> {
        let auth_value = HeaderValue::from_str(authorization).map_err(|e| {
            UploadError::Validation(format!("Authorization header is not valid: {}", e))
        })?;

        let file = tokio::fs::File::open(path).await?;
        let body = Body::wrap_stream(ReaderStream::new(file));
        let mut part = Part::stream_with_length(body, size).file_name(file_name.to_string());
        if let Some(content_type) = content_type {
            part = part.mime_str(content_type).map_err(|e| {
                UploadError::Validation(format!("Invalid content type '{}': {}", content_type, e))
            })?;
        }
        let form = Form::new().part("file", part);

        let url = self.upload_url();
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth_value)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            if text.contains(AUTH_REPLAY_MARKER) {
                tracing::warn!(
                    status = status.as_u16(),
                    "Server rejected a replayed auth event"
                );
            }
            return Err(UploadError::Server {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_descriptor(&text)
    }
}

fn transport_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        UploadError::Transport(format!("request timed out: {}", err))
    } else {
        UploadError::Transport(err.to_string())
    }
}

/// Interpret a 2xx response body.
fn parse_descriptor(text: &str) -> Result<(String, BlobDescriptor)> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| UploadError::Transport(format!("malformed response: {}", e)))?;

    let descriptor: BlobDescriptor = serde_json::from_value(value).map_err(|_| {
        UploadError::Semantic {
            body: text.to_string(),
        }
    })?;

    match descriptor.usable_url().map(str::to_string) {
        Some(url) => Ok((url, descriptor)),
        None => Err(UploadError::Semantic {
            body: text.to_string(),
        }),
    }
}
