//! Upload response and result models.

use serde::{Deserialize, Serialize};

use crate::digest::FileDigest;
use crate::error::UploadError;

/// Blob descriptor returned by a Blossom server after an upload.
///
/// Every field is optional on the wire; the client decides what counts as a
/// usable response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlobDescriptor {
    pub url: Option<String>,
    pub hash: Option<String>,
    pub sha256: Option<String>,
    pub size: Option<u64>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub uploaded: Option<i64>,
}

impl BlobDescriptor {
    /// Non-empty `url`, if the server returned one.
    pub fn usable_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Server-reported hash, preferring `hash` over the BUD-02 `sha256` field.
    pub fn reported_hash(&self) -> Option<&str> {
        self.hash
            .as_deref()
            .or(self.sha256.as_deref())
            .filter(|h| !h.is_empty())
    }
}

/// A confirmed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub url: String,
    pub hash: String,
    pub size: u64,
}

impl UploadOutcome {
    /// Combine the server response with the local digest.
    ///
    /// The server hash wins when present; the size is always the local one.
    pub fn from_descriptor(url: &str, descriptor: &BlobDescriptor, digest: &FileDigest) -> Self {
        Self {
            url: url.to_string(),
            hash: descriptor
                .reported_hash()
                .unwrap_or(digest.sha256.as_str())
                .to_string(),
            size: digest.size,
        }
    }
}

/// Terminal result of one uploader run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub success: bool,
    pub url: Option<String>,
    pub hash: Option<String>,
    pub size: Option<u64>,
    pub error: Option<String>,
}

impl UploadResult {
    pub fn succeeded(outcome: UploadOutcome) -> Self {
        Self {
            success: true,
            url: Some(outcome.url),
            hash: Some(outcome.hash),
            size: Some(outcome.size),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            hash: None,
            size: None,
            error: Some(message.into()),
        }
    }

    /// Output entries in emission order.
    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(5);
        if let Some(url) = &self.url {
            out.push(("url", url.clone()));
        }
        if let Some(hash) = &self.hash {
            out.push(("hash", hash.clone()));
        }
        if let Some(size) = self.size {
            out.push(("size", size.to_string()));
        }
        out.push(("success", self.success.to_string()));
        if let Some(error) = &self.error {
            out.push(("error", error.clone()));
        }
        out
    }
}

impl From<Result<UploadOutcome, UploadError>> for UploadResult {
    fn from(result: Result<UploadOutcome, UploadError>) -> Self {
        match result {
            Ok(outcome) => UploadResult::succeeded(outcome),
            Err(err) => UploadResult::failed(err.report_message()),
        }
    }
}
