use std::path::{Path, PathBuf};

use crate::config::UploadConfig;
use crate::error::{Result, UploadError};
use crate::keys::SecretKey;

pub const UPLOAD_PATH: &str = "/upload";

/// A validated, immutable upload request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    file_path: PathBuf,
    signing_key: SecretKey,
    host: String,
    idempotency_token: String,
    content_type: Option<String>,
    max_attempts: u32,
}

impl UploadRequest {
    /// Validate raw inputs into a request.
    ///
    /// Fails before any network activity: missing inputs and unreadable
    /// files are `Validation` errors, a malformed key is `KeyDecode`.
    pub fn from_config(config: &UploadConfig) -> Result<Self> {
        let (file_path, raw_key) = config.required_inputs()?;
        let file_path = file_path.to_path_buf();

        ensure_regular_file(&file_path)?;
        let signing_key = SecretKey::parse(raw_key)?;

        let idempotency_token = config
            .unique_id
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().timestamp().to_string());

        Ok(Self {
            file_path,
            signing_key,
            host: config.host.trim_end_matches('/').to_string(),
            idempotency_token,
            content_type: config.content_type.clone(),
            max_attempts: config.retries,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn signing_key(&self) -> &SecretKey {
        &self.signing_key
    }

    /// Server base URL without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn idempotency_token(&self) -> &str {
        &self.idempotency_token
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.host, UPLOAD_PATH)
    }

    /// File name sent in the multipart part.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string()
    }
}

fn ensure_regular_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            UploadError::Validation(format!("File not found: {}", path.display()))
        }
        _ => UploadError::Validation(format!("Cannot read {}: {}", path.display(), e)),
    })?;
    if !metadata.is_file() {
        return Err(UploadError::Validation(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }
    Ok(())
}
