//! Streaming file digest.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::Result;

const CHUNK_SIZE: usize = 64 * 1024;

/// SHA-256 and byte length of a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lowercase hex SHA-256
    pub sha256: String,
    pub size: u64,
}

impl FileDigest {
    /// Hash a file in fixed-size chunks, reading it exactly once.
    ///
    /// # Errors
    /// `NotFound` when the path does not exist, `Validation` when it cannot
    /// be read.
    pub async fn compute(path: &Path) -> Result<Self> {
        let mut file = File::open(path).await?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut size: u64 = 0;

        loop {
            let read = file.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
            size += read as u64;
        }

        let sha256 = hex::encode(hasher.finalize());
        tracing::debug!(path = %path.display(), size, sha256 = %sha256, "Computed file digest");

        Ok(Self { sha256, size })
    }
}
